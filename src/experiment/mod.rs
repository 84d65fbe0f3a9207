//! Experiment controllers.
//!
//! Each experiment is a self-contained session: it owns its apparatus, its
//! circuit key, its observation table and its latest results. The
//! presentation layer drives a session through the [`Experiment`] trait:
//!
//! 1. Mutate state (`set_circuit_on`, `set_parameter`, plug toggles)
//! 2. Read the instruments (`readings`), which were recomputed by the mutation
//! 3. `record()` the current reading into the table
//! 4. `calculate()` results from the whole table
//! 5. `reset()` back to the bench defaults
//!
//! Readings are never updated incrementally. Every mutating method ends by
//! re-evaluating the instrument model from scratch, so what the meters show
//! is always a function of the current key state and parameters.

mod bridge;
mod combination;
mod metre_bridge;
mod ohms_law;
mod table;

pub use bridge::{BridgeConfig, BridgeObservation};
pub use combination::{
    CombinationMode, CombinationObservation, CombinationResults, ModeResult,
    ResistanceCombination, COMBINATION_CAPACITY,
};
pub use metre_bridge::{BridgeResults, MetreBridge, METRE_BRIDGE_CAPACITY};
pub use ohms_law::{
    OhmsLaw, OhmsLawConfig, OhmsLawObservation, OhmsLawResults, OHMS_LAW_CAPACITY,
};
pub use table::ObservationLog;

use std::fmt;
use std::str::FromStr;

use crate::error::{LabError, Result};

/// The experiments available on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentKind {
    MetreBridge,
    OhmsLaw,
    ResistanceCombination,
}

impl ExperimentKind {
    /// All experiments in menu order.
    pub const ALL: [ExperimentKind; 3] = [
        ExperimentKind::MetreBridge,
        ExperimentKind::OhmsLaw,
        ExperimentKind::ResistanceCombination,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            ExperimentKind::MetreBridge => "Metre Bridge",
            ExperimentKind::OhmsLaw => "Ohm's Law",
            ExperimentKind::ResistanceCombination => "Resistance Combination",
        }
    }

    /// Aim of the practical as given to the student.
    pub fn aim(&self) -> &'static str {
        match self {
            ExperimentKind::MetreBridge => {
                "To find the resistance of a given wire and determine its specific resistance (resistivity)."
            }
            ExperimentKind::OhmsLaw => {
                "To determine resistance per cm of a given wire by plotting a graph of potential difference versus current."
            }
            ExperimentKind::ResistanceCombination => {
                "To verify the laws of combination (series and parallel) of resistances using a metre bridge."
            }
        }
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric input the presentation layer can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Known resistance R in the bridge gap (Ω)
    KnownResistance,
    /// Jockey position along the bridge wire (0-100 %)
    JockeyPosition,
    /// Length of the resistivity sample (m)
    WireLength,
    /// Diameter of the resistivity sample (mm)
    WireDiameter,
    /// Rheostat slider position (0-100 %)
    RheostatValue,
    /// First combination coil (Ω)
    R1,
    /// Second combination coil (Ω)
    R2,
}

impl Parameter {
    /// Name used by the presentation layer.
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::KnownResistance => "knownResistance",
            Parameter::JockeyPosition => "jockeyPosition",
            Parameter::WireLength => "wireLength",
            Parameter::WireDiameter => "wireDiameter",
            Parameter::RheostatValue => "rheostatValue",
            Parameter::R1 => "r1",
            Parameter::R2 => "r2",
        }
    }
}

impl FromStr for Parameter {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "knownresistance" | "r" => Ok(Parameter::KnownResistance),
            "jockeyposition" | "jockey" | "l" => Ok(Parameter::JockeyPosition),
            "wirelength" => Ok(Parameter::WireLength),
            "wirediameter" => Ok(Parameter::WireDiameter),
            "rheostatvalue" | "rheostat" => Ok(Parameter::RheostatValue),
            "r1" => Ok(Parameter::R1),
            "r2" => Ok(Parameter::R2),
            _ => Err(LabError::UnknownParameter {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of every instrument on the bench.
///
/// Instruments an experiment does not have read 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InstrumentReadings {
    /// Galvanometer needle angle (degrees, positive = right)
    pub galvanometer_deflection: f64,
    /// Ammeter reading (A)
    pub ammeter: f64,
    /// Voltmeter reading (V)
    pub voltmeter: f64,
}

impl InstrumentReadings {
    /// All needles at rest.
    pub const NEUTRAL: InstrumentReadings = InstrumentReadings {
        galvanometer_deflection: 0.0,
        ammeter: 0.0,
        voltmeter: 0.0,
    };
}

/// Common control surface of every experiment.
pub trait Experiment {
    /// One row of the observation table.
    type Observation: Clone;
    /// Output of `calculate()`.
    type Results: Clone;

    /// Which experiment this is.
    fn kind(&self) -> ExperimentKind;

    /// Whether the circuit key is closed.
    fn is_circuit_on(&self) -> bool;

    /// Close or open the circuit key. Opening it zeroes every reading.
    fn set_circuit_on(&mut self, on: bool);

    /// Flip the circuit key.
    fn toggle_circuit(&mut self) {
        let on = !self.is_circuit_on();
        self.set_circuit_on(on);
    }

    /// Set a numeric input. Takes effect on the readings immediately.
    fn set_parameter(&mut self, param: Parameter, value: f64) -> Result<()>;

    /// Current value of a numeric input.
    fn parameter(&self, param: Parameter) -> Result<f64>;

    /// Current instrument readings.
    fn readings(&self) -> InstrumentReadings;

    /// Check whether `record()` would accept the current reading, without
    /// recording it. The first violated rule is reported.
    fn check_record(&self) -> Result<()>;

    /// Whether the record button should be enabled.
    fn can_record(&self) -> bool {
        self.check_record().is_ok()
    }

    /// Commit the current reading to the observation table.
    fn record(&mut self) -> Result<Self::Observation>;

    /// Minimum number of observations `calculate()` needs.
    fn min_observations(&self) -> usize;

    /// Whether the calculate button should be enabled.
    fn can_calculate(&self) -> bool {
        self.observations().len() >= self.min_observations()
    }

    /// Recompute results from the whole observation table.
    ///
    /// On error the previous results are kept.
    fn calculate(&mut self) -> Result<&Self::Results>;

    /// Results of the last successful `calculate()`.
    fn results(&self) -> Option<&Self::Results>;

    /// The observation table in recording order.
    fn observations(&self) -> &[Self::Observation];

    /// Restore bench defaults: key open, parameters reset, table and results
    /// cleared.
    fn reset(&mut self);
}

/// Reject NaN and infinities coming from the presentation layer.
pub(crate) fn ensure_finite(param: Parameter, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LabError::invalid_parameter(
            param.name(),
            format!("{value} is not a finite number"),
        ))
    }
}

/// Require a strictly positive value (lengths and diameters).
pub(crate) fn ensure_positive(param: Parameter, value: f64) -> Result<f64> {
    let value = ensure_finite(param, value)?;
    if value <= 0.0 {
        return Err(LabError::invalid_parameter(
            param.name(),
            format!("must be positive (got {value})"),
        ));
    }
    Ok(value)
}

/// Require a non-negative value (coil resistances).
pub(crate) fn ensure_non_negative(param: Parameter, value: f64) -> Result<f64> {
    let value = ensure_finite(param, value)?;
    if value < 0.0 {
        return Err(LabError::invalid_parameter(
            param.name(),
            format!("must not be negative (got {value})"),
        ));
    }
    Ok(value)
}

pub(crate) fn unsupported(param: Parameter, kind: ExperimentKind) -> LabError {
    LabError::UnsupportedParameter {
        param: param.name(),
        experiment: kind.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names_round_trip() {
        for param in [
            Parameter::KnownResistance,
            Parameter::JockeyPosition,
            Parameter::WireLength,
            Parameter::WireDiameter,
            Parameter::RheostatValue,
            Parameter::R1,
            Parameter::R2,
        ] {
            assert_eq!(param.name().parse::<Parameter>().unwrap(), param);
        }
    }

    #[test]
    fn test_parameter_aliases() {
        assert_eq!("known_resistance".parse::<Parameter>().unwrap(), Parameter::KnownResistance);
        assert_eq!("Jockey".parse::<Parameter>().unwrap(), Parameter::JockeyPosition);
        assert_eq!("rheostat-value".parse::<Parameter>().unwrap(), Parameter::RheostatValue);
        assert_eq!(
            "voltage".parse::<Parameter>(),
            Err(LabError::UnknownParameter {
                name: "voltage".to_string()
            })
        );
    }

    #[test]
    fn test_value_guards() {
        assert!(ensure_finite(Parameter::R1, f64::NAN).is_err());
        assert!(ensure_positive(Parameter::WireLength, 0.0).is_err());
        assert_eq!(ensure_positive(Parameter::WireLength, 1.5), Ok(1.5));
        assert!(ensure_non_negative(Parameter::R2, -1.0).is_err());
        assert_eq!(ensure_non_negative(Parameter::R2, 0.0), Ok(0.0));
    }

    #[test]
    fn test_experiment_catalogue() {
        assert_eq!(ExperimentKind::ALL.len(), 3);
        assert_eq!(ExperimentKind::OhmsLaw.to_string(), "Ohm's Law");
        assert!(ExperimentKind::MetreBridge.aim().contains("resistivity"));
    }
}
