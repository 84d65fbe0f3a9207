//! Resistance combination: verifying the series and parallel laws on a
//! metre bridge.
//!
//! Two coils r1 and r2 are connected in series or in parallel across the
//! right gap of the bridge. The balance algorithm is the metre bridge's; only
//! the resistance in the right gap changes with the mode.

use std::fmt;
use std::str::FromStr;

use crate::apparatus::{Galvanometer, ResistanceBox};
use crate::error::{LabError, Result};
use crate::physics::{
    mean, parallel_resistance, percentage_error, series_resistance, R1_ACTUAL, R2_ACTUAL,
};

use super::bridge::{BridgeConfig, BridgeReading};
use super::table::ObservationLog;
use super::{
    ensure_finite, ensure_non_negative, unsupported, Experiment, ExperimentKind,
    InstrumentReadings, Parameter,
};

/// Rows in the combination observation table: five balances per mode.
pub const COMBINATION_CAPACITY: usize = 10;

const DEFAULT_KNOWN_RESISTANCE: f64 = 10.0;
const DEFAULT_JOCKEY_POSITION: f64 = 50.0;

/// How the two coils are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CombinationMode {
    #[default]
    Series,
    Parallel,
}

impl CombinationMode {
    /// Equivalent resistance of `r1` and `r2` in this mode.
    pub fn equivalent(&self, r1: f64, r2: f64) -> f64 {
        match self {
            CombinationMode::Series => series_resistance(r1, r2),
            CombinationMode::Parallel => parallel_resistance(r1, r2),
        }
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            CombinationMode::Series => CombinationMode::Parallel,
            CombinationMode::Parallel => CombinationMode::Series,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombinationMode::Series => "Series",
            CombinationMode::Parallel => "Parallel",
        }
    }
}

impl FromStr for CombinationMode {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "series" | "s" => Ok(CombinationMode::Series),
            "parallel" | "p" => Ok(CombinationMode::Parallel),
            _ => Err(LabError::UnknownMode {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CombinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One balance recorded with the coils in a given mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinationObservation {
    /// Serial number, 1-based
    pub serial: usize,
    /// Connection of the coils when recorded
    pub mode: CombinationMode,
    /// Known resistance R (Ω)
    pub known_resistance: f64,
    /// Balance length l (cm), rounded to 0.1 cm
    pub balance_length: f64,
    /// Experimental equivalent resistance (Ω), rounded to 0.01 Ω
    pub experimental_resistance: f64,
}

/// Theory against experiment for one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeResult {
    /// Equivalent resistance from the combination law (Ω)
    pub theoretical: f64,
    /// Mean experimental value, `None` if the mode was never recorded
    pub experimental: Option<f64>,
    /// Percentage error of the experimental mean
    pub percentage_error: Option<f64>,
}

impl ModeResult {
    fn from_values(theoretical: f64, values: &[f64]) -> Self {
        let experimental = mean(values);
        Self {
            theoretical,
            experimental,
            percentage_error: experimental.and_then(|e| percentage_error(e, theoretical)),
        }
    }
}

/// Results of a combination run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinationResults {
    pub series: ModeResult,
    pub parallel: ModeResult,
}

impl CombinationResults {
    /// Result for one mode.
    pub fn for_mode(&self, mode: CombinationMode) -> &ModeResult {
        match mode {
            CombinationMode::Series => &self.series,
            CombinationMode::Parallel => &self.parallel,
        }
    }
}

/// A resistance combination session.
#[derive(Debug, Clone)]
pub struct ResistanceCombination {
    config: BridgeConfig,
    galvanometer: Galvanometer,
    resistance_box: ResistanceBox,
    circuit_on: bool,
    known_resistance: f64,
    jockey_position: f64,
    r1: f64,
    r2: f64,
    mode: CombinationMode,
    deflection: f64,
    log: ObservationLog<CombinationObservation>,
    results: Option<CombinationResults>,
}

impl Default for ResistanceCombination {
    fn default() -> Self {
        Self::new()
    }
}

impl ResistanceCombination {
    /// Create a session with bench defaults.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default().with_capacity(COMBINATION_CAPACITY))
    }

    /// Create a session with a custom bridge configuration.
    pub fn with_config(config: BridgeConfig) -> Self {
        let galvanometer = config.galvanometer();
        let log = ObservationLog::new(config.capacity);
        let mut session = Self {
            config,
            galvanometer,
            resistance_box: ResistanceBox::for_resistance(DEFAULT_KNOWN_RESISTANCE),
            circuit_on: false,
            known_resistance: DEFAULT_KNOWN_RESISTANCE,
            jockey_position: DEFAULT_JOCKEY_POSITION,
            r1: R1_ACTUAL,
            r2: R2_ACTUAL,
            mode: CombinationMode::default(),
            deflection: 0.0,
            log,
            results: None,
        };
        session.refresh();
        session
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Galvanometer deflection in degrees.
    pub fn deflection(&self) -> f64 {
        self.deflection
    }

    /// Whether the galvanometer is nulled with the key closed.
    pub fn is_balanced(&self) -> bool {
        self.galvanometer.is_balanced(self.circuit_on, self.deflection)
    }

    pub fn mode(&self) -> CombinationMode {
        self.mode
    }

    pub fn r1(&self) -> f64 {
        self.r1
    }

    pub fn r2(&self) -> f64 {
        self.r2
    }

    pub fn known_resistance(&self) -> f64 {
        self.known_resistance
    }

    pub fn jockey_position(&self) -> f64 {
        self.jockey_position
    }

    /// The plug box in the left gap.
    pub fn resistance_box(&self) -> &ResistanceBox {
        &self.resistance_box
    }

    /// Resistance currently in the right gap.
    pub fn effective_resistance(&self) -> f64 {
        self.mode.equivalent(self.r1, self.r2)
    }

    /// Theoretical series and parallel values for the current coils.
    pub fn theoretical(&self) -> (f64, f64) {
        (
            CombinationMode::Series.equivalent(self.r1, self.r2),
            CombinationMode::Parallel.equivalent(self.r1, self.r2),
        )
    }

    /// Reconnect the coils.
    pub fn set_mode(&mut self, mode: CombinationMode) {
        self.mode = mode;
        self.refresh();
    }

    /// Swap between series and parallel.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn set_r1(&mut self, resistance: f64) -> Result<()> {
        self.r1 = ensure_non_negative(Parameter::R1, resistance)?;
        self.refresh();
        Ok(())
    }

    pub fn set_r2(&mut self, resistance: f64) -> Result<()> {
        self.r2 = ensure_non_negative(Parameter::R2, resistance)?;
        self.refresh();
        Ok(())
    }

    /// Set R directly (slider). The plug layout follows as closely as the
    /// box allows.
    pub fn set_known_resistance(&mut self, resistance: f64) -> Result<()> {
        let resistance = ensure_finite(Parameter::KnownResistance, resistance)?;
        self.known_resistance = resistance;
        self.resistance_box.set_resistance(resistance);
        self.refresh();
        Ok(())
    }

    /// Pull or insert a plug of the resistance box; R becomes the box value.
    pub fn toggle_plug(&mut self, index: usize) -> Result<f64> {
        self.known_resistance = self.resistance_box.toggle(index)?;
        self.refresh();
        Ok(self.known_resistance)
    }

    /// Slide the jockey. Positions off the wire stop at its ends.
    pub fn set_jockey_position(&mut self, position: f64) -> Result<()> {
        let position = ensure_finite(Parameter::JockeyPosition, position)?;
        self.jockey_position = position.clamp(0.0, 100.0);
        self.refresh();
        Ok(())
    }

    fn current_reading(&self) -> BridgeReading<'_, CombinationObservation> {
        BridgeReading {
            circuit_on: self.circuit_on,
            galvanometer: &self.galvanometer,
            deflection: self.deflection,
            known_resistance: self.known_resistance,
            jockey_position: self.jockey_position,
            log: &self.log,
        }
    }

    fn refresh(&mut self) {
        self.deflection = self.galvanometer.deflection(
            self.circuit_on,
            self.jockey_position,
            self.known_resistance,
            self.effective_resistance(),
        );
    }

    fn recorded_values(&self, mode: CombinationMode) -> Vec<f64> {
        self.log
            .iter()
            .filter(|o| o.mode == mode)
            .map(|o| o.experimental_resistance)
            .collect()
    }
}

impl Experiment for ResistanceCombination {
    type Observation = CombinationObservation;
    type Results = CombinationResults;

    fn kind(&self) -> ExperimentKind {
        ExperimentKind::ResistanceCombination
    }

    fn is_circuit_on(&self) -> bool {
        self.circuit_on
    }

    fn set_circuit_on(&mut self, on: bool) {
        self.circuit_on = on;
        self.refresh();
    }

    fn set_parameter(&mut self, param: Parameter, value: f64) -> Result<()> {
        match param {
            Parameter::KnownResistance => self.set_known_resistance(value),
            Parameter::JockeyPosition => self.set_jockey_position(value),
            Parameter::R1 => self.set_r1(value),
            Parameter::R2 => self.set_r2(value),
            _ => Err(unsupported(param, self.kind())),
        }
    }

    fn parameter(&self, param: Parameter) -> Result<f64> {
        match param {
            Parameter::KnownResistance => Ok(self.known_resistance),
            Parameter::JockeyPosition => Ok(self.jockey_position),
            Parameter::R1 => Ok(self.r1),
            Parameter::R2 => Ok(self.r2),
            _ => Err(unsupported(param, self.kind())),
        }
    }

    fn readings(&self) -> InstrumentReadings {
        InstrumentReadings {
            galvanometer_deflection: self.deflection,
            ..InstrumentReadings::NEUTRAL
        }
    }

    fn check_record(&self) -> Result<()> {
        self.current_reading().validate()
    }

    fn record(&mut self) -> Result<CombinationObservation> {
        let reading = self.current_reading().observation()?;
        let observation = CombinationObservation {
            serial: reading.serial,
            mode: self.mode,
            known_resistance: reading.known_resistance,
            balance_length: reading.balance_length,
            experimental_resistance: reading.unknown_resistance,
        };
        self.log.push(observation)?;
        log::debug!(
            "Combination observation {} ({}): R = {} Ω, l = {} cm, S = {} Ω",
            observation.serial,
            observation.mode,
            observation.known_resistance,
            observation.balance_length,
            observation.experimental_resistance
        );
        Ok(observation)
    }

    fn min_observations(&self) -> usize {
        1
    }

    fn calculate(&mut self) -> Result<&CombinationResults> {
        let required = self.min_observations();
        if self.log.len() < required {
            return Err(LabError::insufficient(required, self.log.len()));
        }

        let (series, parallel) = self.theoretical();
        let results = CombinationResults {
            series: ModeResult::from_values(series, &self.recorded_values(CombinationMode::Series)),
            parallel: ModeResult::from_values(
                parallel,
                &self.recorded_values(CombinationMode::Parallel),
            ),
        };
        log::debug!(
            "Combination results: series {:?} Ω vs {:.2} Ω, parallel {:?} Ω vs {:.2} Ω",
            results.series.experimental,
            series,
            results.parallel.experimental,
            parallel
        );
        Ok(&*self.results.insert(results))
    }

    fn results(&self) -> Option<&CombinationResults> {
        self.results.as_ref()
    }

    fn observations(&self) -> &[CombinationObservation] {
        self.log.as_slice()
    }

    fn reset(&mut self) {
        self.circuit_on = false;
        self.known_resistance = DEFAULT_KNOWN_RESISTANCE;
        self.resistance_box.set_resistance(DEFAULT_KNOWN_RESISTANCE);
        self.jockey_position = DEFAULT_JOCKEY_POSITION;
        self.r1 = R1_ACTUAL;
        self.r2 = R2_ACTUAL;
        self.mode = CombinationMode::default();
        self.log.clear();
        self.results = None;
        self.refresh();
        log::info!("Resistance combination reset to bench defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::balance_point;
    use approx::assert_relative_eq;

    fn balance(session: &mut ResistanceCombination) {
        let l = balance_point(session.known_resistance(), session.effective_resistance()).unwrap();
        session.set_jockey_position(l).unwrap();
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Series".parse::<CombinationMode>().unwrap(), CombinationMode::Series);
        assert_eq!("parallel".parse::<CombinationMode>().unwrap(), CombinationMode::Parallel);
        assert!("diagonal".parse::<CombinationMode>().is_err());
        assert_eq!(CombinationMode::Series.toggled(), CombinationMode::Parallel);
    }

    #[test]
    fn test_theoretical_values() {
        let session = ResistanceCombination::new();
        assert_eq!(session.theoretical(), (9.0, 2.0));
        assert_eq!(session.effective_resistance(), 9.0);
    }

    #[test]
    fn test_mode_changes_null_point() {
        let mut session = ResistanceCombination::new();
        session.set_circuit_on(true);

        // R = 10, S = 9: null at 100·10/19
        let series_null = 1000.0 / 19.0;
        session.set_jockey_position(series_null).unwrap();
        assert!(session.is_balanced());

        session.toggle_mode();
        assert!(!session.is_balanced());
        // R = 10, S = 2: null at 100·10/12
        assert_relative_eq!(
            session.deflection(),
            (series_null - 1000.0 / 12.0) * 0.8,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_degenerate_gap_saturates() {
        let mut session = ResistanceCombination::new();
        session.set_r1(0.0).unwrap();
        session.set_r2(0.0).unwrap();
        session.set_known_resistance(0.0).unwrap();
        session.set_circuit_on(true);
        session.set_jockey_position(80.0).unwrap();
        assert_eq!(session.deflection(), 45.0);
        session.set_jockey_position(20.0).unwrap();
        assert_eq!(session.deflection(), -45.0);
    }

    #[test]
    fn test_record_tags_mode() {
        let mut session = ResistanceCombination::new();
        session.set_circuit_on(true);
        balance(&mut session);
        let obs = session.record().unwrap();
        assert_eq!(obs.mode, CombinationMode::Series);
        assert_eq!(obs.experimental_resistance, 9.0);

        session.set_mode(CombinationMode::Parallel);
        balance(&mut session);
        let obs = session.record().unwrap();
        assert_eq!(obs.serial, 2);
        assert_eq!(obs.mode, CombinationMode::Parallel);
        assert_eq!(obs.experimental_resistance, 2.0);
    }

    #[test]
    fn test_capacity_is_capped() {
        let mut session = ResistanceCombination::new();
        session.set_circuit_on(true);
        for i in 0..COMBINATION_CAPACITY {
            if i % 2 == 1 {
                session.toggle_mode();
            }
            balance(&mut session);
            session.record().unwrap();
        }
        assert_eq!(
            session.record(),
            Err(LabError::LogFull {
                capacity: COMBINATION_CAPACITY
            })
        );
        assert_eq!(session.observations().len(), COMBINATION_CAPACITY);
    }

    #[test]
    fn test_calculate_per_mode() {
        let mut session = ResistanceCombination::new();
        assert!(session.calculate().is_err());

        session.set_circuit_on(true);
        for known in [10.0, 8.0] {
            session.set_known_resistance(known).unwrap();
            balance(&mut session);
            session.record().unwrap();
        }

        let results = *session.calculate().unwrap();
        assert_eq!(results.series.theoretical, 9.0);
        assert_relative_eq!(results.series.experimental.unwrap(), 9.0, epsilon = 1e-9);
        assert_relative_eq!(results.series.percentage_error.unwrap(), 0.0, epsilon = 1e-9);

        assert_eq!(results.parallel.theoretical, 2.0);
        assert_eq!(results.parallel.experimental, None);
        assert_eq!(results.parallel.percentage_error, None);
        assert_eq!(results.for_mode(CombinationMode::Parallel), &results.parallel);
    }

    #[test]
    fn test_percentage_error_against_offset_balance() {
        let mut session = ResistanceCombination::new();
        session.set_mode(CombinationMode::Parallel);
        session.set_known_resistance(2.0).unwrap();
        session.set_circuit_on(true);
        // Null is at 50 cm; 50.5 cm is still inside the 0.5° band
        session.set_jockey_position(50.5).unwrap();
        let obs = session.record().unwrap();
        assert_eq!(obs.balance_length, 50.5);
        assert_eq!(obs.experimental_resistance, 1.96);

        let results = *session.calculate().unwrap();
        assert_relative_eq!(results.parallel.percentage_error.unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parameter_interface() {
        let mut session = ResistanceCombination::new();
        session.set_parameter(Parameter::R1, 4.0).unwrap();
        assert_eq!(session.parameter(Parameter::R1), Ok(4.0));
        assert!(session.set_parameter(Parameter::R2, -1.0).is_err());
        assert!(session.set_parameter(Parameter::WireLength, 1.0).is_err());
    }

    #[test]
    fn test_reset() {
        let mut session = ResistanceCombination::new();
        session.set_r1(4.0).unwrap();
        session.set_mode(CombinationMode::Parallel);
        session.set_circuit_on(true);
        balance(&mut session);
        session.record().unwrap();
        session.calculate().unwrap();

        session.reset();
        assert!(!session.is_circuit_on());
        assert_eq!(session.mode(), CombinationMode::Series);
        assert_eq!((session.r1(), session.r2()), (6.0, 3.0));
        assert_eq!(session.known_resistance(), 10.0);
        assert!(session.observations().is_empty());
        assert!(session.results().is_none());
        assert_eq!(session.readings(), InstrumentReadings::NEUTRAL);
    }
}
