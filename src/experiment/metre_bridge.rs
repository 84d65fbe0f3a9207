//! Metre bridge: unknown resistance and resistivity of a wire.

use crate::apparatus::{Galvanometer, ResistanceBox};
use crate::error::{LabError, Result};
use crate::physics::{mean, resistivity};

use super::bridge::{BridgeConfig, BridgeObservation, BridgeReading};
use super::table::ObservationLog;
use super::{
    ensure_finite, ensure_positive, unsupported, Experiment, ExperimentKind, InstrumentReadings,
    Parameter,
};

/// Rows in the metre bridge observation table.
pub const METRE_BRIDGE_CAPACITY: usize = 5;

const DEFAULT_KNOWN_RESISTANCE: f64 = 2.0;
const DEFAULT_JOCKEY_POSITION: f64 = 50.0;
const DEFAULT_WIRE_LENGTH: f64 = 1.0;
const DEFAULT_WIRE_DIAMETER: f64 = 0.5;

/// Results of a metre bridge run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeResults {
    /// Mean of the recorded S values (Ω)
    pub mean_resistance: f64,
    /// Specific resistance of the wire (Ω·m)
    pub resistivity: f64,
}

/// A metre bridge session.
#[derive(Debug, Clone)]
pub struct MetreBridge {
    config: BridgeConfig,
    galvanometer: Galvanometer,
    resistance_box: ResistanceBox,
    circuit_on: bool,
    known_resistance: f64,
    jockey_position: f64,
    /// Length of the resistivity sample (m)
    wire_length: f64,
    /// Diameter of the resistivity sample (mm)
    wire_diameter: f64,
    deflection: f64,
    log: ObservationLog<BridgeObservation>,
    results: Option<BridgeResults>,
}

impl Default for MetreBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MetreBridge {
    /// Create a bridge with bench defaults.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Create a bridge with a custom configuration.
    pub fn with_config(config: BridgeConfig) -> Self {
        let galvanometer = config.galvanometer();
        let log = ObservationLog::new(config.capacity);
        let mut bridge = Self {
            config,
            galvanometer,
            resistance_box: ResistanceBox::for_resistance(DEFAULT_KNOWN_RESISTANCE),
            circuit_on: false,
            known_resistance: DEFAULT_KNOWN_RESISTANCE,
            jockey_position: DEFAULT_JOCKEY_POSITION,
            wire_length: DEFAULT_WIRE_LENGTH,
            wire_diameter: DEFAULT_WIRE_DIAMETER,
            deflection: 0.0,
            log,
            results: None,
        };
        bridge.refresh();
        bridge
    }

    /// The configuration this bridge was built with.
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

    pub fn known_resistance(&self) -> f64 {
        self.known_resistance
    }

    pub fn jockey_position(&self) -> f64 {
        self.jockey_position
    }

    pub fn wire_length(&self) -> f64 {
        self.wire_length
    }

    pub fn wire_diameter(&self) -> f64 {
        self.wire_diameter
    }

    /// The plug box in the left gap.
    pub fn resistance_box(&self) -> &ResistanceBox {
        &self.resistance_box
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

    /// Set the length of the resistivity sample (m).
    pub fn set_wire_length(&mut self, length: f64) -> Result<()> {
        self.wire_length = ensure_positive(Parameter::WireLength, length)?;
        self.refresh();
        Ok(())
    }

    /// Set the diameter of the resistivity sample (mm).
    pub fn set_wire_diameter(&mut self, diameter: f64) -> Result<()> {
        self.wire_diameter = ensure_positive(Parameter::WireDiameter, diameter)?;
        self.refresh();
        Ok(())
    }

    fn current_reading(&self) -> BridgeReading<'_, BridgeObservation> {
        BridgeReading {
            circuit_on: self.circuit_on,
            galvanometer: &self.galvanometer,
            deflection: self.deflection,
            known_resistance: self.known_resistance,
            jockey_position: self.jockey_position,
            log: &self.log,
        }
    }

    /// Re-evaluate the galvanometer from the current state.
    fn refresh(&mut self) {
        self.deflection = self.galvanometer.deflection(
            self.circuit_on,
            self.jockey_position,
            self.known_resistance,
            self.config.unknown_resistance,
        );
    }
}

impl Experiment for MetreBridge {
    type Observation = BridgeObservation;
    type Results = BridgeResults;

    fn kind(&self) -> ExperimentKind {
        ExperimentKind::MetreBridge
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
            Parameter::WireLength => self.set_wire_length(value),
            Parameter::WireDiameter => self.set_wire_diameter(value),
            _ => Err(unsupported(param, self.kind())),
        }
    }

    fn parameter(&self, param: Parameter) -> Result<f64> {
        match param {
            Parameter::KnownResistance => Ok(self.known_resistance),
            Parameter::JockeyPosition => Ok(self.jockey_position),
            Parameter::WireLength => Ok(self.wire_length),
            Parameter::WireDiameter => Ok(self.wire_diameter),
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

    fn record(&mut self) -> Result<BridgeObservation> {
        let observation = self.current_reading().observation()?;
        self.log.push(observation)?;
        log::debug!(
            "Metre bridge observation {}: R = {} Ω, l = {} cm, S = {} Ω",
            observation.serial,
            observation.known_resistance,
            observation.balance_length,
            observation.unknown_resistance
        );
        Ok(observation)
    }

    fn min_observations(&self) -> usize {
        1
    }

    fn calculate(&mut self) -> Result<&BridgeResults> {
        let values: Vec<f64> = self.log.iter().map(|o| o.unknown_resistance).collect();
        let mean_resistance =
            mean(&values).ok_or_else(|| LabError::insufficient(self.min_observations(), 0))?;
        let resistivity = resistivity(mean_resistance, self.wire_diameter, self.wire_length)
            .ok_or_else(|| LabError::invalid_parameter("wireLength", "must be positive"))?;

        log::debug!(
            "Metre bridge results: mean S = {:.3} Ω, ρ = {:.3e} Ω·m",
            mean_resistance,
            resistivity
        );
        Ok(&*self.results.insert(BridgeResults {
            mean_resistance,
            resistivity,
        }))
    }

    fn results(&self) -> Option<&BridgeResults> {
        self.results.as_ref()
    }

    fn observations(&self) -> &[BridgeObservation] {
        self.log.as_slice()
    }

    fn reset(&mut self) {
        self.circuit_on = false;
        self.known_resistance = DEFAULT_KNOWN_RESISTANCE;
        self.resistance_box.set_resistance(DEFAULT_KNOWN_RESISTANCE);
        self.jockey_position = DEFAULT_JOCKEY_POSITION;
        self.wire_length = DEFAULT_WIRE_LENGTH;
        self.wire_diameter = DEFAULT_WIRE_DIAMETER;
        self.log.clear();
        self.results = None;
        self.refresh();
        log::info!("Metre bridge reset to bench defaults");
    }
}
