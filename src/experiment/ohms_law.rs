//! Ohm's law: resistance per cm of a wire from a V-I graph.

use crate::apparatus::{jitter, AnalogMeter, NoiseSource, Rheostat, ThreadRngNoise};
use crate::error::{LabError, Result};
use crate::physics::{
    least_squares_slope, AMMETER_RESISTANCE, BATTERY_EMF, BATTERY_INTERNAL_RESISTANCE,
    DUPLICATE_CURRENT_THRESHOLD, OHMS_LAW_WIRE_LENGTH_ACTUAL, OHMS_LAW_WIRE_RESISTANCE_ACTUAL,
    READING_NOISE_AMPLITUDE, RHEOSTAT_MAX_RESISTANCE,
};

use super::table::ObservationLog;
use super::{ensure_finite, unsupported, Experiment, ExperimentKind, InstrumentReadings, Parameter};

/// Rows in the Ohm's law observation table.
pub const OHMS_LAW_CAPACITY: usize = 6;

const DEFAULT_RHEOSTAT_POSITION: f64 = 50.0;

/// Configuration for the Ohm's law board.
#[derive(Debug, Clone, PartialEq)]
pub struct OhmsLawConfig {
    /// Cell EMF (V)
    pub emf: f64,
    /// Cell internal resistance (Ω)
    pub internal_resistance: f64,
    /// Resistance of the wire under test (Ω)
    pub wire_resistance: f64,
    /// Length of the wire under test (cm)
    pub wire_length_cm: f64,
    /// Ammeter coil resistance (Ω)
    pub ammeter_resistance: f64,
    /// Rheostat resistance at full travel (Ω)
    pub rheostat_max: f64,
    /// Peak-to-peak relative jitter on each meter reading
    pub noise_amplitude: f64,
    /// Ammeter readings closer than this (A) are rejected as repeats
    pub duplicate_threshold: f64,
    /// Rows in the observation table
    pub capacity: usize,
}

impl Default for OhmsLawConfig {
    fn default() -> Self {
        Self {
            emf: BATTERY_EMF,
            internal_resistance: BATTERY_INTERNAL_RESISTANCE,
            wire_resistance: OHMS_LAW_WIRE_RESISTANCE_ACTUAL,
            wire_length_cm: OHMS_LAW_WIRE_LENGTH_ACTUAL,
            ammeter_resistance: AMMETER_RESISTANCE,
            rheostat_max: RHEOSTAT_MAX_RESISTANCE,
            noise_amplitude: READING_NOISE_AMPLITUDE,
            duplicate_threshold: DUPLICATE_CURRENT_THRESHOLD,
            capacity: OHMS_LAW_CAPACITY,
        }
    }
}

impl OhmsLawConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the meter jitter. 0 gives exact readings.
    pub fn with_noise_amplitude(mut self, amplitude: f64) -> Self {
        self.noise_amplitude = amplitude;
        self
    }

    /// Set how close two ammeter readings may be before the second is
    /// rejected.
    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold;
        self
    }

    /// Set the observation table size.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the resistance of the wire under test.
    pub fn with_wire_resistance(mut self, resistance: f64) -> Self {
        self.wire_resistance = resistance;
        self
    }

    /// Noise-free (current, voltage) with the rheostat at `rheostat_percent`.
    ///
    /// Series loop: cell, rheostat, wire, ammeter. The voltmeter reads across
    /// the wire only.
    pub fn ideal_readings(&self, rheostat_percent: f64) -> (f64, f64) {
        let rheostat = Rheostat::new(self.rheostat_max, rheostat_percent).resistance();
        let total = self.internal_resistance + rheostat + self.wire_resistance + self.ammeter_resistance;
        if total <= 0.0 {
            return (0.0, 0.0);
        }
        let current = self.emf / total;
        (current, current * self.wire_resistance)
    }
}

/// One (V, I) pair from the meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhmsLawObservation {
    /// Serial number, 1-based
    pub serial: usize,
    /// Voltmeter reading (V)
    pub voltage: f64,
    /// Ammeter reading (A)
    pub current: f64,
}

/// Results of an Ohm's law run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhmsLawResults {
    /// Slope of the V-I line (Ω)
    pub resistance: f64,
    /// Resistance per cm of wire (Ω/cm)
    pub resistance_per_cm: f64,
}

/// An Ohm's law session.
///
/// Meter readings jitter by up to ±1 % every time they are recomputed, so
/// repeated readings at one rheostat setting differ slightly. The jitter is
/// drawn from `N`; use [`crate::apparatus::FixedNoise`] for exact readings.
#[derive(Debug, Clone)]
pub struct OhmsLaw<N: NoiseSource = ThreadRngNoise> {
    config: OhmsLawConfig,
    rheostat: Rheostat,
    noise: N,
    circuit_on: bool,
    ammeter_reading: f64,
    voltmeter_reading: f64,
    ammeter: AnalogMeter,
    voltmeter: AnalogMeter,
    log: ObservationLog<OhmsLawObservation>,
    results: Option<OhmsLawResults>,
}

impl OhmsLaw<ThreadRngNoise> {
    /// Create a board with bench defaults and unseeded noise.
    pub fn new() -> Self {
        Self::with_noise(ThreadRngNoise)
    }
}

impl Default for OhmsLaw<ThreadRngNoise> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NoiseSource> OhmsLaw<N> {
    /// Create a board with bench defaults and the given noise source.
    pub fn with_noise(noise: N) -> Self {
        Self::with_config(OhmsLawConfig::default(), noise)
    }

    /// Create a board with a custom configuration.
    pub fn with_config(config: OhmsLawConfig, noise: N) -> Self {
        let rheostat = Rheostat::new(config.rheostat_max, DEFAULT_RHEOSTAT_POSITION);
        let log = ObservationLog::new(config.capacity);
        Self {
            config,
            rheostat,
            noise,
            circuit_on: false,
            ammeter_reading: 0.0,
            voltmeter_reading: 0.0,
            ammeter: AnalogMeter::ammeter(),
            voltmeter: AnalogMeter::voltmeter(),
            log,
            results: None,
        }
    }

    pub fn config(&self) -> &OhmsLawConfig {
        &self.config
    }

    /// Rheostat slider position (%).
    pub fn rheostat_position(&self) -> f64 {
        self.rheostat.position()
    }

    /// Move the rheostat slider. Positions off the track stop at its ends.
    pub fn set_rheostat(&mut self, position: f64) -> Result<()> {
        let position = ensure_finite(Parameter::RheostatValue, position)?;
        self.rheostat.set_position(position);
        self.refresh();
        Ok(())
    }

    /// Ammeter reading (A).
    pub fn ammeter_reading(&self) -> f64 {
        self.ammeter_reading
    }

    /// Voltmeter reading (V).
    pub fn voltmeter_reading(&self) -> f64 {
        self.voltmeter_reading
    }

    /// Ammeter needle angle (degrees).
    pub fn ammeter_needle(&self) -> f64 {
        self.ammeter.needle_deflection(self.ammeter_reading)
    }

    /// Voltmeter needle angle (degrees).
    pub fn voltmeter_needle(&self) -> f64 {
        self.voltmeter.needle_deflection(self.voltmeter_reading)
    }

    /// Recorded points as (I, V) for the V-I graph.
    pub fn graph_points(&self) -> Vec<(f64, f64)> {
        self.log.iter().map(|o| (o.current, o.voltage)).collect()
    }

    /// Re-read both meters, drawing fresh jitter for each.
    fn refresh(&mut self) {
        if !self.circuit_on {
            self.ammeter_reading = 0.0;
            self.voltmeter_reading = 0.0;
            return;
        }

        let (current, voltage) = self.config.ideal_readings(self.rheostat.position());
        let amplitude = self.config.noise_amplitude;
        self.ammeter_reading = jitter(current, self.noise.sample(), amplitude);
        self.voltmeter_reading = jitter(voltage, self.noise.sample(), amplitude);
    }

    fn is_duplicate(&self, current: f64) -> bool {
        self.log
            .iter()
            .any(|o| (o.current - current).abs() < self.config.duplicate_threshold)
    }
}

impl<N: NoiseSource> Experiment for OhmsLaw<N> {
    type Observation = OhmsLawObservation;
    type Results = OhmsLawResults;

    fn kind(&self) -> ExperimentKind {
        ExperimentKind::OhmsLaw
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
            Parameter::RheostatValue => self.set_rheostat(value),
            _ => Err(unsupported(param, self.kind())),
        }
    }

    fn parameter(&self, param: Parameter) -> Result<f64> {
        match param {
            Parameter::RheostatValue => Ok(self.rheostat.position()),
            _ => Err(unsupported(param, self.kind())),
        }
    }

    fn readings(&self) -> InstrumentReadings {
        InstrumentReadings {
            ammeter: self.ammeter_reading,
            voltmeter: self.voltmeter_reading,
            ..InstrumentReadings::NEUTRAL
        }
    }

    fn check_record(&self) -> Result<()> {
        if !self.circuit_on {
            return Err(LabError::CircuitOff);
        }
        self.log.ensure_room()?;
        if self.is_duplicate(self.ammeter_reading) {
            return Err(LabError::DuplicateReading {
                current: self.ammeter_reading,
            });
        }
        Ok(())
    }

    fn record(&mut self) -> Result<OhmsLawObservation> {
        if let Err(err) = self.check_record() {
            if let LabError::DuplicateReading { current } = &err {
                log::warn!(
                    "Ignoring ammeter reading {:.3} A: take readings at different rheostat positions",
                    current
                );
            }
            return Err(err);
        }

        let observation = OhmsLawObservation {
            serial: self.log.next_serial(),
            voltage: self.voltmeter_reading,
            current: self.ammeter_reading,
        };
        self.log.push(observation)?;
        log::debug!(
            "Ohm's law observation {}: V = {:.3} V, I = {:.3} A",
            observation.serial,
            observation.voltage,
            observation.current
        );
        Ok(observation)
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn calculate(&mut self) -> Result<&OhmsLawResults> {
        let required = self.min_observations();
        if self.log.len() < required {
            return Err(LabError::insufficient(required, self.log.len()));
        }

        let resistance =
            least_squares_slope(&self.graph_points()).ok_or(LabError::DegenerateRegression)?;
        let resistance_per_cm = resistance / self.config.wire_length_cm;

        log::debug!(
            "Ohm's law results: R = {:.3} Ω, R/L = {:.3e} Ω/cm",
            resistance,
            resistance_per_cm
        );
        Ok(&*self.results.insert(OhmsLawResults {
            resistance,
            resistance_per_cm,
        }))
    }

    fn results(&self) -> Option<&OhmsLawResults> {
        self.results.as_ref()
    }

    fn observations(&self) -> &[OhmsLawObservation] {
        self.log.as_slice()
    }

    fn reset(&mut self) {
        self.circuit_on = false;
        self.rheostat.set_position(DEFAULT_RHEOSTAT_POSITION);
        self.log.clear();
        self.results = None;
        self.refresh();
        log::info!("Ohm's law board reset to bench defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apparatus::{FixedNoise, SequenceNoise};
    use approx::assert_relative_eq;

    fn quiet_board() -> OhmsLaw<FixedNoise> {
        OhmsLaw::with_noise(FixedNoise(0.5))
    }

    #[test]
    fn test_ideal_readings() {
        let config = OhmsLawConfig::default();
        // 0.5 + 5.0 + 2.0 + 0.1 = 7.6 Ω
        let (i, v) = config.ideal_readings(50.0);
        assert_relative_eq!(i, 6.0 / 7.6, epsilon = 1e-12);
        assert_relative_eq!(v, 2.0 * 6.0 / 7.6, epsilon = 1e-12);

        // Rheostat shorted: 2.6 Ω
        let (i, _) = config.ideal_readings(0.0);
        assert_relative_eq!(i, 6.0 / 2.6, epsilon = 1e-12);
    }

    #[test]
    fn test_off_reads_zero() {
        let mut board = quiet_board();
        board.set_rheostat(20.0).unwrap();
        assert_eq!(board.readings(), InstrumentReadings::NEUTRAL);

        board.set_circuit_on(true);
        assert!(board.ammeter_reading() > 0.0);

        board.set_circuit_on(false);
        assert_eq!(board.readings(), InstrumentReadings::NEUTRAL);
    }

    #[test]
    fn test_noise_is_injected_per_reading() {
        // Ammeter draws 0.0, voltmeter draws 1.0
        let mut board = OhmsLaw::with_noise(SequenceNoise::new([0.0, 1.0]));
        board.set_circuit_on(true);
        let (i, v) = board.config().ideal_readings(50.0);
        assert_relative_eq!(board.ammeter_reading(), i * 0.99, epsilon = 1e-12);
        assert_relative_eq!(board.voltmeter_reading(), v * 1.01, epsilon = 1e-12);
    }

    #[test]
    fn test_noise_stays_within_one_percent() {
        let mut board = OhmsLaw::new();
        board.set_circuit_on(true);
        let (i, v) = board.config().ideal_readings(50.0);
        for _ in 0..50 {
            board.set_rheostat(50.0).unwrap();
            assert!((board.ammeter_reading() / i - 1.0).abs() <= 0.01 + 1e-12);
            assert!((board.voltmeter_reading() / v - 1.0).abs() <= 0.01 + 1e-12);
        }
    }

    #[test]
    fn test_record_and_duplicate_rejection() {
        let mut board = quiet_board();
        assert_eq!(board.record(), Err(LabError::CircuitOff));

        board.set_circuit_on(true);
        let first = board.record().unwrap();
        assert_eq!(first.serial, 1);

        // Same rheostat setting: same current
        assert!(matches!(board.record(), Err(LabError::DuplicateReading { .. })));
        assert_eq!(board.observations().len(), 1);

        board.set_rheostat(30.0).unwrap();
        assert_eq!(board.record().unwrap().serial, 2);
    }

    #[test]
    fn test_duplicate_threshold_is_configurable() {
        let config = OhmsLawConfig::new().with_duplicate_threshold(0.0);
        let mut board = OhmsLaw::with_config(config, FixedNoise(0.5));
        board.set_circuit_on(true);
        board.record().unwrap();
        board.record().unwrap();
        assert_eq!(board.observations().len(), 2);
    }

    #[test]
    fn test_capacity() {
        let mut board = quiet_board();
        board.set_circuit_on(true);
        for step in 0..6 {
            board.set_rheostat(step as f64 * 20.0).unwrap();
            board.record().unwrap();
        }
        board.set_rheostat(90.0).unwrap();
        assert_eq!(board.record(), Err(LabError::LogFull { capacity: 6 }));
        assert_eq!(board.observations().len(), 6);
    }

    #[test]
    fn test_calculate_recovers_wire_resistance() {
        let mut board = quiet_board();
        board.set_circuit_on(true);
        board.record().unwrap();
        assert_eq!(
            board.calculate().map(|r| *r),
            Err(LabError::insufficient(2, 1))
        );
        assert!(board.results().is_none());

        for position in [0.0, 25.0, 75.0, 100.0] {
            board.set_rheostat(position).unwrap();
            board.record().unwrap();
        }
        let results = *board.calculate().unwrap();
        assert_relative_eq!(results.resistance, 2.0, epsilon = 1e-9);
        assert_relative_eq!(results.resistance_per_cm, 0.02, epsilon = 1e-11);
    }

    #[test]
    fn test_calculate_with_jitter_is_close() {
        let mut board = OhmsLaw::with_noise(crate::apparatus::SeededNoise::new(42));
        board.set_circuit_on(true);
        for position in [0.0, 20.0, 40.0, 60.0, 80.0, 100.0] {
            board.set_rheostat(position).unwrap();
            board.record().unwrap();
        }
        let results = *board.calculate().unwrap();
        assert_relative_eq!(results.resistance, 2.0, max_relative = 0.1);
    }

    #[test]
    fn test_failed_calculate_keeps_previous_results() {
        let config = OhmsLawConfig::new().with_duplicate_threshold(0.0);
        let mut board = OhmsLaw::with_config(config, FixedNoise(0.5));
        board.set_circuit_on(true);
        board.record().unwrap();
        board.record().unwrap();
        assert_eq!(
            board.calculate().map(|r| *r),
            Err(LabError::DegenerateRegression)
        );
        assert!(board.results().is_none());
    }

    #[test]
    fn test_meter_needles() {
        let mut board = quiet_board();
        board.set_rheostat(0.0).unwrap();
        board.set_circuit_on(true);
        let i = board.ammeter_reading();
        assert_relative_eq!(board.ammeter_needle(), i / 3.0 * 90.0, epsilon = 1e-12);
        assert!(board.voltmeter_needle() <= 90.0);
    }

    #[test]
    fn test_reset() {
        let mut board = quiet_board();
        board.set_circuit_on(true);
        board.set_rheostat(0.0).unwrap();
        board.record().unwrap();
        board.set_rheostat(100.0).unwrap();
        board.record().unwrap();
        board.calculate().unwrap();

        board.reset();
        assert!(!board.is_circuit_on());
        assert_eq!(board.rheostat_position(), 50.0);
        assert!(board.observations().is_empty());
        assert!(board.results().is_none());
        assert_eq!(board.readings(), InstrumentReadings::NEUTRAL);
    }
}
