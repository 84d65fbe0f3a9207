//! Balance logic shared by the two bridge experiments.

use crate::apparatus::Galvanometer;
use crate::error::{LabError, Result};
use crate::physics::{
    round_to, unknown_resistance, BALANCE_SENSITIVITY, BALANCE_TOLERANCE, BRIDGE_WIRE_CM,
    GALVANOMETER_MAX_DEFLECTION, S_ACTUAL,
};

use super::table::ObservationLog;

/// Configuration for a bridge experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Galvanometer gain (degrees per cm).
    pub sensitivity: f64,
    /// Galvanometer full-scale deflection (degrees).
    pub max_deflection: f64,
    /// Null band of the galvanometer (degrees).
    pub balance_tolerance: f64,
    /// Rows in the observation table.
    pub capacity: usize,
    /// True value of the coil in the right gap (Ω). Only the metre bridge
    /// uses it; the combination experiment builds its unknown from r1 and r2.
    pub unknown_resistance: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sensitivity: BALANCE_SENSITIVITY,
            max_deflection: GALVANOMETER_MAX_DEFLECTION,
            balance_tolerance: BALANCE_TOLERANCE,
            capacity: super::METRE_BRIDGE_CAPACITY,
            unknown_resistance: S_ACTUAL,
        }
    }
}

impl BridgeConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the galvanometer gain.
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set the galvanometer full-scale deflection.
    ///
    /// - 45° (default): bench galvanometer
    /// - 90°: wide-scale meter widget
    pub fn with_max_deflection(mut self, max_deflection: f64) -> Self {
        self.max_deflection = max_deflection;
        self
    }

    /// Set the null band.
    pub fn with_balance_tolerance(mut self, tolerance: f64) -> Self {
        self.balance_tolerance = tolerance;
        self
    }

    /// Set the observation table size.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the hidden unknown resistance.
    pub fn with_unknown_resistance(mut self, resistance: f64) -> Self {
        self.unknown_resistance = resistance;
        self
    }

    pub(crate) fn galvanometer(&self) -> Galvanometer {
        Galvanometer::new(self.sensitivity, self.max_deflection, self.balance_tolerance)
    }
}

/// One balance recorded on a bridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeObservation {
    /// Serial number, 1-based
    pub serial: usize,
    /// Known resistance R (Ω)
    pub known_resistance: f64,
    /// Balance length l (cm), rounded to 0.1 cm
    pub balance_length: f64,
    /// Unknown resistance S = R(100 - l)/l (Ω), rounded to 0.01 Ω
    pub unknown_resistance: f64,
}

/// State the bridge recorder looks at.
pub(crate) struct BridgeReading<'a, T> {
    pub circuit_on: bool,
    pub galvanometer: &'a Galvanometer,
    pub deflection: f64,
    pub known_resistance: f64,
    pub jockey_position: f64,
    pub log: &'a ObservationLog<T>,
}

impl<T> BridgeReading<'_, T> {
    /// Apply the recording rules in order; the first failure wins.
    pub fn validate(&self) -> Result<()> {
        if !self.circuit_on {
            return Err(LabError::CircuitOff);
        }
        if !self.galvanometer.is_null(self.deflection) {
            return Err(LabError::unbalanced(
                self.deflection,
                self.galvanometer.tolerance,
            ));
        }
        self.log.ensure_room()?;
        if self.known_resistance <= 0.0 {
            return Err(LabError::NonPositiveResistance {
                value: self.known_resistance,
            });
        }
        if self.jockey_position <= 0.0 || self.jockey_position >= BRIDGE_WIRE_CM {
            return Err(LabError::BoundaryPosition {
                position: self.jockey_position,
            });
        }
        Ok(())
    }

    /// Validate, then build the stored row.
    ///
    /// S is computed from the unrounded jockey position; l and S are rounded
    /// only for storage.
    pub fn observation(&self) -> Result<BridgeObservation> {
        self.validate()?;
        let s = unknown_resistance(self.known_resistance, self.jockey_position).ok_or(
            LabError::BoundaryPosition {
                position: self.jockey_position,
            },
        )?;
        Ok(BridgeObservation {
            serial: self.log.next_serial(),
            known_resistance: self.known_resistance,
            balance_length: round_to(self.jockey_position, 1),
            unknown_resistance: round_to(s, 2),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading<'a>(
        galvanometer: &'a Galvanometer,
        log: &'a ObservationLog<BridgeObservation>,
        deflection: f64,
        known: f64,
        jockey: f64,
    ) -> BridgeReading<'a, BridgeObservation> {
        BridgeReading {
            circuit_on: true,
            galvanometer,
            deflection,
            known_resistance: known,
            jockey_position: jockey,
            log,
        }
    }

    #[test]
    fn test_observation_rounding() {
        let g = Galvanometer::default();
        let log = ObservationLog::new(5);
        let obs = reading(&g, &log, 0.0, 2.0, 66.66).observation().unwrap();
        assert_eq!(obs.serial, 1);
        assert_eq!(obs.balance_length, 66.7);
        assert_eq!(obs.unknown_resistance, 1.0);
    }

    #[test]
    fn test_rule_order() {
        let g = Galvanometer::default();
        let mut log = ObservationLog::new(1);

        let mut r = reading(&g, &log, 3.0, 0.0, 0.0);
        r.circuit_on = false;
        assert_eq!(r.validate(), Err(LabError::CircuitOff));

        let r = reading(&g, &log, 3.0, 0.0, 0.0);
        assert!(matches!(r.validate(), Err(LabError::Unbalanced { .. })));

        let r = reading(&g, &log, 0.1, 0.0, 0.0);
        assert_eq!(r.validate(), Err(LabError::NonPositiveResistance { value: 0.0 }));

        let r = reading(&g, &log, 0.1, 1.0, 0.0);
        assert_eq!(r.validate(), Err(LabError::BoundaryPosition { position: 0.0 }));

        log.push(BridgeObservation {
            serial: 1,
            known_resistance: 1.0,
            balance_length: 50.0,
            unknown_resistance: 1.0,
        })
        .unwrap();
        let r = reading(&g, &log, 0.1, 0.0, 0.0);
        assert_eq!(r.validate(), Err(LabError::LogFull { capacity: 1 }));
    }
}
