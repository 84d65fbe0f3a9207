//! Needle meters of the Ohm's law board.

use crate::physics::{AMMETER_FULL_SCALE, METER_MAX_DEFLECTION, VOLTMETER_FULL_SCALE};

/// An analog moving-coil meter.
///
/// The needle swings linearly with the reading, reaching `max_deflection`
/// at `full_scale`, and pins there for larger readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogMeter {
    pub full_scale: f64,
    pub max_deflection: f64,
}

impl AnalogMeter {
    /// Create a meter with the given full-scale reading.
    pub fn new(full_scale: f64) -> Self {
        Self {
            full_scale,
            max_deflection: METER_MAX_DEFLECTION,
        }
    }

    /// The 0-3 A ammeter.
    pub fn ammeter() -> Self {
        Self::new(AMMETER_FULL_SCALE)
    }

    /// The 0-5 V voltmeter.
    pub fn voltmeter() -> Self {
        Self::new(VOLTMETER_FULL_SCALE)
    }

    /// Needle angle in degrees for a reading.
    pub fn needle_deflection(&self, reading: f64) -> f64 {
        if self.full_scale <= 0.0 {
            return 0.0;
        }
        (reading / self.full_scale * self.max_deflection)
            .clamp(-self.max_deflection, self.max_deflection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needle_deflection() {
        let a = AnalogMeter::ammeter();
        assert_eq!(a.needle_deflection(0.0), 0.0);
        assert_eq!(a.needle_deflection(1.5), 45.0);
        assert_eq!(a.needle_deflection(3.0), 90.0);
        assert_eq!(a.needle_deflection(7.0), 90.0);
        assert_eq!(a.needle_deflection(-7.0), -90.0);
    }

    #[test]
    fn test_zero_full_scale() {
        assert_eq!(AnalogMeter::new(0.0).needle_deflection(1.0), 0.0);
    }
}
