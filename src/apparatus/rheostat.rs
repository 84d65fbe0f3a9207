//! Sliding rheostat.

use crate::physics::RHEOSTAT_MAX_RESISTANCE;

/// A rheostat used as a variable series resistor.
///
/// Only one end terminal and the slider are wired, so the resistance in
/// circuit is proportional to the slider position:
///
///   R = position / 100 * max_resistance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rheostat {
    pub max_resistance: f64,
    /// Slider position from 0 to 100 %
    position: f64,
}

impl Default for Rheostat {
    fn default() -> Self {
        Self::new(RHEOSTAT_MAX_RESISTANCE, 50.0)
    }
}

impl Rheostat {
    /// Create a new rheostat.
    pub fn new(max_resistance: f64, position: f64) -> Self {
        Self {
            max_resistance: max_resistance.max(0.0),
            position: position.clamp(0.0, 100.0),
        }
    }

    /// Slider position in percent.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move the slider; positions outside the track stop at its ends.
    pub fn set_position(&mut self, position: f64) {
        self.position = position.clamp(0.0, 100.0);
    }

    /// Resistance currently in circuit.
    pub fn resistance(&self) -> f64 {
        self.position / 100.0 * self.max_resistance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistance_follows_slider() {
        let mut rheostat = Rheostat::default();
        assert_eq!(rheostat.resistance(), 5.0);

        rheostat.set_position(0.0);
        assert_eq!(rheostat.resistance(), 0.0);

        rheostat.set_position(250.0);
        assert_eq!(rheostat.position(), 100.0);
        assert_eq!(rheostat.resistance(), 10.0);
    }
}
