//! Centre-zero galvanometer of the metre bridge.

use crate::physics::{
    balance_point, BALANCE_SENSITIVITY, BALANCE_TOLERANCE, BRIDGE_WIRE_CM,
    GALVANOMETER_MAX_DEFLECTION,
};

/// A galvanometer across the bridge's detector arm.
///
/// Deflection is linear in the distance between the jockey and the null
/// point and saturates at `max_deflection` on either side:
///
/// ```text
/// θ = clamp((p - l₀) · sensitivity, -max, +max),   l₀ = 100 R / (R + S)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galvanometer {
    /// Degrees of deflection per cm of jockey error.
    pub sensitivity: f64,
    /// Full-scale deflection in degrees (symmetric).
    pub max_deflection: f64,
    /// Deflections strictly below this magnitude count as null.
    pub tolerance: f64,
}

impl Default for Galvanometer {
    fn default() -> Self {
        Self {
            sensitivity: BALANCE_SENSITIVITY,
            max_deflection: GALVANOMETER_MAX_DEFLECTION,
            tolerance: BALANCE_TOLERANCE,
        }
    }
}

impl Galvanometer {
    /// Create a galvanometer with custom gain, full scale and null band.
    pub fn new(sensitivity: f64, max_deflection: f64, tolerance: f64) -> Self {
        Self {
            sensitivity,
            max_deflection: max_deflection.abs(),
            tolerance: tolerance.abs(),
        }
    }

    /// Needle deflection in degrees for the given bridge state.
    ///
    /// An open key always reads 0. When `known + unknown <= 0` there is no
    /// null point and the needle pins toward the nearer end of the wire.
    pub fn deflection(&self, circuit_on: bool, jockey: f64, known: f64, unknown: f64) -> f64 {
        if !circuit_on {
            return 0.0;
        }

        let Some(null_point) = balance_point(known, unknown) else {
            return if jockey > BRIDGE_WIRE_CM / 2.0 {
                self.max_deflection
            } else {
                -self.max_deflection
            };
        };

        let raw = (jockey - null_point) * self.sensitivity;
        raw.clamp(-self.max_deflection, self.max_deflection)
    }

    /// Whether a deflection lies inside the null band.
    pub fn is_null(&self, deflection: f64) -> bool {
        deflection.abs() < self.tolerance
    }

    /// Balanced means energised and nulled.
    pub fn is_balanced(&self, circuit_on: bool, deflection: f64) -> bool {
        circuit_on && self.is_null(deflection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_off_reads_zero() {
        let g = Galvanometer::default();
        assert_eq!(g.deflection(false, 37.0, 8.0, 5.0), 0.0);
        assert_eq!(g.deflection(false, 0.0, -1.0, 0.0), 0.0);
        assert!(!g.is_balanced(false, 0.0));
    }

    #[test]
    fn test_zero_at_null_point() {
        let g = Galvanometer::default();
        let l0 = balance_point(2.0, 5.0).unwrap();
        assert_eq!(g.deflection(true, l0, 2.0, 5.0), 0.0);
        assert!(g.is_balanced(true, g.deflection(true, l0, 2.0, 5.0)));
    }

    #[test]
    fn test_linear_and_monotonic() {
        let g = Galvanometer::default();
        // Null at 50 cm for equal arms
        assert_relative_eq!(g.deflection(true, 60.0, 5.0, 5.0), 8.0, epsilon = 1e-12);
        assert_relative_eq!(g.deflection(true, 40.0, 5.0, 5.0), -8.0, epsilon = 1e-12);

        let mut previous = f64::NEG_INFINITY;
        for step in 0..=1000 {
            let p = step as f64 * 0.1;
            let d = g.deflection(true, p, 5.0, 5.0);
            assert!(d >= previous);
            previous = d;
        }
    }

    #[test]
    fn test_clamped() {
        let g = Galvanometer::default();
        assert_eq!(g.deflection(true, 100.0, 1.0, 10.0), 45.0);
        assert_eq!(g.deflection(true, 0.0, 10.0, 1.0), -45.0);

        let wide = Galvanometer::new(0.8, 90.0, 0.5);
        assert_relative_eq!(wide.deflection(true, 100.0, 1.0, 10.0), (100.0 - 100.0 / 11.0) * 0.8);
    }

    #[test]
    fn test_degenerate_saturates_toward_nearer_end() {
        let g = Galvanometer::default();
        assert_eq!(g.deflection(true, 70.0, 0.0, 0.0), 45.0);
        assert_eq!(g.deflection(true, 50.0, 0.0, 0.0), -45.0);
        assert_eq!(g.deflection(true, 10.0, -2.0, 1.0), -45.0);
    }

    #[test]
    fn test_tolerance_band() {
        let g = Galvanometer::default();
        assert!(g.is_balanced(true, 0.49));
        assert!(g.is_balanced(true, -0.49));
        assert!(!g.is_balanced(true, 0.5));
        assert!(!g.is_balanced(true, -0.5));
    }
}
