//! Closed-form formulas used by the three experiments.
//!
//! Every function guards its own divisor and returns `None` where the
//! quantity is undefined instead of producing NaN or infinity.

use std::f64::consts::PI;

use super::BRIDGE_WIRE_CM;

/// Jockey position (cm from the left end) at which a bridge with `known`
/// in the left gap and `unknown` in the right gap is balanced.
///
/// Returns `None` when `known + unknown <= 0`.
pub fn balance_point(known: f64, unknown: f64) -> Option<f64> {
    let total = known + unknown;
    if total <= 0.0 {
        return None;
    }
    Some(BRIDGE_WIRE_CM * known / total)
}

/// Unknown resistance from a balance length: `S = R (100 - l) / l`.
///
/// Returns `None` for `l <= 0`, where the formula divides by zero.
pub fn unknown_resistance(known: f64, balance_length: f64) -> Option<f64> {
    if balance_length <= 0.0 {
        return None;
    }
    Some(known * (BRIDGE_WIRE_CM - balance_length) / balance_length)
}

/// Cross-sectional area (m²) of a round wire of the given diameter in mm.
pub fn wire_cross_section(diameter_mm: f64) -> f64 {
    let radius_m = diameter_mm / 2.0 * 1e-3;
    PI * radius_m * radius_m
}

/// Specific resistance ρ = S·A/L in Ω·m.
///
/// `diameter_mm` is converted to metres; `length_m` must be positive.
pub fn resistivity(resistance: f64, diameter_mm: f64, length_m: f64) -> Option<f64> {
    if length_m <= 0.0 {
        return None;
    }
    Some(resistance * wire_cross_section(diameter_mm) / length_m)
}

/// Equivalent resistance of two resistors in series.
pub fn series_resistance(r1: f64, r2: f64) -> f64 {
    r1 + r2
}

/// Equivalent resistance of two resistors in parallel.
///
/// Two shorted coils (`r1 + r2 == 0`) give 0 Ω.
pub fn parallel_resistance(r1: f64, r2: f64) -> f64 {
    let sum = r1 + r2;
    if sum == 0.0 {
        return 0.0;
    }
    r1 * r2 / sum
}

/// `|experimental - theoretical| / theoretical × 100`.
///
/// Returns `None` when the theoretical value is zero.
pub fn percentage_error(experimental: f64, theoretical: f64) -> Option<f64> {
    if theoretical == 0.0 {
        return None;
    }
    Some(((experimental - theoretical) / theoretical).abs() * 100.0)
}

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
