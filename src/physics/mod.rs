//! Physical constants and closed-form formulas of the lab.
//!
//! Everything here is a pure function of its arguments. The experiment
//! controllers in [`crate::experiment`] feed these with the current apparatus
//! state; nothing in this module holds state of its own.
//!
//! ## Metre bridge
//!
//! A metre bridge is a Wheatstone bridge whose ratio arms are the two parts of
//! a uniform 100 cm wire. With the known resistance R in the left gap and the
//! unknown S in the right gap, the galvanometer reads zero when the jockey
//! divides the wire at l such that
//!
//! ```text
//! R / S = l / (100 - l)    =>    S = R (100 - l) / l
//! ```
//!
//! ## Ohm's law
//!
//! The Ohm's law board is a plain series loop: cell, rheostat, wire under
//! test and ammeter. The voltmeter sits across the wire only.

mod formulas;
mod stats;

pub use formulas::{
    balance_point, parallel_resistance, percentage_error, resistivity, round_to,
    series_resistance, unknown_resistance, wire_cross_section,
};
pub use stats::{least_squares_slope, mean};

// ============ Metre Bridge ============

/// True value of the unknown resistance coil (Ω). Drives the null point the
/// student has to find; never shown to the student.
pub const S_ACTUAL: f64 = 5.0;

/// Length of the bridge wire in cm. Jockey positions are measured along it.
pub const BRIDGE_WIRE_CM: f64 = 100.0;

/// Galvanometer gain in degrees per cm of jockey error.
pub const BALANCE_SENSITIVITY: f64 = 0.8;

/// Deflection below which the galvanometer counts as nulled (degrees).
pub const BALANCE_TOLERANCE: f64 = 0.5;

/// Full-scale deflection of the bridge galvanometer (degrees).
pub const GALVANOMETER_MAX_DEFLECTION: f64 = 45.0;

// ============ Ohm's Law ============

/// Resistance of the wire under test (Ω).
pub const OHMS_LAW_WIRE_RESISTANCE_ACTUAL: f64 = 2.0;

/// Length of the wire under test (cm).
pub const OHMS_LAW_WIRE_LENGTH_ACTUAL: f64 = 100.0;

/// EMF of the cell (V).
pub const BATTERY_EMF: f64 = 6.0;

/// Internal resistance of the cell (Ω).
pub const BATTERY_INTERNAL_RESISTANCE: f64 = 0.5;

/// Rheostat resistance at 100 % (Ω).
pub const RHEOSTAT_MAX_RESISTANCE: f64 = 10.0;

/// Ammeter coil resistance (Ω).
pub const AMMETER_RESISTANCE: f64 = 0.1;

/// Peak-to-peak relative jitter applied to each meter reading (±1 %).
pub const READING_NOISE_AMPLITUDE: f64 = 0.02;

/// Ammeter readings closer than this (A) count as the same rheostat setting.
pub const DUPLICATE_CURRENT_THRESHOLD: f64 = 0.01;

/// Full-scale deflection of the analog meter widgets (degrees).
pub const METER_MAX_DEFLECTION: f64 = 90.0;

/// Full-scale ammeter reading (A).
pub const AMMETER_FULL_SCALE: f64 = 3.0;

/// Full-scale voltmeter reading (V).
pub const VOLTMETER_FULL_SCALE: f64 = 5.0;

// ============ Resistance Combination ============

/// Default value of the first coil (Ω).
pub const R1_ACTUAL: f64 = 6.0;

/// Default value of the second coil (Ω).
pub const R2_ACTUAL: f64 = 3.0;
