//! Error types for the Bridge Lab simulation core.
//!
//! This module provides a unified error type [`LabError`] that covers every
//! rejected action in the lab: observations that may not be recorded,
//! results that cannot be calculated yet, and invalid parameter input.
//!
//! None of these are fatal. A rejected `record()` leaves the observation log
//! untouched and a rejected `calculate()` leaves the previous results in place.

use thiserror::Error;

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Unified error type for all Bridge Lab operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabError {
    // ============ Recording Errors ============
    /// The circuit key is open
    #[error("Circuit is switched off - close the key before recording")]
    CircuitOff,

    /// The galvanometer is not at null
    #[error("Bridge is not balanced (deflection {deflection:.2}°, tolerance {tolerance}°)")]
    Unbalanced { deflection: f64, tolerance: f64 },

    /// The observation table is full
    #[error("Observation table is full ({capacity} readings)")]
    LogFull { capacity: usize },

    /// Known resistance must be positive for S = R(100 - l)/l to mean anything
    #[error("Known resistance must be positive (got {value} Ω)")]
    NonPositiveResistance { value: f64 },

    /// Jockey sits on a wire end, where the balance length is degenerate
    #[error("Jockey at {position:.1} cm is at the end of the wire - no balance length")]
    BoundaryPosition { position: f64 },

    /// Ammeter reading too close to one already in the table
    #[error("Ammeter reading {current:.3} A duplicates an earlier reading - move the rheostat")]
    DuplicateReading { current: f64 },

    // ============ Calculation Errors ============
    /// Not enough observations for the requested calculation
    #[error("Need at least {required} observation(s) to calculate, have {available}")]
    InsufficientObservations { required: usize, available: usize },

    /// All currents are identical, so the V-I slope is undefined
    #[error("Regression is degenerate - all current readings are equal")]
    DegenerateRegression,

    // ============ Parameter Errors ============
    /// Unknown parameter name from the presentation layer
    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    /// Parameter that this experiment does not have
    #[error("Parameter '{param}' is not used by the {experiment} experiment")]
    UnsupportedParameter {
        param: &'static str,
        experiment: &'static str,
    },

    /// Invalid parameter value
    #[error("Invalid value for parameter '{param}': {message}")]
    InvalidParameter { param: &'static str, message: String },

    /// Unknown combination mode name
    #[error("Unknown combination mode '{name}' (expected 'Series' or 'Parallel')")]
    UnknownMode { name: String },

    // ============ Apparatus Errors ============
    /// Plug index outside the resistance box
    #[error("Resistance box has no plug {index} (it has {count})")]
    PlugIndexOutOfRange { index: usize, count: usize },

    // ============ I/O Errors ============
    /// Error writing a report
    #[error("Report output error: {message}")]
    ReportOutputError { message: String },
}

impl LabError {
    /// Create an unbalanced-bridge error
    pub fn unbalanced(deflection: f64, tolerance: f64) -> Self {
        Self::Unbalanced {
            deflection,
            tolerance,
        }
    }

    /// Create an insufficient-observations error
    pub fn insufficient(required: usize, available: usize) -> Self {
        Self::InsufficientObservations {
            required,
            available,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param,
            message: message.into(),
        }
    }

    /// Whether this error came from the observation recorder.
    pub fn is_record_rejection(&self) -> bool {
        matches!(
            self,
            Self::CircuitOff
                | Self::Unbalanced { .. }
                | Self::LogFull { .. }
                | Self::NonPositiveResistance { .. }
                | Self::BoundaryPosition { .. }
                | Self::DuplicateReading { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = LabError::unbalanced(3.25, 0.5);
        assert_eq!(
            err.to_string(),
            "Bridge is not balanced (deflection 3.25°, tolerance 0.5°)"
        );

        let err = LabError::insufficient(2, 1);
        assert_eq!(
            err.to_string(),
            "Need at least 2 observation(s) to calculate, have 1"
        );
    }

    #[test]
    fn test_record_rejection_classification() {
        assert!(LabError::CircuitOff.is_record_rejection());
        assert!(LabError::LogFull { capacity: 5 }.is_record_rejection());
        assert!(!LabError::DegenerateRegression.is_record_rejection());
        assert!(!LabError::insufficient(1, 0).is_record_rejection());
    }
}
