//! # Bridge Lab
//!
//! Simulation core for a virtual electrical measurements lab.
//!
//! This library provides:
//! - A metre bridge (Wheatstone slide-wire) with galvanometer and plug resistance box
//! - An Ohm's law board with ammeter, voltmeter and rheostat
//! - A resistance combination bench for the series and parallel laws
//! - Observation tables with recording rules and result calculation
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`physics`] - Formulas, statistics and bench constants
//! - [`apparatus`] - Instrument models (galvanometer, meters, rheostat, resistance box, noise)
//! - [`experiment`] - The three experiments and the [`Experiment`] trait they share
//! - [`report`] - Scripted sessions and text reports (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! bridge-lab metre-bridge --known 2 --known 4 --wire-length 1.0
//! ```
//!
//! ### Library
//!
//! ```
//! use bridge_lab::{Experiment, MetreBridge};
//!
//! let mut bridge = MetreBridge::new();
//! bridge.set_circuit_on(true);
//! bridge.set_known_resistance(5.0).unwrap();
//! bridge.set_jockey_position(50.0).unwrap();
//! assert!(bridge.is_balanced());
//! bridge.record().unwrap();
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmMetreBridge } from 'bridge_lab';
//!
//! const bridge = new WasmMetreBridge();
//! bridge.set_parameter('jockeyPosition', 42.5);
//! ```
//!
//! ## Balance Condition
//!
//! The bridge is balanced when no current flows through the galvanometer:
//!
//! ```text
//! R / S = l / (100 - l)   =>   S = R (100 - l) / l
//! ```
//!
//! Every parameter change recomputes the instrument readings before the
//! setter returns, so readings are never stale.

pub mod apparatus;
pub mod error;
pub mod experiment;
pub mod physics;

#[cfg(feature = "cli")]
pub mod report;

// Re-export main types for convenience
pub use error::{LabError, Result};
pub use experiment::{
    Experiment, ExperimentKind, MetreBridge, OhmsLaw, Parameter, ResistanceCombination,
};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{WasmCombination, WasmMetreBridge, WasmOhmsLaw};
