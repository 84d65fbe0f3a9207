//! Models of the bench apparatus.
//!
//! This module provides the instruments and controls the student handles:
//! - Galvanometer: centre-zero null detector of the bridge
//! - AnalogMeter: needle ammeter / voltmeter widget
//! - ResistanceBox: plug-type box supplying the known resistance
//! - Rheostat: sliding variable resistor of the Ohm's law circuit
//! - NoiseSource: random source behind the meter jitter
//!
//! Apparatus types know nothing about observation tables; the experiment
//! controllers in [`crate::experiment`] own them and wire them together.

mod galvanometer;
mod meter;
mod noise;
mod resistance_box;
mod rheostat;

pub use galvanometer::Galvanometer;
pub use meter::AnalogMeter;
pub use noise::{jitter, FixedNoise, NoiseSource, SeededNoise, SequenceNoise, ThreadRngNoise};
pub use resistance_box::{Plug, ResistanceBox, STANDARD_PLUGS};
pub use rheostat::Rheostat;
