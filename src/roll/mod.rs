//! Simulation payload types as produced by the roll engine.

pub mod types;

pub use types::*;
