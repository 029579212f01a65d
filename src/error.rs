//! Error types for rollstats.
//!
//! Only precondition violations surface as errors. Malformed numbers in a
//! payload (negative troop counts, non-finite scores) are not errors: the
//! analysis passes them through its formulas and callers own validation.

use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// `reselect` was called before any simulation result was stored.
    #[error("No active simulation: run a simulation before changing the selection")]
    NoActiveSimulation,

    #[error("Malformed simulation payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rollstats operations.
pub type Result<T> = std::result::Result<T, Error>;
