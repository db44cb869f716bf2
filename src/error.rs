//! Error types for path construction and simulation
//!
//! Every failure in this crate is a usage error: an index outside its bound,
//! a sample vector that is too short, or a reserved variable that was never
//! defined. None of them are transient, so nothing here is retried.

use thiserror::Error;

/// Errors raised by time grids, states, paths and the Wiener engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A time (or path) index outside `[0, len)`
    #[error("time index {index} out of range for {len} time points")]
    TimeIndexOutOfRange { index: usize, len: usize },

    /// A state variable whose index does not fit the state
    #[error("state variable {index} out of range for state of size {size}")]
    VariableOutOfRange { index: usize, size: usize },

    /// Fewer Brownian samples than one per grid transition
    #[error("path needs {required} brownian samples, got {supplied}")]
    InsufficientSamples { required: usize, supplied: usize },

    /// A reserved variable slot that never received a definition
    #[error("state variable {index} was reserved but never defined")]
    UndefinedVariable { index: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PathError>;
