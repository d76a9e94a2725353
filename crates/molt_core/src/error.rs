//! Engine error types.

use std::fmt;

/// Engine result type.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine and the contracts it consumes.
///
/// Driver and application failures propagate unchanged; the engine never
/// catches or masks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A driver failed while producing its source tree.
    Driver {
        /// Driver name in its driver set.
        name: String,
        /// Underlying failure description.
        reason: String,
    },

    /// An application failed while building its sinks.
    Application {
        /// Underlying failure description.
        reason: String,
    },

    /// A runtime failed while wiring or starting an instance.
    Runtime {
        /// Underlying failure description.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver { name, reason } => write!(f, "Driver {} failed: {}", name, reason),
            Self::Application { reason } => write!(f, "Application failed: {}", reason),
            Self::Runtime { reason } => write!(f, "Runtime failed: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}
