//! Log entry: one observed event at one source-tree position.

use molt_core::{Path, Timestamp, Value};
use serde::{Deserialize, Serialize};

/// One recorded emission. Immutable once appended; ordering between entries
/// is the order of emission, never the timestamp value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position of the emitting stream in the source tree.
    pub path: Path,
    /// The emitted value, unchanged.
    pub event: Value,
    /// Wall clock at emission. Diagnostic only.
    pub time: Timestamp,
}

impl LogEntry {
    /// Create an entry from raw parts.
    #[must_use]
    pub fn new(path: Path, event: Value, time: Timestamp) -> Self {
        Self { path, event, time }
    }

    /// Create an entry stamped with the current wall clock.
    #[must_use]
    pub fn observed_now(path: Path, event: Value) -> Self {
        Self::new(path, event, Timestamp::now())
    }
}
