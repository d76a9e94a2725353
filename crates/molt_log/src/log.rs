//! The append-only source log and its replay gate.

use crate::entry::LogEntry;

/// Emission-ordered log of everything one instrumented driver observed.
///
/// The log is owned by exactly one driver generation. At replacement time the
/// completed log is handed, read-only, to the successor; while the successor
/// replays it, its own log's gate is closed so replayed events are not
/// re-recorded.
#[derive(Debug, Default)]
pub struct SourceLog {
    entries: Vec<LogEntry>,
    replaying: bool,
}

impl SourceLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A no-op while a replay is in progress.
    pub fn append(&mut self, entry: LogEntry) {
        if self.replaying {
            tracing::trace!(path = %entry.path, "replay in progress, not recording");
            return;
        }
        tracing::trace!(path = %entry.path, "recorded event");
        self.entries.push(entry);
    }

    /// Close the gate: subsequent appends are dropped.
    pub fn begin_replay(&mut self) {
        tracing::debug!(entries = self.entries.len(), "replay gate closed");
        self.replaying = true;
    }

    /// Reopen the gate.
    pub fn end_replay(&mut self) {
        tracing::debug!("replay gate opened");
        self.replaying = false;
    }

    /// Whether a replay is in progress.
    #[must_use]
    pub const fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// The recorded entries, in emission order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Iterate the recorded entries, in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// Owned copy of the entries, for hand-off to a successor.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
