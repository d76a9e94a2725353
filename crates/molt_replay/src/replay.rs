//! Replay of a recorded log into the current generation's streams.

use crate::state::InstrumentState;
use molt_log::LogEntry;

/// Inject every entry, in original global order, into the proxy stream at
/// its path. Entries whose path has no counterpart in the current tree are
/// skipped: the new application version legitimately dropped that source.
///
/// The log's gate is closed for the duration, so nothing injected here is
/// recorded as newly observed. Injection is synchronous with iteration, so
/// per-path relative order and cross-stream interleaving both survive.
pub fn replay_log(state: &InstrumentState, entries: &[LogEntry]) {
    tracing::debug!(entries = entries.len(), "replaying log");
    state.begin_replay();
    for entry in entries {
        match state.proxy(&entry.path) {
            Some(stream) => {
                tracing::trace!(path = %entry.path, "injecting replayed event");
                stream.inject(entry.event.clone());
            }
            None => {
                tracing::debug!(path = %entry.path, "no stream at logged path, skipping");
            }
        }
    }
    state.end_replay();
}
