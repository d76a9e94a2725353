//! Per-driver instrumentation state: log, proxy table, and tap handles.
//!
//! One `InstrumentState` exists per instrumented-driver generation. It is
//! never shared across generations and never global, so multiple recyclers
//! (and tests) cannot interfere with each other.

use indexmap::IndexMap;
use molt_core::{Path, SourceRef, SubscriptionId, Value};
use molt_log::{LogEntry, SourceLog};
use std::cell::RefCell;

/// Paths of the current source tree mapped to this generation's delivery
/// streams, the targets replayed events are injected into. Rebuilt every
/// time a driver generation is connected.
pub type ProxyTable = IndexMap<Path, SourceRef>;

/// Shared mutable state of one instrumented driver generation.
pub struct InstrumentState {
    log: RefCell<SourceLog>,
    proxies: RefCell<ProxyTable>,
    taps: RefCell<Vec<(SourceRef, SubscriptionId)>>,
}

impl InstrumentState {
    /// Create empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: RefCell::new(SourceLog::new()),
            proxies: RefCell::new(ProxyTable::new()),
            taps: RefCell::new(Vec::new()),
        }
    }

    /// Record an observed event, stamped now. Dropped while replaying.
    pub fn record(&self, path: Path, event: Value) {
        self.log.borrow_mut().append(LogEntry::observed_now(path, event));
    }

    /// Point `path` at the live stream currently reachable there.
    pub fn register_proxy(&self, path: Path, stream: SourceRef) {
        self.proxies.borrow_mut().insert(path, stream);
    }

    /// Resolve the stream at `path` in the current tree, if any.
    #[must_use]
    pub fn proxy(&self, path: &Path) -> Option<SourceRef> {
        self.proxies.borrow().get(path).cloned()
    }

    /// Every registered path, in registration order.
    #[must_use]
    pub fn proxy_paths(&self) -> Vec<Path> {
        self.proxies.borrow().keys().cloned().collect()
    }

    /// Remember a tap subscription so it can be cancelled on disposal.
    pub fn register_tap(&self, stream: SourceRef, id: SubscriptionId) {
        self.taps.borrow_mut().push((stream, id));
    }

    /// Cancel every tap. A superseded generation stops observing streams it
    /// may share with its successor. Idempotent.
    pub fn dispose_taps(&self) {
        let taps: Vec<_> = self.taps.borrow_mut().drain(..).collect();
        for (stream, id) in taps {
            stream.unsubscribe(id);
        }
    }

    /// Close the log's replay gate.
    pub fn begin_replay(&self) {
        self.log.borrow_mut().begin_replay();
    }

    /// Reopen the log's replay gate.
    pub fn end_replay(&self) {
        self.log.borrow_mut().end_replay();
    }

    /// Whether a replay is in progress.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.log.borrow().is_replaying()
    }

    /// Owned copy of the log entries, in emission order.
    #[must_use]
    pub fn log_snapshot(&self) -> Vec<LogEntry> {
        self.log.borrow().snapshot()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.log.borrow().len()
    }
}

impl Default for InstrumentState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InstrumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentState")
            .field("log_len", &self.log_len())
            .field("proxies", &self.proxy_paths())
            .finish()
    }
}
