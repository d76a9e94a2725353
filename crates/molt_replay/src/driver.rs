//! Instrumented driver: same call surface as the wrapped driver, plus a
//! readable log and a replay entry point.

use crate::replay::replay_log;
use crate::state::InstrumentState;
use crate::walk::instrument_tree;
use molt_core::{Driver, DriverRef, EngineResult, Kind, Path, SourceRef, SourceTree};
use molt_log::LogEntry;
use std::rc::Rc;

/// A driver whose source tree is transparently logged and replayable.
///
/// One generation of instrumentation: owns its log, proxy table, and tap
/// subscriptions. Built by [`instrument`].
pub struct InstrumentedDriver {
    inner: DriverRef,
    state: Rc<InstrumentState>,
}

/// Wrap a driver with logging and replay capabilities.
#[must_use]
pub fn instrument(driver: DriverRef) -> InstrumentedDriver {
    InstrumentedDriver {
        inner: driver,
        state: Rc::new(InstrumentState::new()),
    }
}

impl InstrumentedDriver {
    /// The recorded entries, in emission order. Read-only hand-off for the
    /// successor generation.
    #[must_use]
    pub fn log(&self) -> Vec<LogEntry> {
        self.state.log_snapshot()
    }

    /// Re-emit a prior generation's log into this generation's streams.
    pub fn replay_log(&self, entries: &[LogEntry]) {
        replay_log(&self.state, entries);
    }

    /// Every path currently registered in the proxy table.
    #[must_use]
    pub fn proxy_paths(&self) -> Vec<Path> {
        self.state.proxy_paths()
    }

    /// Cancel this generation's taps. Call when a newer generation takes
    /// over streams the two may share.
    pub fn dispose(&self) {
        self.state.dispose_taps();
    }
}

impl Driver for InstrumentedDriver {
    fn connect(&self, sink: SourceRef) -> EngineResult<SourceTree> {
        let tree = self.inner.connect(sink)?;
        // A bare stream or factory at the root logs under `:root`; a record
        // starts from the empty path so keys read as `/key`.
        let root = match tree.kind() {
            Kind::Structured => Path::empty(),
            _ => Path::root(),
        };
        Ok(instrument_tree(tree, &root, &self.state))
    }
}

impl std::fmt::Debug for InstrumentedDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentedDriver")
            .field("state", &self.state)
            .finish()
    }
}
