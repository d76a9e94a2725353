//! One running construction of (application, drivers).

use molt_core::{SinkMap, SourceTree};

/// A live instance: the application's sinks, its instrumented sources, and
/// the action that tears its wiring down.
///
/// At most one instance is live per recycler. Disposal is synchronous and
/// idempotent; a dropped instance disposes itself.
pub struct Instance {
    sinks: SinkMap,
    sources: SourceTree,
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Instance {
    /// Assemble an instance from its parts.
    #[must_use]
    pub fn new(sinks: SinkMap, sources: SourceTree, disposer: Box<dyn FnOnce()>) -> Self {
        Self {
            sinks,
            sources,
            disposer: Some(disposer),
        }
    }

    /// The application's named sink streams.
    #[must_use]
    pub fn sinks(&self) -> &SinkMap {
        &self.sinks
    }

    /// The instrumented source tree the application was built from.
    #[must_use]
    pub fn sources(&self) -> &SourceTree {
        &self.sources
    }

    /// Tear down the wiring. Further calls are no-ops.
    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            tracing::debug!("disposing instance");
            disposer();
        }
    }

    /// Whether the wiring has been torn down.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposer.is_none()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("sinks", &self.sinks.keys().collect::<Vec<_>>())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
