//! The runtime contract and a local single-threaded implementation.

use crate::instance::Instance;
use indexmap::IndexMap;
use molt_core::{
    Application, DriverMap, EngineResult, Source, SourceRef, SourceTree, Subject, SubscriptionId,
};
use std::rc::Rc;

/// Orchestration glue: wires an application to a set of drivers and starts
/// the result. Consumed at its interface; [`LocalRuntime`] is the reference
/// implementation.
pub trait Runtime {
    /// Build and start an instance. Driver and application errors propagate
    /// unchanged.
    fn start(&self, app: &dyn Application, drivers: &DriverMap) -> EngineResult<Instance>;
}

/// Single-threaded runtime: one sink proxy per driver, sources assembled
/// into a record keyed by driver name, application sinks forwarded into the
/// matching driver's sink proxy.
#[derive(Debug, Default)]
pub struct LocalRuntime;

impl LocalRuntime {
    /// Create a local runtime.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Runtime for LocalRuntime {
    fn start(&self, app: &dyn Application, drivers: &DriverMap) -> EngineResult<Instance> {
        let mut sink_proxies: IndexMap<String, SourceRef> = IndexMap::new();
        let mut sources_by_driver = IndexMap::new();

        for (name, driver) in drivers {
            let proxy: SourceRef = Rc::new(Subject::new());
            let tree = driver.connect(proxy.clone())?;
            sink_proxies.insert(name.clone(), proxy);
            sources_by_driver.insert(name.clone(), tree);
        }

        let sources = SourceTree::Structured(sources_by_driver);
        let sinks = app.build(&sources)?;

        // Forward each application sink into its driver's sink proxy. Sinks
        // without a matching driver stay observable but drive nothing.
        let mut wires: Vec<(SourceRef, SubscriptionId)> = Vec::new();
        for (name, sink_stream) in &sinks {
            if let Some(proxy) = sink_proxies.get(name) {
                let target = proxy.clone();
                let id = sink_stream.subscribe(Box::new(move |value| target.inject(value.clone())));
                wires.push((sink_stream.clone(), id));
            }
        }

        tracing::debug!(
            drivers = drivers.len(),
            wires = wires.len(),
            "instance started"
        );

        let disposer = Box::new(move || {
            for (stream, id) in wires {
                stream.unsubscribe(id);
            }
        });

        Ok(Instance::new(sinks, sources, disposer))
    }
}
