//! Contracts the engine consumes: drivers and applications.
//!
//! Both are specified only at their interface. Closures satisfy them via
//! blanket impls, matching how test and demo code writes them.

use crate::error::EngineResult;
use crate::stream::SourceRef;
use crate::tree::SourceTree;
use indexmap::IndexMap;
use std::rc::Rc;

/// Named sink streams returned by an application.
pub type SinkMap = IndexMap<String, SourceRef>;

/// Named drivers, as produced by a driver factory.
pub type DriverMap = IndexMap<String, DriverRef>;

/// A driver: talks to the outside world and hands the application a tree of
/// sources, consuming the application's sink stream for its name.
///
/// Must be callable once per instance construction, and its returned streams
/// must tolerate being subscribed to multiple times across the process
/// lifetime.
pub trait Driver {
    /// Produce this driver's source tree, given the sink stream that will
    /// carry the application's output back to it.
    fn connect(&self, sink: SourceRef) -> EngineResult<SourceTree>;
}

/// Shared handle to a driver.
pub type DriverRef = Rc<dyn Driver>;

impl<F> Driver for F
where
    F: Fn(SourceRef) -> EngineResult<SourceTree>,
{
    fn connect(&self, sink: SourceRef) -> EngineResult<SourceTree> {
        self(sink)
    }
}

/// An application: a pure function from sources to named sink streams.
/// Invoked fresh on every instance construction.
pub trait Application {
    /// Build the application's sinks from the instrumented source tree.
    fn build(&self, sources: &SourceTree) -> EngineResult<SinkMap>;
}

/// Shared handle to an application.
pub type AppRef = Rc<dyn Application>;

impl<F> Application for F
where
    F: Fn(&SourceTree) -> EngineResult<SinkMap>,
{
    fn build(&self, sources: &SourceTree) -> EngineResult<SinkMap> {
        self(sources)
    }
}
