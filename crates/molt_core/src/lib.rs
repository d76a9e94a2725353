//! MOLT Core Types
//!
//! Pure types for the source-replay engine: the push-stream contract,
//! Kind-tagged source trees, stable path identifiers, timestamps, and
//! engine errors. No I/O lives here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod kind;
pub mod path;
pub mod stream;
pub mod time;
pub mod tree;

// Re-exports
pub use contract::{AppRef, Application, Driver, DriverMap, DriverRef, SinkMap};
pub use error::{EngineError, EngineResult};
pub use kind::Kind;
pub use path::Path;
pub use stream::{Observer, Source, SourceRef, Subject, SubscriptionId, Value};
pub use time::Timestamp;
pub use tree::{SourceFactory, SourceTree, SCOPE_KEY};
