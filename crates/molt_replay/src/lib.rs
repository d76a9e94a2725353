//! MOLT Source Instrumentation & Replay
//!
//! Wraps a driver so every stream reachable from its source tree is tapped
//! into an append-only log, and feeds a prior generation's log back into the
//! structurally equivalent streams of a fresh generation, in original global
//! order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod replay;
pub mod state;
pub mod walk;

pub use driver::{instrument, InstrumentedDriver};
pub use replay::replay_log;
pub use state::{InstrumentState, ProxyTable};
pub use walk::instrument_tree;
