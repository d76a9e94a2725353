//! MOLT Event Log
//!
//! Append-only, emission-ordered record of everything an instrumented
//! driver's streams emitted during one instance's lifetime, with the
//! replay-suppression gate that keeps replayed events from being recorded
//! as if they were newly observed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod log;

pub use entry::LogEntry;
pub use log::SourceLog;
