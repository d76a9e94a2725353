//! MOLT Runtime
//!
//! One running construction of (application, drivers) is an [`Instance`];
//! the [`Recycler`] tears an instance down, builds a successor from new
//! application logic, and replays the old instrumented drivers' logs so the
//! successor reaches an equivalent state without touching the outside world.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod instance;
pub mod recycler;
pub mod runtime;

pub use instance::Instance;
pub use recycler::{DriversFactory, RecycleError, Recycler};
pub use runtime::{LocalRuntime, Runtime};
