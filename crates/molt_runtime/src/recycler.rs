//! The recycler: swaps application logic under a running instance.

use crate::instance::Instance;
use crate::runtime::Runtime;
use indexmap::IndexMap;
use molt_core::{Application, DriverMap, DriverRef, EngineError, SinkMap, SourceTree};
use molt_replay::{instrument, InstrumentedDriver};
use std::rc::Rc;

/// Produces a fresh named driver set, once per instance construction.
pub type DriversFactory = Box<dyn Fn() -> DriverMap>;

/// Replacement failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecycleError {
    /// The first instance never came up.
    #[error("failed to start initial instance: {0}")]
    InitialStart(EngineError),
    /// A replacement instance failed to start. The recycler keeps the
    /// superseded drivers and their logs, so a later `replace` can retry.
    #[error("failed to start replacement instance: {0}")]
    Replace(EngineError),
}

/// Orchestrates live replacement: holds the current instance and the current
/// instrumented driver generation, and on `replace` rebuilds both, replaying
/// the old generation's logs into the new one.
pub struct Recycler<R: Runtime> {
    runtime: R,
    drivers_factory: DriversFactory,
    drivers: IndexMap<String, Rc<InstrumentedDriver>>,
    instance: Option<Instance>,
}

impl<R: Runtime> Recycler<R> {
    /// Instrument the factory's drivers and start the first instance.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleError::InitialStart`] if the first instance fails to
    /// come up.
    pub fn new(
        runtime: R,
        app: &dyn Application,
        drivers_factory: DriversFactory,
    ) -> Result<Self, RecycleError> {
        let drivers = instrument_set(&drivers_factory);
        let instance = runtime
            .start(app, &driver_map(&drivers))
            .map_err(RecycleError::InitialStart)?;

        Ok(Self {
            runtime,
            drivers_factory,
            drivers,
            instance: Some(instance),
        })
    }

    /// Replace the running application: dispose the current instance, build
    /// a fresh instrumented driver set, start `app` against it, and replay
    /// every superseded driver's log into its same-named successor.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleError::Replace`] if the new instance fails to start.
    /// The recycler is then instance-less but keeps the superseded drivers
    /// and their logs; a later call may retry with the same or different
    /// application logic.
    pub fn replace(&mut self, app: &dyn Application) -> Result<(), RecycleError> {
        if let Some(mut old) = self.instance.take() {
            tracing::debug!("replacing running instance");
            old.dispose();
        }
        // Freeze the superseded generation's logs: its taps stop observing
        // streams it may share with the successor.
        for driver in self.drivers.values() {
            driver.dispose();
        }

        let new_drivers = instrument_set(&self.drivers_factory);
        let instance = match self.runtime.start(app, &driver_map(&new_drivers)) {
            Ok(instance) => instance,
            Err(err) => {
                // The failed generation's taps must not stay attached to
                // streams it may share with a later retry.
                for driver in new_drivers.values() {
                    driver.dispose();
                }
                return Err(RecycleError::Replace(err));
            }
        };

        for (name, new_driver) in &new_drivers {
            if let Some(old_driver) = self.drivers.get(name) {
                let log = old_driver.log();
                tracing::debug!(driver = %name, entries = log.len(), "replaying driver log");
                new_driver.replay_log(&log);
            }
        }

        self.drivers = new_drivers;
        self.instance = Some(instance);
        Ok(())
    }

    /// The current instance's sinks, if an instance is live.
    #[must_use]
    pub fn sinks(&self) -> Option<&SinkMap> {
        self.instance.as_ref().map(Instance::sinks)
    }

    /// The current instance's instrumented sources, if an instance is live.
    #[must_use]
    pub fn sources(&self) -> Option<&SourceTree> {
        self.instance.as_ref().map(Instance::sources)
    }

    /// Whether an instance is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.instance.is_some()
    }
}

fn instrument_set(factory: &DriversFactory) -> IndexMap<String, Rc<InstrumentedDriver>> {
    factory()
        .into_iter()
        .map(|(name, driver)| (name, Rc::new(instrument(driver))))
        .collect()
}

fn driver_map(drivers: &IndexMap<String, Rc<InstrumentedDriver>>) -> DriverMap {
    drivers
        .iter()
        .map(|(name, driver)| (name.clone(), driver.clone() as DriverRef))
        .collect()
}
