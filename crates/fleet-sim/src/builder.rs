//! Fluent builder for constructing a [`SimController`].

use std::sync::Arc;

use fleet_core::FleetConfig;
use fleet_store::FleetStore;

use crate::{ObserverFactory, SimController, SimObserver, SimResult};

/// Fluent builder for [`SimController<S>`].
///
/// # Required inputs
///
/// - `store`: any [`FleetStore`], shared with the caller through an `Arc`
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                  |
/// |--------------------------|--------------------------|
/// | `.config(c)`             | `FleetConfig::default()` |
/// | `.observer_factory(f)`   | no observer              |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimController::builder(Arc::clone(&store))
///     .config(FleetConfig::default().with_tick_period_ms(100))
///     .observer_factory(|| Box::new(ProgressPrinter))
///     .build()?;
/// ```
pub struct SimControllerBuilder<S: FleetStore> {
    store:     Arc<S>,
    config:    FleetConfig,
    observers: Option<ObserverFactory>,
}

impl<S: FleetStore> SimControllerBuilder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, config: FleetConfig::default(), observers: None }
    }

    pub fn config(mut self, config: FleetConfig) -> Self {
        self.config = config;
        self
    }

    /// Called once per launch; each run gets a fresh observer.
    pub fn observer_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SimObserver> + Send + Sync + 'static,
    {
        self.observers = Some(Arc::new(factory));
        self
    }

    /// Validate the configuration and build the controller.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`][crate::SimError::Config] if the configuration
    /// fails [`FleetConfig::validate`].
    pub fn build(self) -> SimResult<SimController<S>> {
        self.config.validate()?;
        Ok(SimController::from_parts(self.store, self.config, self.observers))
    }
}
