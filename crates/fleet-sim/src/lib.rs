//! `fleet-sim` — tick engine and lifecycle controller for the robot fleet.
//!
//! # Tick loop
//!
//! ```text
//! loop:
//!   for robot in store.robots() (ascending id), one session each:
//!     ① Low battery  — below threshold and no pending charge task:
//!                      insert charge task (priority 999, target = start),
//!                      skip movement this tick.
//!     ② Select       — highest priority, oldest incomplete task;
//!                      none → status idle.
//!     ③ Advance      — fleet_mobility::step; drain battery (floor 0).
//!     ④ Status       — charging for a charge task, moving otherwise.
//!     ⑤ Complete     — normal task: on arrival.
//!                      charge task: arrival adds charge_per_tick each
//!                      tick; complete once the battery is full.
//!     ⑥ Commit       — session commits before the next robot.
//!   no incomplete tasks → status finished, request cancel, exit.
//!   suspend tick_period; cancelled → status stopped, exit.
//! ```
//!
//! # Lifecycle
//!
//! [`SimController`] owns the single execution slot and launches the
//! [`Engine`] on a `fleet-tick` thread.  The engine reports back only through
//! the narrow [`SimContext`] capability it is handed at launch.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fleet_sim::SimController;
//! use fleet_store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::open_in_memory()?);
//! let sim = SimController::builder(Arc::clone(&store)).build()?;
//! sim.start()?;
//! ```

pub mod builder;
pub mod cancel;
pub mod context;
pub mod controller;
pub mod engine;
pub mod error;
pub mod observer;


pub use builder::SimControllerBuilder;
pub use cancel::{CancelHandle, CancelToken, cancel_pair};
pub use context::SimContext;
pub use controller::{SimController, StartOutcome};
pub use engine::{Engine, TickReport};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ObserverFactory, SimObserver};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a panicking thread poisoned it.
/// Every guarded value here stays consistent across a panic (plain status
/// words and slot handles), so the poison flag carries no information.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
