//! `fleet-store` — persistent robot and task records.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`store`]    | `FleetStore` — scoped, transactional session acquisition       |
//! | [`session`]  | `Session` — query / create / update / delete / count operations |
//! | [`filter`]   | `TaskFilter` — field-equality selection of task rows           |
//! | [`sqlite`]   | `SqliteStore` — the SQLite backend                             |
//! | [`error`]    | `StoreError`, `StoreResult<T>`                                 |
//!
//! # Sessions
//!
//! All access goes through [`FleetStore::with_session`]: the closure receives
//! a `&mut dyn Session` backed by one transaction.  Returning `Ok` commits;
//! returning `Err` (or panicking) rolls back.  The session is released on
//! every exit path, so callers never hold a connection across a tick.
//!
//! ```rust,ignore
//! let store = SqliteStore::open_in_memory()?;
//! let robot = store.with_session(|s| s.insert_robot(&NewRobot::new("r1", Point::ORIGIN)))?;
//! store.with_session(|s| s.insert_task(&NewTask::new(robot.id, Point::new(10.0, 0.0))))?;
//! ```

pub mod error;
pub mod filter;
pub mod session;
pub mod sqlite;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use filter::TaskFilter;
pub use session::Session;
pub use sqlite::SqliteStore;
pub use store::FleetStore;
