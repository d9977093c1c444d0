//! The `FleetStore` trait: the storage collaborator consumed by the engine.

use crate::{Session, StoreResult};

/// A shared, thread-safe source of transactional [`Session`]s.
///
/// The engine runs on its own thread while API callers create and edit
/// records concurrently, so implementations must be `Send + Sync` and
/// serialise sessions themselves.  Neither side holds a session across a
/// whole tick: each robot update is its own session.
///
/// # Contract
///
/// - `f` runs inside exactly one transaction.
/// - `Ok` from `f` commits before `with_session` returns.
/// - `Err` from `f`, a failed commit, or a panic inside `f` rolls back.
/// - The underlying connection is released on every exit path.
pub trait FleetStore: Send + Sync + 'static {
    fn with_session<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut dyn Session) -> StoreResult<T>;
}

impl<S: FleetStore> FleetStore for std::sync::Arc<S> {
    #[inline]
    fn with_session<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut dyn Session) -> StoreResult<T>,
    {
        (**self).with_session(f)
    }
}
