//! The capability handed to a running engine.

use fleet_core::SimStatus;

/// What a running [`Engine`][crate::Engine] may do to the world outside
/// its own loop.
///
/// Built fresh by the controller for every launch and moved onto the tick
/// thread, so the engine never needs a reference to the controller itself.
/// A context belongs to one launch: once a newer launch has replaced it,
/// its calls no longer affect the controller's slot or status.
pub trait SimContext: Send + Sync {
    /// Ask the controller to release this execution's slot.  Used when the
    /// engine ends on its own (all tasks done).
    fn request_cancel(&self);

    /// Publish the simulation status.
    fn set_status(&self, status: SimStatus);
}
