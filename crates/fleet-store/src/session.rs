//! The `Session` trait: everything the engine and the API surface may do
//! with stored records inside one transaction.

use fleet_core::{NewRobot, NewTask, Robot, RobotId, Task, TaskId};

use crate::{StoreResult, TaskFilter};

/// One transactional view of the store.
///
/// Obtained only through [`FleetStore::with_session`][crate::FleetStore::with_session];
/// changes become visible to other sessions when the closure returns `Ok`.
///
/// # Ordering
///
/// [`robots`][Self::robots] lists robots by ascending id.
/// [`tasks`][Self::tasks] and [`first_task`][Self::first_task] order by
/// priority descending, then creation time ascending, then id ascending, so
/// the first matching task is the one a robot should work on.
pub trait Session {
    // ── Robots ────────────────────────────────────────────────────────────

    /// Every robot, ascending id.
    fn robots(&mut self) -> StoreResult<Vec<Robot>>;

    fn robot(&mut self, id: RobotId) -> StoreResult<Option<Robot>>;

    /// Create a robot positioned at its start point.  Names are unique.
    fn insert_robot(&mut self, new: &NewRobot) -> StoreResult<Robot>;

    /// Overwrite every mutable field of an existing robot.
    fn update_robot(&mut self, robot: &Robot) -> StoreResult<()>;

    /// Delete a robot together with all of its tasks.  Returns `false` if
    /// the robot did not exist.
    fn delete_robot(&mut self, id: RobotId) -> StoreResult<bool>;

    // ── Tasks ─────────────────────────────────────────────────────────────

    /// Matching tasks in selection order.
    fn tasks(&mut self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// The first matching task in selection order.
    fn first_task(&mut self, filter: &TaskFilter) -> StoreResult<Option<Task>>;

    fn task(&mut self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Create a task, stamped with the current time.  The owning robot must
    /// exist.
    fn insert_task(&mut self, new: &NewTask) -> StoreResult<Task>;

    /// Overwrite every mutable field of an existing task.
    fn update_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Delete one task; `false` if no task had that id.
    fn delete_task(&mut self, id: TaskId) -> StoreResult<bool>;

    /// Delete matching tasks; returns how many were removed.
    fn delete_tasks(&mut self, filter: &TaskFilter) -> StoreResult<usize>;

    fn count_tasks(&mut self, filter: &TaskFilter) -> StoreResult<usize>;

    /// Set the completion flag on every matching task; returns how many rows
    /// were touched.
    fn set_tasks_complete(&mut self, filter: &TaskFilter, complete: bool) -> StoreResult<usize>;
}
