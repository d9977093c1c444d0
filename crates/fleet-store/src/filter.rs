//! Task selection by field equality.

use fleet_core::{RobotId, TaskKind};

/// Field-equality filter over task records.
///
/// Every `Some` field must match; `None` fields are ignored, so
/// `TaskFilter::default()` selects every task.
///
/// ```rust,ignore
/// // This robot's pending work, highest priority first:
/// let next = session.first_task(&TaskFilter::default().robot(id).incomplete())?;
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub robot:        Option<RobotId>,
    pub complete:     Option<bool>,
    pub kind:         Option<TaskKind>,
    /// Excludes tasks of this kind.
    pub exclude_kind: Option<TaskKind>,
}

impl TaskFilter {
    /// Matches every task.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn robot(mut self, robot: RobotId) -> Self {
        self.robot = Some(robot);
        self
    }

    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = Some(complete);
        self
    }

    /// Shorthand for `.complete(false)`.
    pub fn incomplete(self) -> Self {
        self.complete(false)
    }

    pub fn kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn not_kind(mut self, kind: TaskKind) -> Self {
        self.exclude_kind = Some(kind);
        self
    }
}
