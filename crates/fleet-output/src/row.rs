//! Plain data row types written by output backends.

use fleet_core::{Robot, Tick};
use fleet_sim::TickReport;

/// One robot's state after its turn in a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotSnapshotRow {
    pub tick:     u64,
    pub robot_id: i64,
    pub name:     String,
    pub x:        f64,
    pub y:        f64,
    pub battery:  f64,
    pub status:   &'static str,
    /// The task being worked on; `None` when idle.
    pub task_id:  Option<i64>,
}

impl RobotSnapshotRow {
    pub fn new(tick: Tick, robot: &Robot) -> Self {
        Self {
            tick:     tick.0,
            robot_id: robot.id.get(),
            name:     robot.name.clone(),
            x:        robot.current.x,
            y:        robot.current.y,
            battery:  robot.battery,
            status:   robot.status.as_str(),
            task_id:  robot.current_task.map(|t| t.get()),
        }
    }
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:                 u64,
    /// Wall-clock time the tick ended.
    pub unix_time_ms:         i64,
    pub robots:               u64,
    pub charge_tasks_created: u64,
    pub tasks_completed:      u64,
    pub incomplete_tasks:     u64,
}

impl TickSummaryRow {
    pub fn new(report: &TickReport, unix_time_ms: i64) -> Self {
        Self {
            tick:                 report.tick.0,
            unix_time_ms,
            robots:               report.robots_processed as u64,
            charge_tasks_created: report.charge_tasks_created as u64,
            tasks_completed:      report.tasks_completed as u64,
            incomplete_tasks:     report.incomplete_tasks as u64,
        }
    }
}
