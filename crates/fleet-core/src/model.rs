//! Robot and task records plus the status enums shared by every crate.
//!
//! The enum string forms (`as_str` / `FromStr`) are the persisted
//! representation used by the store, so they must stay stable.

use std::fmt;
use std::str::FromStr;

use crate::{FleetError, Point, RobotId, TaskId};

/// Battery level of a freshly created or reset robot.
pub const FULL_BATTERY: f64 = 100.0;

/// Priority of a task created through the public API when none is given.
pub const DEFAULT_PRIORITY: i64 = 1;

/// Generate `as_str`, `Display`, and `FromStr` for a fieldless enum from a
/// single variant ↔ string table.
macro_rules! string_enum {
    ($name:ident, $what:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Stable lowercase label, used as the stored column value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FleetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(FleetError::Parse { what: $what, value: other.to_owned() }),
                }
            }
        }
    };
}

// ── RobotStatus ───────────────────────────────────────────────────────────────

/// What a robot did on its most recent tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RobotStatus {
    /// No pending task, or just finished one.
    #[default]
    Idle,
    /// Travelling toward a normal task's target.
    Moving,
    /// Travelling to, or recharging at, its start position.
    Charging,
}

string_enum!(RobotStatus, "robot status" {
    Idle     => "idle",
    Moving   => "moving",
    Charging => "charging",
});

// ── TaskKind ──────────────────────────────────────────────────────────────────

/// Distinguishes user-submitted work from engine-generated recharge trips.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TaskKind {
    /// Move to a target point; complete on arrival.
    #[default]
    Normal,
    /// Return to the start position and recharge to full.  Created only by
    /// the engine, deleted on reset.
    Charge,
}

string_enum!(TaskKind, "task kind" {
    Normal => "normal",
    Charge => "charge",
});

// ── SimStatus ─────────────────────────────────────────────────────────────────

/// Lifecycle state of the simulation as a whole.
///
/// ```text
/// NotStarted ──start──▶ Running ──▶ Finished | Stopped | Error
///     ▲                    ▲  │
///     │                    └──┘ (per tick)
///     └──────── reset ───────── any state
/// Stopped ──start──▶ Running          (Finished / Error need reset first)
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimStatus {
    #[default]
    NotStarted,
    Running,
    Stopped,
    Finished,
    Error,
}

string_enum!(SimStatus, "simulation status" {
    NotStarted => "not started",
    Running    => "running",
    Stopped    => "stopped",
    Finished   => "finished",
    Error      => "error",
});

impl SimStatus {
    /// `true` for states that `start` refuses until a reset.
    #[inline]
    pub fn requires_reset(self) -> bool {
        matches!(self, SimStatus::Finished | SimStatus::Error)
    }
}

// ── Robot ─────────────────────────────────────────────────────────────────────

/// A persisted robot record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub id:           RobotId,
    /// Unique human-readable name.
    pub name:         String,
    /// Home / charging position.  Reset restores `current` to this.
    pub start:        Point,
    pub current:      Point,
    /// Remaining energy in `[0, 100]`.
    pub battery:      f64,
    pub status:       RobotStatus,
    /// The task the engine last advanced.  Informational only: the active
    /// task is always re-derived from the task ordering each tick.
    pub current_task: Option<TaskId>,
}

impl Robot {
    /// `true` when `battery` is inside `[0, 100]`.
    #[inline]
    pub fn battery_in_range(&self) -> bool {
        (0.0..=FULL_BATTERY).contains(&self.battery)
    }
}

/// Input for creating a robot.  The store places it at `start`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewRobot {
    pub name:    String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start:   Point,
    #[cfg_attr(feature = "serde", serde(default = "full_battery"))]
    pub battery: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status:  RobotStatus,
}

impl NewRobot {
    /// A robot at `start` with a full battery.
    pub fn new(name: impl Into<String>, start: Point) -> Self {
        Self {
            name:    name.into(),
            start,
            battery: FULL_BATTERY,
            status:  RobotStatus::Idle,
        }
    }

    /// Override the initial battery level (clamped to `[0, 100]` by the store).
    pub fn battery(mut self, battery: f64) -> Self {
        self.battery = battery;
        self
    }
}

#[cfg(feature = "serde")]
fn full_battery() -> f64 {
    FULL_BATTERY
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// A persisted task record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id:            TaskId,
    pub robot:         RobotId,
    pub target:        Point,
    /// Once `true`, the engine never sets it back; only reset does.
    pub complete:      bool,
    pub kind:          TaskKind,
    /// Higher is more urgent.
    pub priority:      i64,
    /// Unix milliseconds; breaks priority ties, oldest first.
    pub created_at_ms: i64,
}

/// Input for creating a task.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewTask {
    pub robot:    RobotId,
    pub target:   Point,
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    pub priority: i64,
    /// Always `Normal` from outside; only [`NewTask::charge`] sets it.
    #[cfg_attr(feature = "serde", serde(skip))]
    kind:         TaskKind,
}

impl NewTask {
    /// A normal task with the default priority.
    pub fn new(robot: RobotId, target: Point) -> Self {
        Self {
            robot,
            target,
            priority: DEFAULT_PRIORITY,
            kind:     TaskKind::Normal,
        }
    }

    /// A charge task back to `home` at `priority`.  Scheduled by the engine
    /// when a robot runs low; nothing else should need it.
    pub fn charge(robot: RobotId, home: Point, priority: i64) -> Self {
        Self {
            robot,
            target: home,
            priority,
            kind: TaskKind::Charge,
        }
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

#[cfg(feature = "serde")]
fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}
