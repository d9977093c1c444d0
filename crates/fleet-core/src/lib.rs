//! `fleet-core` — foundational types for the robot fleet simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `RobotId`, `TaskId`                                   |
//! | [`geo`]         | `Point`, Euclidean distance                           |
//! | [`time`]        | `Tick`, wall-clock millisecond timestamps             |
//! | [`model`]       | `Robot`, `Task`, `NewRobot`, `NewTask`, status enums  |
//! | [`config`]      | `FleetConfig` — movement, battery, and tick tunables  |
//! | [`error`]       | `FleetError`, `FleetResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod model;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FleetConfig;
pub use error::{FleetError, FleetResult};
pub use geo::Point;
pub use ids::{RobotId, TaskId};
pub use model::{NewRobot, NewTask, Robot, RobotStatus, SimStatus, Task, TaskKind};
pub use time::{Tick, now_unix_millis};
