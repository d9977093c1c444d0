//! Error types for fleet-store.

use fleet_core::{RobotId, TaskId};
use thiserror::Error;

/// Errors raised by a [`FleetStore`][crate::FleetStore] or one of its sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("robot {0} not found")]
    RobotNotFound(RobotId),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("a robot named {0:?} already exists")]
    DuplicateRobotName(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
