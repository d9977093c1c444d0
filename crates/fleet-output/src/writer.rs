//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

/// A sink for simulation output rows.
///
/// Errors are returned to the caller; [`SnapshotObserver`][crate::SnapshotObserver]
/// keeps the first one because observer hooks cannot fail.
pub trait OutputWriter {
    /// Write a batch of robot snapshots.
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
