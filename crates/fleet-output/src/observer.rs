//! `SnapshotObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use fleet_core::{Robot, SimStatus, Task, Tick, now_unix_millis};
use fleet_sim::{SimObserver, TickReport};
use tracing::{error, info};

use crate::row::{RobotSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records every robot's state and a summary row per
/// tick to any [`OutputWriter`] backend.
///
/// Robot rows are buffered for the tick and written as one batch when it
/// ends.  Errors from the writer are stored internally because `SimObserver`
/// methods have no return value; the first one is logged when the run ends
/// and can also be collected with [`take_error`][Self::take_error].
pub struct SnapshotObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<RobotSnapshotRow>,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SnapshotObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), rows: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter + Send> SimObserver for SnapshotObserver<W> {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.pending.clear();
    }

    fn on_robot_step(&mut self, tick: Tick, robot: &Robot, _task: Option<&Task>) {
        self.pending.push(RobotSnapshotRow::new(tick, robot));
    }

    fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_snapshots(&rows);
            self.rows += rows.len() as u64;
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::new(report, now_unix_millis()));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, final_tick: Tick, status: SimStatus) {
        let result = self.writer.finish();
        self.store_err(result);
        match &self.last_error {
            Some(e) => error!(error = %e, "simulation output incomplete"),
            None => info!(ticks = final_tick.0, rows = self.rows, status = %status, "simulation output written"),
        }
    }
}
