//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `robot_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

pub const SNAPSHOT_FILE: &str = "robot_snapshots.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, then create the two CSV files in it and write
    /// their header rows.  Existing files are truncated.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join(SNAPSHOT_FILE))?;
        snapshots.write_record(["tick", "robot_id", "name", "x", "y", "battery", "status", "task_id"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record([
            "tick",
            "unix_time_ms",
            "robots",
            "charge_tasks_created",
            "tasks_completed",
            "incomplete_tasks",
        ])?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.robot_id.to_string(),
                row.name.clone(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.2}", row.battery),
                row.status.to_owned(),
                row.task_id.map(|t| t.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_ms.to_string(),
            row.robots.to_string(),
            row.charge_tasks_created.to_string(),
            row.tasks_completed.to_string(),
            row.incomplete_tasks.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
