//! `fleet-output` — records simulation progress to CSV.
//!
//! | File                    | One row per                     |
//! |-------------------------|---------------------------------|
//! | `robot_snapshots.csv`   | robot, per tick                 |
//! | `tick_summaries.csv`    | tick                            |
//!
//! [`SnapshotObserver`] implements `fleet_sim::SimObserver` and forwards
//! rows to any [`OutputWriter`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleet_output::{CsvWriter, SnapshotObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let engine = Engine::new(store, config)
//!     .with_observer(Box::new(SnapshotObserver::new(writer)));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SnapshotObserver;
pub use row::{RobotSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
