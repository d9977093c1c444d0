//! Simulation observer trait for progress reporting and data collection.

use std::sync::Arc;

use fleet_core::{Robot, SimStatus, Task, Tick};

use crate::TickReport;

/// Callbacks invoked by the [`Engine`][crate::Engine] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers run on the tick thread, hence
/// the `Send` bound.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
///         println!("{tick}: {} tasks left", report.incomplete_tasks);
///     }
/// }
/// ```
pub trait SimObserver: Send {
    /// Called at the very start of each tick, before any robot is processed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after a robot's changes for this tick have been committed.
    ///
    /// `task` is the task the robot worked on (or the charge task that was
    /// just scheduled for it); `None` when the robot had nothing to do.
    fn on_robot_step(&mut self, _tick: Tick, _robot: &Robot, _task: Option<&Task>) {}

    /// Called at the end of each completed tick.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called once when the engine loop exits, with the status it reported.
    fn on_sim_end(&mut self, _final_tick: Tick, _status: SimStatus) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Builds a fresh observer for every launch of the engine.
pub type ObserverFactory = Arc<dyn Fn() -> Box<dyn SimObserver> + Send + Sync>;
