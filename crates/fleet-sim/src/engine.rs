//! The tick engine.

use std::sync::Arc;

use fleet_core::{
    FleetConfig, NewTask, Robot, RobotId, RobotStatus, SimStatus, Task, TaskKind, Tick,
    model::FULL_BATTERY,
};
use fleet_mobility::step;
use fleet_store::{FleetStore, Session, StoreResult, TaskFilter};
use tracing::{debug, error, info};

use crate::{CancelToken, NoopObserver, SimContext, SimObserver, SimResult};

// ── TickReport ────────────────────────────────────────────────────────────────

/// Summary of one completed tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick:                 Tick,
    /// Robots that still existed when their turn came.
    pub robots_processed:     usize,
    pub charge_tasks_created: usize,
    pub tasks_completed:      usize,
    /// Incomplete tasks left across the whole fleet after the tick.
    pub incomplete_tasks:     usize,
}

impl TickReport {
    /// `true` once no incomplete task remains; the run is over.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.incomplete_tasks == 0
    }
}

// ── Per-robot step ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StepKind {
    ChargeScheduled,
    Idle,
    Moved { completed: bool },
}

struct RobotStep {
    robot: Robot,
    task:  Option<Task>,
    kind:  StepKind,
}

/// One robot's turn, run inside a single session.  Returns `None` if the
/// robot was deleted after the tick listed it.
fn advance_robot(
    session: &mut dyn Session,
    id:      RobotId,
    config:  &FleetConfig,
) -> StoreResult<Option<RobotStep>> {
    let Some(mut robot) = session.robot(id)? else {
        return Ok(None);
    };

    if robot.battery < config.low_battery_threshold {
        let pending = TaskFilter::all().robot(id).incomplete().kind(TaskKind::Charge);
        if session.count_tasks(&pending)? == 0 {
            let task = session.insert_task(&NewTask::charge(id, robot.start, config.charge_priority))?;
            info!(robot = %robot.name, battery = robot.battery, task = %task.id, "low battery, charge task scheduled");
            return Ok(Some(RobotStep { robot, task: Some(task), kind: StepKind::ChargeScheduled }));
        }
    }

    let Some(mut task) = session.first_task(&TaskFilter::all().robot(id).incomplete())? else {
        if robot.status != RobotStatus::Idle || robot.current_task.is_some() {
            robot.status = RobotStatus::Idle;
            robot.current_task = None;
            session.update_robot(&robot)?;
        }
        return Ok(Some(RobotStep { robot, task: None, kind: StepKind::Idle }));
    };

    let outcome = step(robot.current, task.target, config);
    robot.current = outcome.position;
    robot.battery = (robot.battery - outcome.distance_moved * config.drain_per_unit).max(0.0);
    robot.status = match task.kind {
        TaskKind::Charge => RobotStatus::Charging,
        TaskKind::Normal => RobotStatus::Moving,
    };
    robot.current_task = Some(task.id);

    let completed = outcome.arrived
        && match task.kind {
            TaskKind::Normal => true,
            TaskKind::Charge => {
                robot.battery = (robot.battery + config.charge_per_tick).min(FULL_BATTERY);
                robot.battery >= FULL_BATTERY
            }
        };

    if completed {
        task.complete = true;
        robot.status = RobotStatus::Idle;
        robot.current_task = None;
        session.update_task(&task)?;
        info!(robot = %robot.name, task = %task.id, kind = %task.kind, "task completed");
    }
    session.update_robot(&robot)?;

    debug!(
        robot = %robot.name,
        position = %robot.current,
        battery = robot.battery,
        status = %robot.status,
        "robot advanced"
    );
    Ok(Some(RobotStep { robot, task: Some(task), kind: StepKind::Moved { completed } }))
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Advances the fleet one tick at a time against a [`FleetStore`].
///
/// [`tick`](Self::tick) is usable on its own for synchronous stepping;
/// [`run`](Self::run) is the loop the controller puts on the tick thread.
pub struct Engine<S: FleetStore> {
    store:    Arc<S>,
    config:   FleetConfig,
    tick:     Tick,
    observer: Box<dyn SimObserver>,
}

impl<S: FleetStore> Engine<S> {
    pub fn new(store: Arc<S>, config: FleetConfig) -> Self {
        Self { store, config, tick: Tick::ZERO, observer: Box::new(NoopObserver) }
    }

    pub fn with_observer(mut self, observer: Box<dyn SimObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The tick that the next call to [`tick`](Self::tick) will run.
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Run one tick over every robot.
    ///
    /// Each robot is committed in its own session, so an error part-way
    /// through leaves the earlier robots' progress in place.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        let now = self.tick;
        self.observer.on_tick_start(now);

        let ids: Vec<RobotId> = self
            .store
            .with_session(|s| Ok(s.robots()?.into_iter().map(|r| r.id).collect()))?;

        let mut report = TickReport { tick: now, ..TickReport::default() };
        for id in ids {
            let config = &self.config;
            let Some(step) = self.store.with_session(|s| advance_robot(s, id, config))? else {
                debug!(robot = %id, "robot removed mid-tick, skipped");
                continue;
            };
            report.robots_processed += 1;
            match step.kind {
                StepKind::ChargeScheduled => report.charge_tasks_created += 1,
                StepKind::Moved { completed: true } => report.tasks_completed += 1,
                StepKind::Moved { completed: false } | StepKind::Idle => {}
            }
            self.observer.on_robot_step(now, &step.robot, step.task.as_ref());
        }

        report.incomplete_tasks = self
            .store
            .with_session(|s| s.count_tasks(&TaskFilter::all().incomplete()))?;

        debug!(
            tick = %now,
            robots = report.robots_processed,
            remaining = report.incomplete_tasks,
            "tick complete"
        );
        self.observer.on_tick_end(now, &report);
        self.tick = now.next();
        Ok(report)
    }

    /// Tick until every task is done, the token is cancelled, or the store
    /// fails.  The final status is published through `ctx` and returned.
    pub fn run(mut self, ctx: &dyn SimContext, cancel: &CancelToken) -> SimStatus {
        info!(tick_period_ms = self.config.tick_period_ms, "simulation loop started");
        let status = loop {
            if cancel.is_cancelled() {
                break SimStatus::Stopped;
            }
            match self.tick() {
                Ok(report) if report.is_finished() => break SimStatus::Finished,
                Ok(_) => {}
                Err(e) => {
                    error!(tick = %self.tick, error = %e, "simulation tick failed");
                    break SimStatus::Error;
                }
            }
            if cancel.wait(self.config.tick_period()) {
                break SimStatus::Stopped;
            }
        };

        info!(ticks = self.tick.0, status = %status, "simulation loop exited");
        ctx.set_status(status);
        if status == SimStatus::Finished {
            ctx.request_cancel();
        }
        self.observer.on_sim_end(self.tick, status);
        status
    }
}
