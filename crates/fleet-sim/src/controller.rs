//! Lifecycle controller: one simulation execution at a time.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use fleet_core::{FleetConfig, RobotStatus, SimStatus, TaskKind, model::FULL_BATTERY};
use fleet_store::{FleetStore, TaskFilter};
use tracing::{error, info, warn};

use crate::{
    CancelHandle, CancelToken, Engine, ObserverFactory, SimContext, SimControllerBuilder,
    SimError, SimResult, cancel_pair, lock,
};

const TICK_THREAD_NAME: &str = "fleet-tick";
const SETTLE_POLL: Duration = Duration::from_millis(5);

/// Result of [`SimController::start`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartOutcome {
    pub started: bool,
    pub message: String,
}

impl StartOutcome {
    fn started() -> Self {
        Self { started: true, message: "Simulation started.".to_owned() }
    }

    fn refused(message: &str) -> Self {
        Self { started: false, message: message.to_owned() }
    }
}

// ── Shared state ──────────────────────────────────────────────────────────────

struct Execution {
    generation: u64,
    cancel:     CancelHandle,
    thread:     JoinHandle<()>,
}

impl Execution {
    fn is_live(&self) -> bool {
        !self.thread.is_finished()
    }
}

/// State reachable from both the controller and the tick thread.
struct Shared {
    status:     Mutex<SimStatus>,
    slot:       Mutex<Option<Execution>>,
    generation: AtomicU64,
}

impl Shared {
    fn status(&self) -> SimStatus {
        *lock(&self.status)
    }

    fn set_status(&self, status: SimStatus) {
        *lock(&self.status) = status;
    }

    /// Set `to` only if the status is still `from`.
    fn transition(&self, from: SimStatus, to: SimStatus) -> bool {
        let mut status = lock(&self.status);
        if *status == from {
            *status = to;
            true
        } else {
            false
        }
    }
}

/// The [`SimContext`] of one launch.  Calls from a launch that has since been
/// replaced are ignored.
struct LaunchContext {
    shared:     Arc<Shared>,
    generation: u64,
}

impl LaunchContext {
    fn is_current(&self) -> bool {
        self.shared.generation.load(Ordering::Acquire) == self.generation
    }
}

impl SimContext for LaunchContext {
    fn request_cancel(&self) {
        let mut slot = lock(&self.shared.slot);
        if slot.as_ref().is_some_and(|e| e.generation == self.generation) {
            if let Some(execution) = slot.take() {
                // The join handle is dropped here; this thread is the one it
                // refers to and exits right after.
                execution.cancel.cancel();
            }
        }
    }

    /// Written under the slot lock, so `start` sees either the old status
    /// with this launch still in the slot, or the new one.
    fn set_status(&self, status: SimStatus) {
        let _slot = lock(&self.shared.slot);
        if self.is_current() {
            self.shared.set_status(status);
        }
    }
}

fn run_guarded<S: FleetStore>(engine: Engine<S>, ctx: LaunchContext, cancel: CancelToken) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.run(&ctx, &cancel)));
    if outcome.is_err() {
        error!("simulation engine panicked");
        ctx.set_status(SimStatus::Error);
    }
}

// ── SimController ─────────────────────────────────────────────────────────────

/// Owns the simulation lifecycle for one store.
///
/// At most one engine runs at a time.  `start`, `stop`, `restart` and
/// `reset` are serialised against each other; the engine itself never takes
/// the lifecycle lock, so `stop` may safely join it.
///
/// | Status      | `start`  | `stop`           | `reset`       |
/// |-------------|----------|------------------|---------------|
/// | not started | launches | false            | → not started |
/// | running     | refused  | true, → stopped  | → not started |
/// | stopped     | launches | false            | → not started |
/// | finished    | refused  | false            | → not started |
/// | error       | refused  | false            | → not started |
pub struct SimController<S: FleetStore> {
    store:     Arc<S>,
    config:    FleetConfig,
    observers: Option<ObserverFactory>,
    shared:    Arc<Shared>,
    lifecycle: Mutex<()>,
}

impl<S: FleetStore> SimController<S> {
    pub fn builder(store: Arc<S>) -> SimControllerBuilder<S> {
        SimControllerBuilder::new(store)
    }

    pub(crate) fn from_parts(
        store:     Arc<S>,
        config:    FleetConfig,
        observers: Option<ObserverFactory>,
    ) -> Self {
        Self {
            store,
            config,
            observers,
            shared: Arc::new(Shared {
                status:     Mutex::new(SimStatus::NotStarted),
                slot:       Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
            lifecycle: Mutex::new(()),
        }
    }

    pub fn status(&self) -> SimStatus {
        self.shared.status()
    }

    /// `true` while an engine thread is alive.
    pub fn is_running(&self) -> bool {
        lock(&self.shared.slot).as_ref().is_some_and(Execution::is_live)
    }

    /// Launch the engine unless one is already running or the previous run
    /// ended in `finished`/`error` (those need a [`reset`](Self::reset)).
    pub fn start(&self) -> SimResult<StartOutcome> {
        let _guard = lock(&self.lifecycle);
        self.start_locked()
    }

    /// Cancel the running engine and wait for its thread to exit.
    ///
    /// Returns `true` if this call moved a running execution to `stopped`.
    /// An engine that already published `finished` or `error` keeps it and
    /// the call returns `false`.
    pub fn stop(&self) -> bool {
        let _guard = lock(&self.lifecycle);
        self.stop_locked()
    }

    /// `stop` followed by `start`; `true` only if both took effect.
    pub fn restart(&self) -> SimResult<bool> {
        let _guard = lock(&self.lifecycle);
        let stopped = self.stop_locked();
        let outcome = self.start_locked()?;
        Ok(stopped && outcome.started)
    }

    /// Stop any run, put every robot back at its start with a full battery,
    /// delete charge tasks and reopen all other tasks.
    pub fn reset(&self) -> SimResult<()> {
        let _guard = lock(&self.lifecycle);
        self.stop_locked();

        let (robots, removed, reopened) = self.store.with_session(|s| {
            let robots = s.robots()?;
            for mut robot in robots.iter().cloned() {
                robot.current = robot.start;
                robot.status = RobotStatus::Idle;
                robot.battery = FULL_BATTERY;
                robot.current_task = None;
                s.update_robot(&robot)?;
            }
            let removed = s.delete_tasks(&TaskFilter::all().kind(TaskKind::Charge))?;
            let reopened = s.set_tasks_complete(&TaskFilter::all().not_kind(TaskKind::Charge), false)?;
            Ok((robots.len(), removed, reopened))
        })?;

        self.shared.set_status(SimStatus::NotStarted);
        info!(robots, charge_tasks_removed = removed, tasks_reopened = reopened, "simulation reset");
        Ok(())
    }

    /// Block until the simulation leaves `running` or `timeout` elapses,
    /// returning the status seen last.
    pub fn wait(&self, timeout: Duration) -> SimStatus {
        let deadline = Instant::now() + timeout;
        loop {
            let status = self.status();
            if status != SimStatus::Running || Instant::now() >= deadline {
                return status;
            }
            thread::sleep(SETTLE_POLL);
        }
    }

    fn start_locked(&self) -> SimResult<StartOutcome> {
        let mut slot = lock(&self.shared.slot);
        let previous = self.shared.status();

        if previous.requires_reset() {
            warn!(status = %previous, "start refused, reset required");
            return Ok(StartOutcome::refused(
                "Cannot start: simulation already finished or errored. Please reset.",
            ));
        }
        if slot.as_ref().is_some_and(Execution::is_live) {
            return Ok(StartOutcome::refused("Simulation already running."));
        }
        if let Some(stale) = slot.take() {
            let _ = stale.thread.join();
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let (cancel, token) = cancel_pair();
        let ctx = LaunchContext { shared: Arc::clone(&self.shared), generation };
        let mut engine = Engine::new(Arc::clone(&self.store), self.config.clone());
        if let Some(factory) = &self.observers {
            engine = engine.with_observer(factory());
        }

        // Published before the thread exists so the engine's own terminal
        // status always lands last.
        self.shared.set_status(SimStatus::Running);
        let spawned = thread::Builder::new()
            .name(TICK_THREAD_NAME.to_owned())
            .spawn(move || run_guarded(engine, ctx, token));

        match spawned {
            Ok(thread) => {
                *slot = Some(Execution { generation, cancel, thread });
                info!(generation, "simulation started");
                Ok(StartOutcome::started())
            }
            Err(e) => {
                self.shared.set_status(previous);
                Err(SimError::Spawn(e))
            }
        }
    }

    fn stop_locked(&self) -> bool {
        let Some(execution) = lock(&self.shared.slot).take() else {
            return false;
        };
        let live = execution.is_live();
        execution.cancel.cancel();
        if execution.thread.join().is_err() {
            error!("tick thread terminated abnormally");
        }
        // A run that published its own terminal status before the cancel
        // landed keeps it.
        let stopped = live && self.shared.transition(SimStatus::Running, SimStatus::Stopped);
        if stopped {
            info!(generation = execution.generation, "simulation stopped");
        }
        stopped
    }
}

impl<S: FleetStore> Drop for SimController<S> {
    fn drop(&mut self) {
        self.stop_locked();
    }
}
