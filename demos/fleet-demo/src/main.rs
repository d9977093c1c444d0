//! fleet-demo — runs a robot fleet scenario to completion.
//!
//! ```text
//! fleet-demo [SCENARIO.json | --random ROBOTS TASKS SEED]
//!            [--db PATH] [--out DIR] [--tick-ms N]
//! ```
//!
//! Without a scenario argument a small built-in warehouse floor is used.
//! `--db` keeps the fleet in a SQLite file; rerunning against a file that
//! already holds robots resets and replays that fleet instead of loading the
//! scenario again.  Set `RUST_LOG=debug` to see every robot step.

mod scenario;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use fleet_core::{FleetConfig, SimStatus};
use fleet_output::{CsvWriter, SnapshotObserver};
use fleet_sim::{NoopObserver, SimController, SimObserver};
use fleet_store::{FleetStore, SqliteStore, TaskFilter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scenario::Scenario;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEMO_TICK_MS: u64 = 20;
const RUN_TIMEOUT: Duration = Duration::from_secs(600);

// ── Command line ──────────────────────────────────────────────────────────────

enum Source {
    Builtin,
    File(PathBuf),
    Random { robots: usize, tasks: usize, seed: u64 },
}

struct Args {
    source:  Source,
    db:      Option<PathBuf>,
    out:     Option<PathBuf>,
    tick_ms: Option<u64>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { source: Source::Builtin, db: None, out: None, tick_ms: None };
    let mut it = std::env::args().skip(1);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--db" => args.db = Some(value(&mut it, "--db")?.into()),
            "--out" => args.out = Some(value(&mut it, "--out")?.into()),
            "--tick-ms" => args.tick_ms = Some(value(&mut it, "--tick-ms")?.parse()?),
            "--random" => {
                args.source = Source::Random {
                    robots: value(&mut it, "--random")?.parse()?,
                    tasks:  value(&mut it, "--random")?.parse()?,
                    seed:   value(&mut it, "--random")?.parse()?,
                };
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => args.source = Source::File(path.into()),
        }
    }
    Ok(args)
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().with_context(|| format!("{flag} needs a value"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let scenario = match &args.source {
        Source::Builtin => Scenario::builtin(),
        Source::File(path) => Scenario::from_file(path)?,
        Source::Random { robots, tasks, seed } => Scenario::random(*robots, *tasks, *seed)?,
    };

    // 1. Store.
    let store = Arc::new(match &args.db {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_in_memory()?,
    });
    let existing = store.with_session(|s| s.robots())?.len();

    // 2. Config.
    let config = scenario
        .config
        .clone()
        .unwrap_or_default()
        .with_tick_period_ms(args.tick_ms.unwrap_or(DEMO_TICK_MS));

    // 3. Controller.
    let mut builder = SimController::builder(Arc::clone(&store)).config(config.clone());
    if let Some(dir) = args.out.clone() {
        builder = builder.observer_factory(move || -> Box<dyn SimObserver> {
            match CsvWriter::new(&dir) {
                Ok(writer) => Box::new(SnapshotObserver::new(writer)),
                Err(e) => {
                    error!(dir = %dir.display(), error = %e, "cannot open output, recording disabled");
                    Box::new(NoopObserver)
                }
            }
        });
    }
    let sim = builder.build()?;

    // 4. Fleet.
    if existing > 0 {
        info!(robots = existing, "store already holds a fleet, replaying it");
        sim.reset()?;
    } else {
        scenario.load(&*store)?;
    }
    print_header(&*store, &config)?;

    // 5. Run.
    let t0 = Instant::now();
    let outcome = sim.start()?;
    if !outcome.started {
        bail!("{}", outcome.message);
    }
    let status = sim.wait(RUN_TIMEOUT);
    if status == SimStatus::Running {
        sim.stop();
    }
    let elapsed = t0.elapsed();

    // 6. Report.
    println!("Simulation {} in {:.3} s", sim.status(), elapsed.as_secs_f64());
    if let Some(dir) = &args.out {
        println!("  output written to {}", dir.display());
    }
    println!();
    print_report(&*store)?;

    if sim.status() == SimStatus::Error {
        bail!("simulation ended in error; see the log above");
    }
    Ok(())
}

fn print_header<S: FleetStore>(store: &S, config: &FleetConfig) -> Result<()> {
    let (robots, tasks) = store.with_session(|s| {
        Ok((s.robots()?.len(), s.count_tasks(&TaskFilter::all().incomplete())?))
    })?;
    println!("=== fleet-demo ===");
    println!(
        "Robots: {robots}  |  Open tasks: {tasks}  |  Step: {}  |  Tick: {} ms",
        config.step_size, config.tick_period_ms
    );
    println!();
    Ok(())
}

fn print_report<S: FleetStore>(store: &S) -> Result<()> {
    let (robots, tasks) = store.with_session(|s| Ok((s.robots()?, s.tasks(&TaskFilter::all())?)))?;

    println!("{:<12} {:<18} {:>8} {:<9} {:>6}", "Robot", "Position", "Battery", "Status", "Done");
    println!("{}", "-".repeat(57));
    for robot in &robots {
        let done = tasks.iter().filter(|t| t.robot == robot.id && t.complete).count();
        let total = tasks.iter().filter(|t| t.robot == robot.id).count();
        println!(
            "{:<12} {:<18} {:>8.1} {:<9} {:>6}",
            robot.name,
            robot.current.to_string(),
            robot.battery,
            robot.status.as_str(),
            format!("{done}/{total}"),
        );
    }
    Ok(())
}
