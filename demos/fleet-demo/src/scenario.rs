//! Scenario files: the fleet and task list a demo run starts from.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fleet_core::{FleetConfig, NewRobot, NewTask, Point};
use fleet_store::FleetStore;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Side length of the square that random scenarios are placed in.
const RANDOM_AREA: f64 = 40.0;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: Option<FleetConfig>,
    pub robots: Vec<RobotSpec>,
    #[serde(default)]
    pub tasks:  Vec<TaskSpec>,
}

#[derive(Debug, Deserialize)]
pub struct RobotSpec {
    pub name:    String,
    pub start:   Point,
    #[serde(default)]
    pub battery: Option<f64>,
}

/// A task addressed to a robot by name.
#[derive(Debug, Deserialize)]
pub struct TaskSpec {
    pub robot:    String,
    pub target:   Point,
    #[serde(default)]
    pub priority: Option<i64>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// A small warehouse floor: three robots, one of them nearly flat.
    pub fn builtin() -> Self {
        let robot = |name: &str, x, y, battery| RobotSpec {
            name: name.to_owned(),
            start: Point::new(x, y),
            battery,
        };
        let task = |robot: &str, x, y, priority| TaskSpec {
            robot: robot.to_owned(),
            target: Point::new(x, y),
            priority,
        };
        Self {
            config: None,
            robots: vec![
                robot("picker-1", 0.0, 0.0, None),
                robot("picker-2", 20.0, 0.0, Some(40.0)),
                robot("hauler-1", 10.0, 10.0, Some(12.0)),
            ],
            tasks: vec![
                task("picker-1", 10.0, 0.0, None),
                task("picker-1", 10.0, 8.0, Some(3)),
                task("picker-2", 20.0, 15.0, None),
                task("picker-2", 5.0, 15.0, Some(2)),
                task("hauler-1", 0.0, 10.0, None),
            ],
        }
    }

    /// `robots` robots and `tasks` tasks scattered over a square floor,
    /// reproducible from `seed`.
    pub fn random(robots: usize, tasks: usize, seed: u64) -> Result<Self> {
        if robots == 0 && tasks > 0 {
            bail!("cannot assign {tasks} tasks to an empty fleet");
        }
        let mut rng = SmallRng::seed_from_u64(seed);

        let robots: Vec<RobotSpec> = (0..robots)
            .map(|i| RobotSpec {
                name:    format!("robot-{i:03}"),
                start:   random_point(&mut rng),
                battery: Some(rng.gen_range(5.0..=100.0)),
            })
            .collect();
        let tasks = (0..tasks)
            .map(|_| TaskSpec {
                robot:    robots[rng.gen_range(0..robots.len())].name.clone(),
                target:   random_point(&mut rng),
                priority: Some(rng.gen_range(1..=5)),
            })
            .collect();

        Ok(Self { config: None, robots, tasks })
    }

    /// Insert the whole scenario in one session; nothing is kept if any
    /// record is rejected.
    pub fn load<S: FleetStore>(&self, store: &S) -> Result<()> {
        store.with_session(|s| {
            let mut ids = HashMap::new();
            for entry in &self.robots {
                let mut new = NewRobot::new(entry.name.clone(), entry.start);
                if let Some(battery) = entry.battery {
                    new = new.battery(battery);
                }
                let robot = s.insert_robot(&new)?;
                ids.insert(robot.name.clone(), robot.id);
            }
            for entry in &self.tasks {
                let Some(&robot) = ids.get(&entry.robot) else {
                    return Err(fleet_store::StoreError::InvalidRecord(format!(
                        "task for unknown robot {:?}",
                        entry.robot
                    )));
                };
                let mut new = NewTask::new(robot, entry.target);
                if let Some(priority) = entry.priority {
                    new = new.priority(priority);
                }
                s.insert_task(&new)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

fn random_point(rng: &mut SmallRng) -> Point {
    Point::new(rng.gen_range(0.0..RANDOM_AREA), rng.gen_range(0.0..RANDOM_AREA))
}
