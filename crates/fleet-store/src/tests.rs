//! Unit tests for fleet-store.

use fleet_core::{NewRobot, NewTask, Point, Robot, RobotStatus, Task, TaskKind};

use crate::{FleetStore, SqliteStore, StoreError, TaskFilter};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open in-memory store")
}

fn add_robot(store: &SqliteStore, name: &str, start: Point) -> Robot {
    store
        .with_session(|s| s.insert_robot(&NewRobot::new(name, start)))
        .expect("insert robot")
}

fn add_task(store: &SqliteStore, new: NewTask) -> Task {
    store.with_session(|s| s.insert_task(&new)).expect("insert task")
}

// ── Robots ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod robots {
    use super::*;

    #[test]
    fn insert_places_robot_at_start() {
        let store = store();
        let r = add_robot(&store, "r1", Point::new(2.0, 3.0));
        assert_eq!(r.current, Point::new(2.0, 3.0));
        assert_eq!(r.battery, 100.0);
        assert_eq!(r.status, RobotStatus::Idle);
        assert_eq!(r.current_task, None);

        let loaded = store.with_session(|s| s.robot(r.id)).unwrap().unwrap();
        assert_eq!(loaded, r);
    }

    #[test]
    fn listing_is_ordered_by_id() {
        let store = store();
        let b = add_robot(&store, "bravo", Point::ORIGIN);
        let a = add_robot(&store, "alpha", Point::ORIGIN);
        let ids: Vec<_> = store
            .with_session(|s| s.robots())
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let store = store();
        add_robot(&store, "dup", Point::ORIGIN);
        let err = store
            .with_session(|s| s.insert_robot(&NewRobot::new("dup", Point::ORIGIN)))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRobotName(name) if name == "dup"));
    }

    #[test]
    fn empty_name_and_nan_start_rejected() {
        let store = store();
        let err = store
            .with_session(|s| s.insert_robot(&NewRobot::new("  ", Point::ORIGIN)))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));

        let err = store
            .with_session(|s| s.insert_robot(&NewRobot::new("nan", Point::new(f64::NAN, 0.0))))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[test]
    fn battery_clamped_on_write() {
        let store = store();
        let r = store
            .with_session(|s| s.insert_robot(&NewRobot::new("over", Point::ORIGIN).battery(250.0)))
            .unwrap();
        assert_eq!(r.battery, 100.0);

        let mut r = r;
        r.battery = -4.0;
        store.with_session(|s| s.update_robot(&r)).unwrap();
        let loaded = store.with_session(|s| s.robot(r.id)).unwrap().unwrap();
        assert_eq!(loaded.battery, 0.0);
    }

    #[test]
    fn update_round_trips_every_field() {
        let store = store();
        let mut r = add_robot(&store, "r", Point::new(1.0, 1.0));
        let t = add_task(&store, NewTask::new(r.id, Point::new(5.0, 5.0)));

        r.current = Point::new(2.5, -1.0);
        r.battery = 42.5;
        r.status = RobotStatus::Charging;
        r.current_task = Some(t.id);
        store.with_session(|s| s.update_robot(&r)).unwrap();

        let loaded = store.with_session(|s| s.robot(r.id)).unwrap().unwrap();
        assert_eq!(loaded, r);
    }

    #[test]
    fn update_missing_robot_errors() {
        let store = store();
        let mut r = add_robot(&store, "ghost", Point::ORIGIN);
        store.with_session(|s| s.delete_robot(r.id)).unwrap();
        r.battery = 50.0;
        let err = store.with_session(|s| s.update_robot(&r)).unwrap_err();
        assert!(matches!(err, StoreError::RobotNotFound(id) if id == r.id));
    }

    #[test]
    fn delete_removes_robot_and_its_tasks() {
        let store = store();
        let keep = add_robot(&store, "keep", Point::ORIGIN);
        let gone = add_robot(&store, "gone", Point::ORIGIN);
        add_task(&store, NewTask::new(keep.id, Point::new(1.0, 0.0)));
        add_task(&store, NewTask::new(gone.id, Point::new(2.0, 0.0)));
        add_task(&store, NewTask::new(gone.id, Point::new(3.0, 0.0)));

        assert!(store.with_session(|s| s.delete_robot(gone.id)).unwrap());
        assert!(!store.with_session(|s| s.delete_robot(gone.id)).unwrap());

        let remaining = store.with_session(|s| s.tasks(&TaskFilter::all())).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].robot, keep.id);
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tasks {
    use super::*;

    #[test]
    fn insert_requires_existing_robot() {
        let store = store();
        let err = store
            .with_session(|s| s.insert_task(&NewTask::new(fleet_core::RobotId(99), Point::ORIGIN)))
            .unwrap_err();
        assert!(matches!(err, StoreError::RobotNotFound(_)));
    }

    #[test]
    fn new_tasks_start_incomplete() {
        let store = store();
        let r = add_robot(&store, "r", Point::ORIGIN);
        let t = add_task(&store, NewTask::new(r.id, Point::new(4.0, 0.0)));
        assert!(!t.complete);
        assert_eq!(t.kind, TaskKind::Normal);
        assert_eq!(t.priority, 1);
        assert_eq!(store.with_session(|s| s.task(t.id)).unwrap(), Some(t));
    }

    #[test]
    fn selection_order_priority_then_age() {
        let store = store();
        let r = add_robot(&store, "r", Point::ORIGIN);
        let old_low  = add_task(&store, NewTask::new(r.id, Point::new(1.0, 0.0)).priority(1));
        let high     = add_task(&store, NewTask::new(r.id, Point::new(2.0, 0.0)).priority(5));
        let new_low  = add_task(&store, NewTask::new(r.id, Point::new(3.0, 0.0)).priority(1));

        let order: Vec<_> = store
            .with_session(|s| s.tasks(&TaskFilter::all().robot(r.id)))
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(order, vec![high.id, old_low.id, new_low.id]);

        let first = store
            .with_session(|s| s.first_task(&TaskFilter::all().robot(r.id).incomplete()))
            .unwrap()
            .unwrap();
        assert_eq!(first.id, high.id);
    }

    #[test]
    fn filters_combine_by_and() {
        let store = store();
        let a = add_robot(&store, "a", Point::ORIGIN);
        let b = add_robot(&store, "b", Point::ORIGIN);
        add_task(&store, NewTask::new(a.id, Point::new(1.0, 0.0)));
        add_task(&store, NewTask::charge(a.id, Point::ORIGIN, 999));
        add_task(&store, NewTask::new(b.id, Point::new(1.0, 0.0)));

        let count = |f: TaskFilter| store.with_session(|s| s.count_tasks(&f)).unwrap();
        assert_eq!(count(TaskFilter::all()), 3);
        assert_eq!(count(TaskFilter::all().robot(a.id)), 2);
        assert_eq!(count(TaskFilter::all().robot(a.id).kind(TaskKind::Charge)), 1);
        assert_eq!(count(TaskFilter::all().not_kind(TaskKind::Charge)), 2);
        assert_eq!(count(TaskFilter::all().complete(true)), 0);
        assert_eq!(count(TaskFilter::all().robot(b.id).incomplete()), 1);
    }

    #[test]
    fn bulk_complete_and_delete() {
        let store = store();
        let r = add_robot(&store, "r", Point::ORIGIN);
        add_task(&store, NewTask::new(r.id, Point::new(1.0, 0.0)));
        add_task(&store, NewTask::new(r.id, Point::new(2.0, 0.0)));
        add_task(&store, NewTask::charge(r.id, Point::ORIGIN, 999));

        let touched = store
            .with_session(|s| s.set_tasks_complete(&TaskFilter::all().not_kind(TaskKind::Charge), true))
            .unwrap();
        assert_eq!(touched, 2);
        let done = store
            .with_session(|s| s.count_tasks(&TaskFilter::all().complete(true)))
            .unwrap();
        assert_eq!(done, 2);

        let removed = store
            .with_session(|s| s.delete_tasks(&TaskFilter::all().kind(TaskKind::Charge)))
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.with_session(|s| s.count_tasks(&TaskFilter::all())).unwrap(), 2);
    }

    #[test]
    fn delete_single_task_by_id() {
        let store = store();
        let r = add_robot(&store, "r", Point::ORIGIN);
        let keep = add_task(&store, NewTask::new(r.id, Point::new(1.0, 0.0)));
        let drop = add_task(&store, NewTask::new(r.id, Point::new(2.0, 0.0)));

        assert!(store.with_session(|s| s.delete_task(drop.id)).unwrap());
        assert_eq!(store.with_session(|s| s.task(drop.id)).unwrap(), None);
        assert_eq!(store.with_session(|s| s.task(keep.id)).unwrap(), Some(keep));
        assert_eq!(store.with_session(|s| s.count_tasks(&TaskFilter::all())).unwrap(), 1);

        // Second delete finds nothing; the robot itself is untouched.
        assert!(!store.with_session(|s| s.delete_task(drop.id)).unwrap());
        assert!(store.with_session(|s| s.robot(r.id)).unwrap().is_some());
    }

    #[test]
    fn update_task_round_trip() {
        let store = store();
        let r = add_robot(&store, "r", Point::ORIGIN);
        let mut t = add_task(&store, NewTask::new(r.id, Point::new(1.0, 0.0)));
        t.complete = true;
        t.priority = 7;
        t.target = Point::new(-3.0, 8.0);
        store.with_session(|s| s.update_task(&t)).unwrap();
        assert_eq!(store.with_session(|s| s.task(t.id)).unwrap(), Some(t));
    }
}

// ── Sessions ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sessions {
    use super::*;

    #[test]
    fn error_rolls_back_whole_session() {
        let store = store();
        let result: Result<(), StoreError> = store.with_session(|s| {
            s.insert_robot(&NewRobot::new("temp", Point::ORIGIN))?;
            Err(StoreError::Unavailable("abort".into()))
        });
        assert!(result.is_err());
        assert!(store.with_session(|s| s.robots()).unwrap().is_empty());
    }

    #[test]
    fn panic_rolls_back_and_store_stays_usable() {
        let store = std::sync::Arc::new(store());
        let s2 = std::sync::Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _ = s2.with_session(|s| -> Result<(), StoreError> {
                s.insert_robot(&NewRobot::new("doomed", Point::ORIGIN))?;
                panic!("boom");
            });
        })
        .join();
        assert!(joined.is_err());

        assert!(store.with_session(|s| s.robots()).unwrap().is_empty());
        add_robot(&store, "after", Point::ORIGIN);
        assert_eq!(store.with_session(|s| s.robots()).unwrap().len(), 1);
    }

    #[test]
    fn file_backed_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("fleet.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            let r = add_robot(&store, "persist", Point::new(1.0, 2.0));
            add_task(&store, NewTask::new(r.id, Point::new(3.0, 4.0)));
        }
        let store = SqliteStore::open(&path).unwrap();
        let robots = store.with_session(|s| s.robots()).unwrap();
        assert_eq!(robots.len(), 1);
        assert_eq!(robots[0].name, "persist");
        assert_eq!(store.with_session(|s| s.count_tasks(&TaskFilter::all())).unwrap(), 1);
    }
}
