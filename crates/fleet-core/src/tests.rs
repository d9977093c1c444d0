//! Unit tests for fleet-core primitives.

#[cfg(test)]
mod ids {
    use crate::{RobotId, TaskId};

    #[test]
    fn ordering() {
        assert!(RobotId(1) < RobotId(2));
        assert!(TaskId(100) > TaskId(99));
    }

    #[test]
    fn display() {
        assert_eq!(RobotId(7).to_string(), "RobotId(7)");
        assert_eq!(TaskId::from(3).get(), 3);
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn zero_distance() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(p.distance(p), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert!((b.distance(a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn finiteness() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(t.next(), Tick(11));
        assert_eq!(Tick(4).to_string(), "T4");
    }

    #[test]
    fn wall_clock_is_after_2020() {
        assert!(crate::now_unix_millis() > 1_577_836_800_000);
    }
}

#[cfg(test)]
mod model {
    use crate::{FleetError, NewRobot, NewTask, Point, RobotId, RobotStatus, SimStatus, TaskKind};

    #[test]
    fn status_strings_round_trip() {
        for s in [RobotStatus::Idle, RobotStatus::Moving, RobotStatus::Charging] {
            assert_eq!(s.as_str().parse::<RobotStatus>().unwrap(), s);
        }
        for k in [TaskKind::Normal, TaskKind::Charge] {
            assert_eq!(k.to_string().parse::<TaskKind>().unwrap(), k);
        }
    }

    #[test]
    fn sim_status_labels() {
        assert_eq!(SimStatus::NotStarted.to_string(), "not started");
        assert_eq!(SimStatus::Running.to_string(), "running");
        assert_eq!("finished".parse::<SimStatus>().unwrap(), SimStatus::Finished);
        assert_eq!(SimStatus::default(), SimStatus::NotStarted);
    }

    #[test]
    fn only_finished_and_error_require_reset() {
        assert!(SimStatus::Finished.requires_reset());
        assert!(SimStatus::Error.requires_reset());
        assert!(!SimStatus::Stopped.requires_reset());
        assert!(!SimStatus::NotStarted.requires_reset());
        assert!(!SimStatus::Running.requires_reset());
    }

    #[test]
    fn unknown_string_is_parse_error() {
        let err = "pickup".parse::<TaskKind>().unwrap_err();
        assert_eq!(err, FleetError::Parse { what: "task kind", value: "pickup".into() });
    }

    #[test]
    fn new_robot_defaults() {
        let r = NewRobot::new("r1", Point::new(1.0, 2.0));
        assert_eq!(r.battery, 100.0);
        assert_eq!(r.status, RobotStatus::Idle);
        assert_eq!(NewRobot::new("r2", Point::ORIGIN).battery(9.0).battery, 9.0);
    }

    #[test]
    fn new_task_kind_is_fixed_by_constructor() {
        let normal = NewTask::new(RobotId(1), Point::new(4.0, 0.0)).priority(7);
        assert_eq!(normal.kind(), TaskKind::Normal);
        assert_eq!(normal.priority, 7);

        let charge = NewTask::charge(RobotId(1), Point::ORIGIN, 999);
        assert_eq!(charge.kind(), TaskKind::Charge);
        assert_eq!(charge.target, Point::ORIGIN);
        // Re-prioritising keeps the kind.
        assert_eq!(charge.priority(5).kind(), TaskKind::Charge);
    }
}

#[cfg(test)]
mod config {
    use crate::FleetConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = FleetConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.charge_priority, 999);
        assert_eq!(cfg.tick_period().as_millis(), 1_000);
    }

    #[test]
    fn threshold_must_exceed_step() {
        let cfg = FleetConfig { arrival_threshold: 1.0, step_size: 1.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_and_negative_values() {
        let nan_step = FleetConfig { step_size: f64::NAN, ..Default::default() };
        assert!(nan_step.validate().is_err());

        let negative_drain = FleetConfig { drain_per_unit: -1.0, ..Default::default() };
        assert!(negative_drain.validate().is_err());

        let zero_charge = FleetConfig { charge_per_tick: 0.0, ..Default::default() };
        assert!(zero_charge.validate().is_err());

        let huge_low = FleetConfig { low_battery_threshold: 150.0, ..Default::default() };
        assert!(huge_low.validate().is_err());
    }

    #[test]
    fn with_tick_period_overrides_only_period() {
        let cfg = FleetConfig::default().with_tick_period_ms(5);
        assert_eq!(cfg.tick_period_ms, 5);
        assert_eq!(cfg.step_size, 1.0);
    }
}
