//! Unit tests for fleet-mobility.

use fleet_core::{FleetConfig, Point};

use crate::{step, step_with};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cfg() -> FleetConfig {
    FleetConfig::default() // step 1.0, arrival threshold 1.5
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Fixed cases ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod fixed {
    use super::*;

    #[test]
    fn same_point_arrives_without_moving() {
        let p = Point::new(4.0, -7.0);
        let out = step(p, p, &cfg());
        assert!(out.arrived);
        assert_eq!(out.distance_moved, 0.0);
        assert_eq!(out.position, p);
    }

    #[test]
    fn full_step_along_x_axis() {
        let out = step(Point::ORIGIN, Point::new(10.0, 0.0), &cfg());
        assert!(!out.arrived);
        assert_eq!(out.distance_moved, 1.0);
        assert_eq!(out.position, Point::new(1.0, 0.0));
    }

    #[test]
    fn diagonal_step_follows_direction_vector() {
        // 3-4-5 triangle: unit direction (0.6, 0.8).
        let out = step(Point::ORIGIN, Point::new(30.0, 40.0), &cfg());
        assert!(!out.arrived);
        assert!(close(out.position.x, 0.6));
        assert!(close(out.position.y, 0.8));
    }

    #[test]
    fn sub_threshold_distance_snaps_and_reports_remaining() {
        let target = Point::new(10.0, 0.0);
        let out = step(Point::new(9.0, 0.0), target, &cfg());
        assert!(out.arrived);
        assert_eq!(out.position, target);
        assert!(close(out.distance_moved, 1.0));
    }

    #[test]
    fn exactly_threshold_still_moves_full_step() {
        let out = step(Point::ORIGIN, Point::new(1.5, 0.0), &cfg());
        assert!(!out.arrived);
        assert_eq!(out.distance_moved, 1.0);
    }

    #[test]
    fn ten_units_takes_ten_steps() {
        let target = Point::new(10.0, 0.0);
        let mut pos = Point::ORIGIN;
        let mut travelled = 0.0;
        for i in 1..=10 {
            let out = step(pos, target, &cfg());
            pos = out.position;
            travelled += out.distance_moved;
            assert_eq!(out.arrived, i == 10, "step {i}");
        }
        assert_eq!(pos, target);
        assert!(close(travelled, 10.0));
    }

    #[test]
    fn custom_step_size() {
        let out = step_with(Point::ORIGIN, Point::new(0.0, -100.0), 2.5, 3.0);
        assert_eq!(out.distance_moved, 2.5);
        assert!(close(out.position.y, -2.5));
        assert!(close(out.position.x, 0.0));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    fn coord() -> impl Strategy<Value = f64> {
        -500.0f64..500.0
    }

    proptest! {
        #[test]
        fn step_onto_self_is_zero(x in coord(), y in coord()) {
            let p = Point::new(x, y);
            let out = step(p, p, &cfg());
            prop_assert!(out.arrived);
            prop_assert_eq!(out.distance_moved, 0.0);
            prop_assert_eq!(out.position, p);
        }

        #[test]
        fn far_targets_move_exactly_one_step(
            cx in coord(), cy in coord(), tx in coord(), ty in coord(),
        ) {
            let c = cfg();
            let current = Point::new(cx, cy);
            let target  = Point::new(tx, ty);
            prop_assume!(current.distance(target) >= c.arrival_threshold);

            let out = step(current, target, &c);
            prop_assert!(!out.arrived);
            prop_assert_eq!(out.distance_moved, c.step_size);
            prop_assert!((current.distance(out.position) - c.step_size).abs() < 1e-9);
            // Moved toward the target by exactly one step.
            let before = current.distance(target);
            let after  = out.position.distance(target);
            prop_assert!((before - after - c.step_size).abs() < 1e-9);
        }

        #[test]
        fn converges_within_ceil_distance_over_step(
            cx in coord(), cy in coord(), tx in coord(), ty in coord(),
        ) {
            let c = cfg();
            let target = Point::new(tx, ty);
            let mut pos = Point::new(cx, cy);
            let budget = (pos.distance(target) / c.step_size).ceil() as usize;

            let mut arrived = pos == target;
            for _ in 0..budget.max(1) {
                let out = step(pos, target, &c);
                pos = out.position;
                if out.arrived {
                    arrived = true;
                    break;
                }
            }
            prop_assert!(arrived);
            prop_assert!(pos.distance(target) < c.arrival_threshold);
        }
    }
}
