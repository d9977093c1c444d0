//! The single-step movement function.

use fleet_core::{FleetConfig, Point};

/// Result of advancing one step toward a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Distance actually covered this step.  Either `step_size` or, on
    /// arrival, the remaining sub-threshold distance.
    pub distance_moved: f64,

    /// Position after the step.  Exactly the target when `arrived`.
    pub position: Point,

    /// `true` when the robot was within the arrival threshold.
    pub arrived: bool,
}

/// Advance from `current` toward `target` using the step size and arrival
/// threshold in `config`.
#[inline]
pub fn step(current: Point, target: Point, config: &FleetConfig) -> StepOutcome {
    step_with(current, target, config.step_size, config.arrival_threshold)
}

/// Advance from `current` toward `target` by `step_size`, snapping onto the
/// target once closer than `arrival_threshold`.
///
/// Pure and deterministic.  The zero-distance case is caught by the threshold
/// check before the direction ratio is computed, so `current == target`
/// never divides by zero.
pub fn step_with(
    current:           Point,
    target:            Point,
    step_size:         f64,
    arrival_threshold: f64,
) -> StepOutcome {
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    let distance = dx.hypot(dy);

    if distance < arrival_threshold {
        return StepOutcome {
            distance_moved: distance,
            position:       target,
            arrived:        true,
        };
    }

    let ratio = step_size / distance;
    StepOutcome {
        distance_moved: step_size,
        position:       Point::new(current.x + dx * ratio, current.y + dy * ratio),
        arrived:        false,
    }
}
