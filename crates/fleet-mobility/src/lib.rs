//! `fleet-mobility` — one movement step toward a target point.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`step`]   | `step` / `step_with` and the `StepOutcome` they return     |
//!
//! # Movement model (fixed-step straight line)
//!
//! 1. Each tick a robot moves exactly `step_size` along the straight line to
//!    its target.
//! 2. Once the remaining distance drops below `arrival_threshold`, the next
//!    step snaps the robot onto the target and reports arrival.  The snap
//!    covers the remaining (sub-threshold) distance, which is what the engine
//!    charges against the battery.
//! 3. Because `arrival_threshold > step_size`, a full step never overshoots
//!    and a target `d` away is reached in at most `⌈d / step_size⌉` steps.
//!
//! There is no obstacle avoidance or path planning.

pub mod step;

#[cfg(test)]
mod tests;

pub use step::{StepOutcome, step, step_with};
