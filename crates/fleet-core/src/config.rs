//! Simulation tunables.

use std::time::Duration;

use crate::{FleetError, FleetResult};

/// Movement, battery, and scheduling parameters for one simulation.
///
/// Typically loaded from a JSON scenario by the application crate and handed
/// to the controller builder.  Missing fields fall back to the defaults
/// below when deserialised.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    /// Distance covered by one movement step.  Default: 1.0.
    pub step_size: f64,

    /// A robot closer than this to its target snaps onto it.  Must exceed
    /// `step_size`.  Default: 1.5.
    pub arrival_threshold: f64,

    /// Battery lost per unit of distance moved.  Default: 1.0.
    pub drain_per_unit: f64,

    /// Battery gained per tick while parked at the charger.  Default: 5.0.
    pub charge_per_tick: f64,

    /// Below this level the engine schedules a charge task.  Default: 10.0.
    pub low_battery_threshold: f64,

    /// Priority given to charge tasks; outranks every normal task.
    /// Default: 999.
    pub charge_priority: i64,

    /// Pause between ticks in milliseconds.  Default: 1000.
    pub tick_period_ms: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            step_size:             1.0,
            arrival_threshold:     1.5,
            drain_per_unit:        1.0,
            charge_per_tick:       5.0,
            low_battery_threshold: 10.0,
            charge_priority:       999,
            tick_period_ms:        1_000,
        }
    }
}

impl FleetConfig {
    /// Pause between ticks.
    #[inline]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Same config with a different tick period (handy in tests).
    pub fn with_tick_period_ms(mut self, ms: u64) -> Self {
        self.tick_period_ms = ms;
        self
    }

    /// Check every field for a usable value.
    ///
    /// `arrival_threshold` must be strictly greater than `step_size`: a robot
    /// further away than the threshold always moves a full step, so a smaller
    /// threshold lets it overshoot its target indefinitely.
    pub fn validate(&self) -> FleetResult<()> {
        positive("step_size", self.step_size)?;
        positive("arrival_threshold", self.arrival_threshold)?;
        non_negative("drain_per_unit", self.drain_per_unit)?;
        positive("charge_per_tick", self.charge_per_tick)?;
        non_negative("low_battery_threshold", self.low_battery_threshold)?;

        if self.arrival_threshold <= self.step_size {
            return Err(FleetError::Config(format!(
                "arrival_threshold ({}) must be greater than step_size ({})",
                self.arrival_threshold, self.step_size
            )));
        }
        if self.low_battery_threshold > 100.0 {
            return Err(FleetError::Config(format!(
                "low_battery_threshold ({}) exceeds a full battery",
                self.low_battery_threshold
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> FleetResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FleetError::Config(format!("{name} must be finite and > 0, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> FleetResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FleetError::Config(format!("{name} must be finite and >= 0, got {value}")))
    }
}
