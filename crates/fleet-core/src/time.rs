//! Simulation time model.
//!
//! # Design
//!
//! The engine counts ticks with a monotonically increasing `Tick`.  A tick is
//! one pass over every robot; the wall-clock gap between ticks is the
//! configured tick period (`FleetConfig::tick_period_ms`), not part of the
//! tick value itself.
//!
//! Task creation times are wall-clock Unix milliseconds, used only to order
//! tasks of equal priority.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The following tick.
    #[inline]
    pub fn next(self) -> Tick {
        self.offset(1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Wall clock ────────────────────────────────────────────────────────────────

/// Milliseconds since the Unix epoch.  Clocks set before 1970 read as 0.
pub fn now_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
