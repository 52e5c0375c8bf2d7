//! Simulation time model.
//!
//! # Design
//!
//! The outer loop advances in discrete `Tick`s.  Each tick covers a fixed
//! interval of logical time, held in `SimClock`:
//!
//!   tick_start = start_secs + tick * tick_duration_secs
//!   tick_end   = tick_start + tick_duration_secs
//!
//! Inside a tick the event scheduler works in continuous logical time
//! ([`SimTime`], seconds as `f64`): agents step at arbitrary instants and
//! every instant strictly before `tick_end` is processed by that tick.
//! Logical time has no relation to wall-clock pacing.

use std::fmt;

/// Continuous logical simulation time, in seconds.
pub type SimTime = f64;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Index of an outer-loop iteration.  Tick `n` covers
/// `[clock.time_of(n), clock.time_of(n + 1))`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps tick counts to logical simulation time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Logical time of tick 0, in seconds.
    pub start_secs: SimTime,
    /// Logical seconds covered by one tick.
    pub tick_duration_secs: SimTime,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_secs: SimTime, tick_duration_secs: SimTime) -> Self {
        Self {
            start_secs,
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.next();
    }

    /// Logical time at which `tick` begins.
    #[inline]
    pub fn time_of(&self, tick: Tick) -> SimTime {
        self.start_secs + tick.0 as f64 * self.tick_duration_secs
    }

    /// Logical time at the start of the current tick.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.time_of(self.current_tick)
    }

    /// Logical time at the end of the current tick.  Events strictly before
    /// this instant belong to the current tick.
    #[inline]
    pub fn tick_end(&self) -> SimTime {
        self.time_of(self.current_tick.next())
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={:.3}s)", self.current_tick, self.now())
    }
}

// ── UpdateOrder ───────────────────────────────────────────────────────────────

/// Which per-tick entry point runs first.  Fixed for a whole run so results
/// are reproducible.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateOrder {
    /// Scheduler `advance` first, then group models `update`.
    #[default]
    LocomotionFirst,
    /// Group models `update` first, then scheduler `advance`.
    GroupsFirst,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Built by the outer program (from its scenario file) and handed to the
/// simulation builder, which validates it before the first tick.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Logical time of tick 0, in seconds.
    pub start_secs: SimTime,

    /// Logical seconds per tick.  Must be finite and strictly positive.
    pub tick_duration_secs: SimTime,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Order of the two per-tick entry points.
    pub update_order: UpdateOrder,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_secs, self.tick_duration_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_secs:         0.0,
            tick_duration_secs: 0.4,
            total_ticks:        100,
            seed:               0,
            update_order:       UpdateOrder::LocomotionFirst,
        }
    }
}
