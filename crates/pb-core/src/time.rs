//! Ticks and the world clock.
//!
//! A [`Tick`] is one host update: one rendered frame in an engine, one loop
//! iteration in the headless world.  Movement speeds and arrival polling are
//! counted in ticks; [`SimClock`] converts a tick count into milliseconds
//! only for reporting.

use std::fmt;

use crate::{PbError, PbResult};

/// A tick count from the start of the run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks from `earlier` up to `self`; zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The world's notion of "now".
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub tick_duration_ms: u32,
    pub now: Tick,
}

impl SimClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self { tick_duration_ms, now: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.now = self.now.next();
    }

    /// Milliseconds from tick 0 to `tick`.
    #[inline]
    pub fn ms_at(&self, tick: Tick) -> u64 {
        tick.0 * u64::from(self.tick_duration_ms)
    }

    /// Milliseconds from tick 0 to now.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.ms_at(self.now)
    }

    /// Smallest tick count covering `ms` milliseconds.
    #[inline]
    pub fn ticks_for_ms(&self, ms: u64) -> u64 {
        ms.div_ceil(u64::from(self.tick_duration_ms.max(1)))
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ms", self.now, self.elapsed_ms())
    }
}

/// Run-wide settings for a headless world.
///
/// Deserialises with every field optional when the `serde` feature is on;
/// missing fields take their [`Default`] values.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Milliseconds per tick, used for reporting.  Non-zero.
    pub tick_duration_ms: u32,
    /// Length of a full `World::run`.
    pub total_ticks: u64,
    /// Seed for every pilot's random stream.
    pub seed: u64,
    /// Size of the pilot-processing thread pool.  `None` lets Rayon decide.
    pub num_threads: Option<usize>,
    /// Snapshot period in ticks; 0 turns snapshots off.
    pub output_interval_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms:      16,
            total_ticks:           600,
            seed:                  0,
            num_threads:           None,
            output_interval_ticks: 1,
        }
    }
}

impl WorldConfig {
    /// First tick not simulated by a full run.
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_ms)
    }

    pub fn validate(&self) -> PbResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(PbError::Config("tick_duration_ms must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(PbError::Config("num_threads, when given, must be at least 1".into()));
        }
        Ok(())
    }
}
