//! Per-agent energy pool.

use pb_core::Position;

use crate::{EnergyError, EnergyResult, ReachabilityResult, budget_path};

/// Minimum energy required to start a move.
///
/// Below this a move is refused even if some energy remains, so agents do
/// not commit to degenerate near-zero-length moves.
pub const ACT_THRESHOLD: f32 = 0.05;

/// Energy pool settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnergyConfig {
    /// Capacity and reset value.
    pub max: f32,
    /// Minimum energy to start a move.
    pub act_threshold: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self { max: 6.0, act_threshold: ACT_THRESHOLD }
    }
}

/// An agent's energy: a fixed `max` and a `current` level in `[0, max]`.
///
/// `current` changes only through [`commit`](Self::commit),
/// [`spend`](Self::spend) and [`reset`](Self::reset).  The budget itself is
/// not synchronised; it is owned by exactly one movement planner.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBudget {
    max:           f32,
    current:       f32,
    act_threshold: f32,
}

impl EnergyBudget {
    /// A full pool of `max` with the default [`ACT_THRESHOLD`].
    pub fn new(max: f32) -> EnergyResult<Self> {
        Self::from_config(&EnergyConfig { max, ..EnergyConfig::default() })
    }

    pub fn from_config(config: &EnergyConfig) -> EnergyResult<Self> {
        let EnergyConfig { max, act_threshold } = *config;
        if !(max.is_finite() && max > 0.0) {
            return Err(EnergyError::InvalidMax(max));
        }
        if !(act_threshold.is_finite() && (0.0..=max).contains(&act_threshold)) {
            return Err(EnergyError::InvalidThreshold { threshold: act_threshold, max });
        }
        Ok(Self { max, current: max, act_threshold })
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn act_threshold(&self) -> f32 {
        self.act_threshold
    }

    /// `true` if enough energy remains to start a move.
    ///
    /// This is the energy half of the "can act" gate; the movement planner
    /// adds the idle check.
    #[inline]
    pub fn is_actionable(&self) -> bool {
        self.current >= self.act_threshold
    }

    /// Budget `path` against the current level.  Pure.
    pub fn predict(&self, path: &[Position]) -> ReachabilityResult {
        budget_path(path, self.current)
    }

    /// Lock in a predicted move by adopting its residual as the new level.
    ///
    /// The residual must come from a prediction made against the current
    /// level; the caller upholds that.  The value is clamped to `[0, max]`.
    pub fn commit(&mut self, residual: f32) {
        let next = residual.clamp(0.0, self.max);
        log::trace!("energy commit {:.3} -> {:.3}", self.current, next);
        self.current = if next.is_nan() { 0.0 } else { next };
    }

    /// Remove `amount` from the pool, stopping at zero.  Negative and NaN
    /// amounts are ignored.
    pub fn spend(&mut self, amount: f32) {
        if amount > 0.0 {
            self.current = (self.current - amount).max(0.0);
        }
    }

    /// Refill to `max`.
    pub fn reset(&mut self) {
        self.current = self.max;
    }

    /// `value` as a fraction of `max`, clamped to `[0, 1]`; the fill level
    /// an energy bar shows for a predicted or current value.
    pub fn gauge(&self, value: f32) -> f32 {
        (value / self.max).clamp(0.0, 1.0)
    }
}
