//! Seeded random sources.
//!
//! A run is reproducible from `WorldConfig::seed` alone.  Every pilot owns an
//! [`AgentRng`] whose stream depends only on the run seed and the pilot's
//! ID, so the draws a pilot sees do not change with thread count or with the
//! order in which pilots are stepped.  [`SimRng`] serves one-off draws made
//! by the host before the tick loop starts (spawn placement and the like).

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Position};

/// SplitMix64 finaliser; scatters neighbouring agent IDs across the seed space.
fn mix(seed: u64, agent: AgentId) -> u64 {
    let mut z = seed.wrapping_add(u64::from(agent.0).wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Uniform in `[lo, hi]`; a flat or inverted interval yields `lo`.
fn span(rng: &mut SmallRng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

/// One pilot's private random stream.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(seed: u64, agent: AgentId) -> Self {
        AgentRng(SmallRng::seed_from_u64(mix(seed, agent)))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`; `p` outside `[0, 1]` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A point drawn uniformly from the box spanned by `min` and `max`.
    pub fn point_in(&mut self, min: Position, max: Position) -> Position {
        Position::new(
            span(&mut self.0, min.x, max.x),
            span(&mut self.0, min.y, max.y),
            span(&mut self.0, min.z, max.z),
        )
    }
}

/// Host-side random source, used outside the tick loop.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Remove and return up to `k` distinct items from `pool`, in draw order.
    pub fn take_distinct<T>(&mut self, pool: &mut Vec<T>, k: usize) -> Vec<T> {
        let k = k.min(pool.len());
        let mut picked = Vec::with_capacity(k);
        for _ in 0..k {
            let i = self.0.gen_range(0..pool.len());
            picked.push(pool.swap_remove(i));
        }
        picked
    }
}
