//! Deterministic per-agent RNG.
//!
//! # Determinism strategy
//!
//! Each agent owns an independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Every random fallback in the dispatch pipeline (uniform label picks,
//! gravity resampling, destination draws) goes through the owning agent's
//! `AgentRng`, so a run with a deterministic oracle replays exactly.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG.
///
/// Owned by the agent's coordinators and lent as `&mut` to each behavior for
/// the duration of one `forward` call.
#[derive(Debug, Clone)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream for a second consumer owned by the same
    /// agent (e.g. the social coordinator next to the mobility one).
    pub fn fork(&mut self, salt: u64) -> AgentRng {
        let seed = self.0.r#gen::<u64>() ^ salt.wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a uniformly random element; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// Uniformly random index into a collection of `len` items.
    #[inline]
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.0.gen_range(0..len))
    }

    /// Draw one index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` if `weights` is empty, contains a negative or
    /// non-finite value, or sums to zero.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let dist = WeightedIndex::new(weights.iter().copied()).ok()?;
        Some(dist.sample(&mut self.0))
    }

    /// Draw `n` indices **with replacement**, each with probability
    /// proportional to `weights[i]`.  Empty if the weights are unusable.
    pub fn sample_weighted(&mut self, weights: &[f64], n: usize) -> Vec<usize> {
        match WeightedIndex::new(weights.iter().copied()) {
            Ok(dist) => (0..n).map(|_| dist.sample(&mut self.0)).collect(),
            Err(_) => Vec::new(),
        }
    }
}
