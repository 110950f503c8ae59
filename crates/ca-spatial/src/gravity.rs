//! Gravity-model destination sampling.
//!
//! # Algorithm
//!
//! Given `(place, distance)` pairs:
//!
//! 1. Bucket each candidate into a 1 km ring: ring *d* (1..=10) covers
//!    `[(d-1)·1000, d·1000)` metres; anything at or beyond 10 km goes to the
//!    overflow ring.
//! 2. Density = (candidates in the ring) / (ring area).
//! 3. Raw weight = density / max(distance, 1)².
//! 4. Resampling probability ∝ 1 / √max(distance, 1), over all candidates.
//! 5. Draw `sample_size` indices with replacement by those probabilities.
//! 6. Renormalize the drawn raw weights to sum to 1.
//!
//! The overflow ring is the annulus from 10 km out to the first whole
//! kilometre strictly beyond the farthest overflow candidate, so every
//! candidate receives a positive weight and non-empty input always yields
//! non-empty output.
//!
//! Both passes (counting and weighting) go through [`Ring::of`], so the two
//! can never disagree on a boundary.

use std::f64::consts::PI;

use ca_core::{AgentRng, PlaceId};

use crate::Place;

pub const RING_WIDTH_M: f64 = 1_000.0;
pub const RING_COUNT: u32 = 10;
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

const OVERFLOW_START_M: f64 = RING_WIDTH_M * RING_COUNT as f64;

/// One entry of a weighted candidate set.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub name:     String,
    pub id:       PlaceId,
    /// Selection probability; the weights of one returned set sum to 1.
    pub weight:   f64,
    pub distance: f64,
}

/// Distance bucket used for density.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ring {
    /// Ring 1..=10.
    Inner(u32),
    Overflow,
}

impl Ring {
    pub fn of(distance_m: f64) -> Ring {
        for d in 1..=RING_COUNT {
            let lo = (d - 1) as f64 * RING_WIDTH_M;
            let hi = d as f64 * RING_WIDTH_M;
            if lo <= distance_m && distance_m < hi {
                return Ring::Inner(d);
            }
        }
        Ring::Overflow
    }

    fn slot(self) -> usize {
        match self {
            Ring::Inner(d) => (d - 1) as usize,
            Ring::Overflow => RING_COUNT as usize,
        }
    }

    /// Area in m².  `outer_m` bounds the overflow ring and is ignored for
    /// inner rings.
    pub fn area_m2(self, outer_m: f64) -> f64 {
        match self {
            Ring::Inner(d) => {
                let outer = d as f64 * RING_WIDTH_M;
                let inner = (d - 1) as f64 * RING_WIDTH_M;
                PI * (outer * outer - inner * inner)
            }
            Ring::Overflow => PI * (outer_m * outer_m - OVERFLOW_START_M * OVERFLOW_START_M),
        }
    }
}

/// Samples destinations by spatial density and distance decay.
#[derive(Copy, Clone, Debug)]
pub struct GravityModel {
    pub sample_size: usize,
}

impl Default for GravityModel {
    fn default() -> Self {
        Self { sample_size: DEFAULT_SAMPLE_SIZE }
    }
}

impl GravityModel {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Raw (unnormalized) weight of every candidate, in input order.
    pub fn score(&self, candidates: &[(Place, f64)]) -> Vec<f64> {
        let mut counts = [0usize; RING_COUNT as usize + 1];
        let mut overflow_max = OVERFLOW_START_M;
        for (_, distance) in candidates {
            let ring = Ring::of(*distance);
            counts[ring.slot()] += 1;
            if ring == Ring::Overflow && distance.is_finite() {
                overflow_max = overflow_max.max(*distance);
            }
        }
        // First whole kilometre strictly beyond the farthest candidate.
        let overflow_outer = ((overflow_max / RING_WIDTH_M).floor() + 1.0) * RING_WIDTH_M;

        candidates
            .iter()
            .map(|(_, distance)| {
                let ring = Ring::of(*distance);
                let density = counts[ring.slot()] as f64 / ring.area_m2(overflow_outer);
                let d = distance.max(1.0);
                density / (d * d)
            })
            .collect()
    }

    /// Draw a weighted working subset of at most `sample_size` candidates.
    ///
    /// Entries may repeat (the draw is with replacement).  Empty input, or
    /// input whose distances are all unusable, gives an empty result.
    pub fn select(&self, candidates: &[(Place, f64)], rng: &mut AgentRng) -> Vec<Candidate> {
        if candidates.is_empty() || self.sample_size == 0 {
            return Vec::new();
        }
        let raw = self.score(candidates);
        let resample: Vec<f64> = candidates
            .iter()
            .map(|(_, distance)| 1.0 / distance.max(1.0).sqrt())
            .collect();

        let drawn = rng.sample_weighted(&resample, self.sample_size);
        let total: f64 = drawn.iter().map(|&i| raw[i]).sum();
        if !(total.is_finite() && total > 0.0) {
            return Vec::new();
        }

        drawn
            .into_iter()
            .map(|i| {
                let (place, distance) = &candidates[i];
                Candidate {
                    name:     place.name.clone(),
                    id:       place.id,
                    weight:   raw[i] / total,
                    distance: *distance,
                }
            })
            .collect()
    }

    /// [`select`](Self::select), then one weighted draw from the subset.
    pub fn choose(&self, candidates: &[(Place, f64)], rng: &mut AgentRng) -> Option<Candidate> {
        let subset = self.select(candidates, rng);
        let weights: Vec<f64> = subset.iter().map(|c| c.weight).collect();
        let i = rng.pick_weighted(&weights)?;
        subset.into_iter().nth(i)
    }
}
