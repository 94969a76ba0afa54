//! Sources of feature values for the generator.
//!
//! [`RngSampler`] is the production source; [`MidpointSampler`] makes
//! generation fully deterministic so tests can check the yield formulas
//! against known inputs.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::types::FeatureRange;

pub trait FeatureSampler {
    /// One draw from `[range.min, range.max)`. Callers guarantee
    /// `range.min <= range.max`.
    fn sample(&mut self, range: FeatureRange) -> f64;
}

impl<S: FeatureSampler + ?Sized> FeatureSampler for &mut S {
    fn sample(&mut self, range: FeatureRange) -> f64 {
        (**self).sample(range)
    }
}

#[derive(Debug, Clone)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSampler<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RngSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FeatureSampler for RngSampler<R> {
    fn sample(&mut self, range: FeatureRange) -> f64 {
        // gen_range panics on an empty range
        if range.min >= range.max {
            return range.min;
        }
        self.rng.gen_range(range.min..range.max)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSampler;

impl FeatureSampler for MidpointSampler {
    fn sample(&mut self, range: FeatureRange) -> f64 {
        range.midpoint()
    }
}
