// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stream of independent uniform variates on [0, 1). One instance per
/// path; never shared between threads.
pub trait Sampler {
    fn next_1d(&mut self) -> Float;
    fn next_2d(&mut self) -> Vector2f;
}

pub struct IndependentSampler {
    rng: StdRng,
}

impl IndependentSampler {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Reproducible stream for one pixel, independent of how pixels are
    /// scheduled across workers.
    pub fn for_pixel(seed: u64, x: usize, y: usize) -> Self {
        let pixel_seed = mix(mix(mix(seed) ^ y as u64) ^ x as u64);
        Self::new(pixel_seed)
    }
}

/// SplitMix64 finalizer.
fn mix(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Sampler for IndependentSampler {
    fn next_1d(&mut self) -> Float {
        self.rng.gen::<Float>()
    }

    fn next_2d(&mut self) -> Vector2f {
        let x = self.rng.gen::<Float>();
        let y = self.rng.gen::<Float>();
        Vector2f::new(x, y)
    }
}
