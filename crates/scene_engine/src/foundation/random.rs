//! Seedable pseudo-random number generation
//!
//! Scene population must be reproducible bit-for-bit on every platform, so
//! the generator is implemented here with fixed constants instead of
//! relying on a platform default.

use crate::foundation::math::Vec3;

/// Park-Miller "minimal standard" linear congruential generator.
///
/// `x(n+1) = 48271 * x(n) mod (2^31 - 1)`, outputs in `1..=MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinStdRand {
    state: u32,
}

impl MinStdRand {
    /// Multiplier of the recurrence
    pub const MULTIPLIER: u64 = 48_271;

    /// Modulus of the recurrence (2^31 - 1)
    pub const MODULUS: u64 = 2_147_483_647;

    /// Smallest value `next_u32` can return
    pub const MIN: u32 = 1;

    /// Largest value `next_u32` can return
    pub const MAX: u32 = 2_147_483_646;

    /// Seed used by [`MinStdRand::new`]
    pub const DEFAULT_SEED: u32 = 1;

    /// Create a generator with the default seed
    pub fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// Create a generator from a seed.
    ///
    /// The seed is reduced modulo the modulus; a resulting zero state would
    /// lock the generator, so it is replaced by 1.
    pub fn with_seed(seed: u32) -> Self {
        let reduced = (u64::from(seed) % Self::MODULUS) as u32;
        Self {
            state: if reduced == 0 { 1 } else { reduced },
        }
    }

    /// Advance the generator and return the new state
    pub fn next_u32(&mut self) -> u32 {
        let next = (u64::from(self.state) * Self::MULTIPLIER) % Self::MODULUS;
        self.state = next as u32;
        self.state
    }

    /// Next value scaled into `(0, 1]`, computed in single precision
    pub fn next_unit_f32(&mut self) -> f32 {
        self.next_u32() as f32 / Self::MAX as f32
    }

    /// Point inside the box `[min, max]`, drawing x, y then z
    pub fn next_point_in(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        let span = max - min;
        let x = span.x * self.next_unit_f32();
        let y = span.y * self.next_unit_f32();
        let z = span.z * self.next_unit_f32();
        Vec3::new(x, y, z) + min
    }

    /// Discard `count` values
    pub fn discard(&mut self, count: usize) {
        for _ in 0..count {
            self.next_u32();
        }
    }
}

impl Default for MinStdRand {
    fn default() -> Self {
        Self::new()
    }
}
