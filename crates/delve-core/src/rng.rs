//! Deterministic random number generation.
//!
//! Every random decision in the simulation goes through [`Lcg`], a 32-bit
//! linear congruential generator:
//!
//! ```text
//! state = (1664525 * state + 1013904223) mod 2^32
//! value = state / 2^32
//! ```
//!
//! The arithmetic is unsigned 32-bit wraparound, so the stream is bit-exact
//! across platforms and across implementations in other languages.
//!
//! Call sites that need independent reproducibility derive their own seed
//! (for example `base.wrapping_add(turn)`) instead of sharing one generator
//! between unrelated decisions.
//!
//! # Example
//!
//! ```
//! use delve_core::rng::make_rng;
//!
//! let mut a = make_rng(7);
//! let mut b = make_rng(7);
//! for _ in 0..16 {
//!     let x = a();
//!     assert!((0.0..1.0).contains(&x));
//!     assert_eq!(x.to_bits(), b().to_bits());
//! }
//! ```

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// LCG multiplier (Numerical Recipes).
pub const LCG_MULTIPLIER: u32 = 1_664_525;
/// LCG increment (Numerical Recipes).
pub const LCG_INCREMENT: u32 = 1_013_904_223;

const TWO_POW_32: f64 = 4_294_967_296.0;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Seeded 32-bit linear congruential generator.
///
/// Implements [`RngCore`], so it can drive any `rand` API (`SliceRandom`,
/// `Rng::gen_range`, ...) while keeping the exact stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Creates a generator from a 32-bit seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Creates a generator from a seed string. See [`seed_from_str`].
    #[must_use]
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(seed_from_str(seed))
    }

    /// Advances the state once and returns it.
    pub fn next_state(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Advances the state once and returns `state / 2^32`, in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_state()) / TWO_POW_32
    }

    /// Current internal state (the last value returned by `next_state`).
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.next_state()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_state());
        let low = u64::from(self.next_state());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_state().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    // Keep the low 32 bits so `seed_from_u64(n)` matches `Lcg::new(n)`.
    #[allow(clippy::cast_possible_truncation)]
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}

/// Returns a closure producing the float stream for `seed`.
///
/// Each call advances the closed-over state once.
pub fn make_rng(seed: u32) -> impl FnMut() -> f64 {
    let mut rng = Lcg::new(seed);
    move || rng.next_f64()
}

/// Maps a seed string onto a 32-bit seed.
///
/// Decimal strings in `u32` range parse directly (`"42"` is seed 42);
/// anything else is hashed with 32-bit FNV-1a.
#[must_use]
pub fn seed_from_str(seed: &str) -> u32 {
    seed.trim().parse::<u32>().unwrap_or_else(|_| fnv1a(seed.as_bytes()))
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
