// crates/tally_core/src/rng.rs
//
// Deterministic, integer-only RNG for tie-breaking under `TiePolicy::Random`.
// • `tie_seed` is the only source of randomness; no OS entropy.
// • Unbiased ranges via rejection sampling.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Deterministic RNG for ties.
///
/// ChaCha20 seeded with the 64-bit tie seed in little-endian order in the
/// first 8 bytes of the 32-byte key; the remaining 24 bytes are zero.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
}

impl TieRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Unbiased integer in [0, n). Returns `None` if `n == 0`.
    ///
    /// Accept `x` if `x >= 2^64 mod n`; then `x % n` is uniform.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Deterministic in-place Fisher–Yates shuffle.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            // i + 1 > 0, so a value is always produced.
            let j = self.gen_range(i as u64 + 1).unwrap_or(0) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick one index of a non-empty slice.
    #[inline]
    pub fn choose_one_index<T>(&mut self, slice: &[T]) -> Option<usize> {
        self.gen_range(slice.len() as u64).map(|v| v as usize)
    }
}
