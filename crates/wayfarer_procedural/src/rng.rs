//! # Coordinate RNG
//!
//! Deterministic generators keyed by integer coordinates or by names.
//!
//! ## Determinism Guarantee
//!
//! A region's content is never persisted. It is regenerated from its
//! coordinate every time the region is instantiated, so the same `(x, y)`
//! must always produce the same seed, and the same seed must always produce
//! the same sequence of draws (given the same sequence of calls).
//!
//! ## Pairing
//!
//! Signed coordinates are zigzag-mapped onto the naturals and combined with
//! Szudzik's pairing function. The mapping is a bijection over the full
//! `i32 x i32` domain into `u64`, so two distinct regions can never share a
//! generator state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for a [`CoordRng`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoordSeed(u64);

impl CoordSeed {
    /// Creates a seed from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Maps a signed integer onto the naturals: 0, -1, 1, -2, 2 -> 0, 1, 2, 3, 4.
#[inline]
#[must_use]
pub const fn zigzag(n: i32) -> u64 {
    ((n << 1) ^ (n >> 31)) as u32 as u64
}

/// Szudzik pairing of two signed coordinates.
///
/// Bijective over `i32 x i32`. The largest possible output is exactly
/// `u64::MAX`, so the arithmetic never overflows.
#[inline]
#[must_use]
pub const fn pair(x: i32, y: i32) -> u64 {
    let a = zigzag(x);
    let b = zigzag(y);
    if a >= b {
        a * a + a + b
    } else {
        a + b * b
    }
}

/// Derives the generator seed for a coordinate.
#[inline]
#[must_use]
pub const fn seed_from_coord(x: i32, y: i32) -> CoordSeed {
    CoordSeed(pair(x, y))
}

/// Derives the generator seed for a name (64-bit FNV-1a).
#[must_use]
pub fn seed_from_name(name: &str) -> CoordSeed {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in name.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    CoordSeed(hash)
}

/// Avalanche finalizer (splitmix64) so that nearby coordinates do not
/// produce correlated option tests.
#[inline]
const fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// One-in-`odds` test keyed by coordinate. Stable forever for a given input.
///
/// `odds` of zero never passes.
#[inline]
#[must_use]
pub const fn coord_option(x: i32, y: i32, odds: u64) -> bool {
    odds != 0 && mix(pair(x, y)) % odds == 0
}

/// One-in-`odds` test keyed by name.
#[must_use]
pub fn name_chance(name: &str, odds: u64) -> bool {
    odds != 0 && mix(seed_from_name(name).value()) % odds == 0
}

/// Seeded generator with the draw primitives generation code relies on.
#[derive(Clone, Debug)]
pub struct CoordRng {
    inner: ChaCha8Rng,
}

impl CoordRng {
    /// Creates a generator from a seed.
    #[must_use]
    pub fn from_seed(seed: CoordSeed) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed.value()),
        }
    }

    /// Generator keyed by a coordinate pair.
    #[must_use]
    pub fn for_coord(x: i32, y: i32) -> Self {
        Self::from_seed(seed_from_coord(x, y))
    }

    /// Generator keyed by a name.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        Self::from_seed(seed_from_name(name))
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    ///
    /// An empty or inverted range returns `lo` without consuming a draw.
    #[inline]
    pub fn range(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform index into a collection of `len` elements.
    ///
    /// Returns 0 for an empty collection.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }
}

/// Fair coin flip.
#[inline]
pub fn chance(rng: &mut CoordRng) -> bool {
    rng.uniform() < 0.5
}
