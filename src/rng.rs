//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps a seedable `StdRng` and is passed
//! explicitly into every operator, so a run is reproducible from its seed alone.
//! There is no ambient global stream: each population derives its own streams
//! from its seed with [`derive_seed`].
//!
//! ## Example
//!
//! ```rust
//! use rcga::rng::RandomNumberGenerator;
//!
//! let mut a = RandomNumberGenerator::from_seed(42);
//! let mut b = RandomNumberGenerator::from_seed(42);
//!
//! assert_eq!(a.uniform(0.0, 10.0), b.uniform(0.0, 10.0));
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Mixes a base seed with a stream tag into a new, well-spread seed.
///
/// Used to give each generation and each operator an independent but
/// reproducible random stream.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    // splitmix64 finaliser
    let mut z = seed ^ stream.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A wrapper around the `rand` crate's `StdRng` with the draws the operators need.
#[derive(Debug, Clone)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a real number uniformly from the closed interval `[from, to]`.
    ///
    /// A degenerate interval (`from == to`) returns `from` exactly. Reversed bounds
    /// are swapped, and infinite ends are pulled in to the largest finite values.
    /// Spans wider than `f64::MAX` are interpolated instead of handed to `rand`,
    /// which rejects them.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let (lo, hi) = (lo.clamp(f64::MIN, f64::MAX), hi.clamp(f64::MIN, f64::MAX));
        if lo == hi {
            return lo;
        }
        if (hi - lo).is_finite() {
            self.rng.gen_range(lo..=hi)
        } else {
            let t = self.unit();
            lo * (1.0 - t) + hi * t
        }
    }

    /// Draws a real number uniformly from `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws an integer uniformly from the closed interval `[from, to]`.
    pub fn integer(&mut self, from: i64, to: i64) -> i64 {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        self.rng.gen_range(lo..=hi)
    }

    /// Draws an index uniformly from `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Returns `true` with probability `p` (clamped into `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.gen_bool(p)
    }
}
