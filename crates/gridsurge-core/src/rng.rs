//! Injectable randomness for incident resolution.
//!
//! Every random decision in the pipeline (which battery, which conduit, how
//! much damage on a fully mitigated surge) is drawn from one [`RandomSource`]
//! passed in by the caller. [`SimRng`] is the default implementation; tests
//! substitute scripted sources to pin each decision.

/// A source of uniform random values.
///
/// Only [`next_u64`](RandomSource::next_u64) is required. The derived helpers
/// can be overridden by sources that want to script individual decisions.
pub trait RandomSource {
    /// Generate the next `u64` in the sequence.
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        // Multiply-shift keeps the mapping deterministic across platforms.
        ((u128::from(self.next_u64()) * len as u128) >> 64) as usize
    }

    /// Uniform integer in `lo..hi`. An empty range yields `lo`.
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (i64::from(hi) - i64::from(lo)) as usize;
        (i64::from(lo) + self.index(span) as i64) as i32
    }
}

/// Pick a uniformly random element of a slice.
pub fn choose<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    items.get(rng.index(items.len()))
}

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic across platforms, so a seeded incident replays exactly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Get the internal state (for hashing/serialization).
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl RandomSource for SimRng {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
