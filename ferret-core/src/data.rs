//! Core data types for the Ferret search engine.

use std::fmt;
use std::time::Duration;

use crate::error::SearchError;

/// Splittable random seed for deterministic searches.
///
/// Seeds can be split to create independent random streams,
/// ensuring deterministic and reproducible searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Split a seed into two independent seeds.
    /// Uses SplitMix64 splitting strategy for independence.
    pub fn split(self) -> (Self, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        let new_gamma = mix_gamma(output);

        (Seed(new_state, gamma), Seed(output, new_gamma))
    }

    /// Generate the next random value and advance the seed.
    /// Uses SplitMix64 algorithm for high-quality randomness.
    pub fn next_u64(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Generate a random seed from OS entropy.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed(rng.gen(), rng.gen())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}, {})", self.0, self.1)
    }
}

/// A mutable cursor over a [`Seed`].
///
/// All candidate generation draws from a `RandomSource` that is passed
/// explicitly through every call, so searches are reentrant and can be
/// replayed from a fixed seed. There is no global random state.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: Seed,
}

impl RandomSource {
    /// Create a source that replays deterministically from `seed`.
    pub fn from_seed(seed: Seed) -> Self {
        RandomSource { seed }
    }

    /// Draw the next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let (value, next) = self.seed.next_u64();
        self.seed = next;
        value
    }

    /// Draw a value in `[0, bound)`. A zero bound yields zero.
    pub fn next_bounded(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        let value = self.next_u64();
        (value as u128 * bound as u128 >> 64) as u64
    }

    /// Draw a random bool.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    /// Draw a float in the unit interval `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Split off an independent source, advancing this one.
    ///
    /// Used by strategies whose values keep drawing lazily after the
    /// search driver has moved on, so that the late draws cannot perturb
    /// the driver's own stream.
    pub fn fork(&mut self) -> RandomSource {
        let (keep, forked) = self.seed.split();
        self.seed = keep;
        RandomSource { seed: forked }
    }

    /// The current seed state, usable as a provenance fingerprint.
    pub fn state(&self) -> u64 {
        self.seed.0
    }
}

/// Immutable configuration for a search.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Maximum number of candidates to draw before giving up.
    pub max_examples: usize,

    /// Minimum number of filter-passing candidates that must have been
    /// considered before giving up counts as meaningful. Candidates
    /// rejected by `assume` filters do not count toward this.
    pub min_satisfying_examples: usize,

    /// Wall-clock budget for the search. `None` means unbounded. The
    /// timeout is polled between iterations only; a predicate that blocks
    /// inside a single evaluation cannot be interrupted.
    pub timeout: Option<Duration>,

    /// Maximum number of simplification attempts while shrinking.
    pub max_shrinks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_examples: 200,
            min_satisfying_examples: 5,
            timeout: Some(Duration::from_secs(60)),
            max_shrinks: 500,
        }
    }
}

impl Settings {
    /// Create settings with the given example budget.
    pub fn with_max_examples(mut self, max_examples: usize) -> Self {
        self.max_examples = max_examples;
        self
    }

    /// Create settings with the given minimum satisfying-example count.
    pub fn with_min_satisfying_examples(mut self, min: usize) -> Self {
        self.min_satisfying_examples = min;
        self
    }

    /// Create settings with the given wall-clock budget.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create settings with a wall-clock budget given in seconds.
    ///
    /// `0.0` means unbounded. Negative or non-finite values are invalid.
    pub fn with_timeout_secs(self, secs: f64) -> Result<Self, SearchError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(SearchError::InvalidSettings {
                message: format!("timeout must be a non-negative number of seconds, got {secs}"),
            });
        }
        let timeout = if secs == 0.0 {
            None
        } else {
            Some(Duration::from_secs_f64(secs))
        };
        Ok(self.with_timeout(timeout))
    }

    /// Create settings with the given shrink-attempt budget.
    pub fn with_max_shrinks(mut self, max_shrinks: usize) -> Self {
        self.max_shrinks = max_shrinks;
        self
    }
}

/// SplitMix64 mixing function for high-quality output.
pub(crate) fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
