//! Precomputed rotation noise.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Default number of entries in a session jitter table.
pub const DEFAULT_JITTER_LEN: usize = 100;

/// A fixed table of pseudo-random values in `[-1, 1]`.
///
/// Built once per generator and read-only afterwards; symbol `i` reads entry
/// `i % len`. An empty table reads as zero everywhere (no noise).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JitterTable {
    values: Vec<f32>,
}

impl JitterTable {
    /// Fills a table of `len` entries from `rng`.
    pub fn from_rng<R: Rng>(rng: &mut R, len: usize) -> Self {
        let values = (0..len).map(|_| rng.random_range(-1.0..=1.0)).collect();
        Self { values }
    }

    /// Fills a table of `len` entries from a `Pcg32` seeded with `seed`.
    pub fn from_seed(seed: u64, len: usize) -> Self {
        Self::from_rng(&mut Pcg32::seed_from_u64(seed), len)
    }

    /// Wraps explicit values, clamping each into `[-1, 1]`.
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().map(|v| v.clamp(-1.0, 1.0)).collect(),
        }
    }

    /// A table that applies no noise.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values[index % self.values.len()]
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
