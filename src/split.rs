//! Reproducible train/validation/test partitioning.
//!
//! The edge set is permuted with a Fisher-Yates shuffle driven by a
//! [`ChaCha12Rng`] seeded through `seed_from_u64`, then cut into three
//! contiguous ranges. The generator is named explicitly rather than taken
//! from `StdRng`, whose algorithm may change between rand releases. For a
//! fixed insertion order and seed the result is identical on every run and
//! every machine.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::interactions::{Interaction, InteractionSet};

/// Allowed deviation of the ratio sum from 1.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Validated train/valid/test fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub valid: f64,
    pub test: f64,
}

impl SplitRatios {
    /// Validate a ratio triple: each in `[0, 1]` and summing to 1.
    pub fn new(ratios: [f64; 3]) -> ConfigResult<Self> {
        for &value in &ratios {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioValue { value });
            }
        }
        let sum: f64 = ratios.iter().sum();
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(ConfigError::RatioSum { ratios, sum });
        }
        Ok(Self {
            train: ratios[0],
            valid: ratios[1],
            test: ratios[2],
        })
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.train, self.valid, self.test]
    }

    /// Subset sizes for `n` edges: truncated train and valid, remainder to test.
    pub fn sizes(&self, n: usize) -> ConfigResult<SplitSizes> {
        let train = (n as f64 * self.train).floor() as usize;
        let valid = (n as f64 * self.valid).floor() as usize;
        let test = n
            .checked_sub(train)
            .and_then(|rest| rest.checked_sub(valid))
            .ok_or(ConfigError::RatioSum {
                ratios: self.as_array(),
                sum: self.as_array().iter().sum(),
            })?;
        Ok(SplitSizes { train, valid, test })
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.9,
            valid: 0.05,
            test: 0.05,
        }
    }
}

/// Sizes of the three subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSizes {
    pub train: usize,
    pub valid: usize,
    pub test: usize,
}

/// Disjoint train/valid/test subsets of an interaction set.
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub train: Vec<Interaction>,
    pub valid: Vec<Interaction>,
    pub test: Vec<Interaction>,
}

impl Split {
    pub fn sizes(&self) -> SplitSizes {
        SplitSizes {
            train: self.train.len(),
            valid: self.valid.len(),
            test: self.test.len(),
        }
    }

    /// Validation and test edges together.
    pub fn held_out(&self) -> impl Iterator<Item = &Interaction> {
        self.valid.iter().chain(self.test.iter())
    }
}

/// Seeded permutation of `0..n`.
pub fn permutation(n: usize, seed: u64) -> Vec<usize> {
    let mut index: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    index.shuffle(&mut rng);
    index
}

/// Partition `edges` into train/valid/test.
///
/// Sizes are `floor(n * r0)`, `floor(n * r1)` and the remainder. Each subset
/// keeps the order of the permuted indices.
pub fn split_interactions(
    edges: &InteractionSet,
    ratios: SplitRatios,
    seed: u64,
) -> ConfigResult<Split> {
    let all = edges.as_slice();
    let sizes = ratios.sizes(all.len())?;
    let index = permutation(all.len(), seed);

    let (train_idx, rest) = index.split_at(sizes.train);
    let (valid_idx, test_idx) = rest.split_at(sizes.valid);
    let pick = |ids: &[usize]| ids.iter().map(|&i| all[i].clone()).collect::<Vec<_>>();

    let split = Split {
        train: pick(train_idx),
        valid: pick(valid_idx),
        test: pick(test_idx),
    };
    tracing::info!(
        train = split.train.len(),
        valid = split.valid.len(),
        test = split.test.len(),
        seed,
        "split interactions"
    );
    Ok(split)
}
