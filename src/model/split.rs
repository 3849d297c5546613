use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{DetectorError, Result};
use crate::models::Label;

/// Indices of a train/held-out partition, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified split of `labels` into train and held-out indices.
///
/// Each class is shuffled on its own with a [`StdRng`] seeded from `seed`
/// (classes visited in label order) and contributes `ceil(count * test_ratio)`
/// examples to the held-out side. Same labels + seed always give the same split.
pub fn stratified_split(labels: &[Label], test_ratio: f64, seed: u64) -> Result<Split> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(DetectorError::Configuration(format!(
            "test ratio must be within (0, 1), got {}",
            test_ratio
        )));
    }

    let mut groups: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        groups.entry(*label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for (label, mut indices) in groups {
        // guard against 0.2 * 10 landing a hair above 2
        let n_test = (indices.len() as f64 * test_ratio - 1e-9).ceil() as usize;
        if n_test == 0 || n_test >= indices.len() {
            return Err(DetectorError::Configuration(format!(
                "class '{}' has {} example(s), too few for a {:.0}% held-out split",
                label,
                indices.len(),
                test_ratio * 100.0
            )));
        }

        indices.shuffle(&mut rng);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(Split { train, test })
}
