//! Seeded train/holdout split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{CareerLensError, Result};

/// Row indices for fitting and for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub holdout: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * holdout_fraction)` rows.
///
/// At least one row always stays in the training split; with fewer than two
/// rows the holdout is empty.
pub fn train_holdout_split(n: usize, holdout_fraction: f64, seed: u64) -> Result<Split> {
    if !(0.0..1.0).contains(&holdout_fraction) {
        return Err(CareerLensError::config(format!(
            "holdout fraction must be in [0, 1), got {holdout_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_holdout = ((n as f64) * holdout_fraction)
        .ceil()
        .min(n.saturating_sub(1) as f64) as usize;
    let train = indices.split_off(n_holdout);
    Ok(Split {
        train,
        holdout: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let split = train_holdout_split(100, 0.15, 42).unwrap();
        assert_eq!(split.holdout.len(), 15);
        assert_eq!(split.train.len(), 85);

        let split = train_holdout_split(10, 0.15, 42).unwrap();
        assert_eq!(split.holdout.len(), 2);
    }

    #[test]
    fn test_split_is_a_partition() {
        let split = train_holdout_split(37, 0.15, 7).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.holdout).copied().collect();
        all.sort();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible() {
        assert_eq!(
            train_holdout_split(50, 0.15, 42).unwrap(),
            train_holdout_split(50, 0.15, 42).unwrap()
        );
        assert_ne!(
            train_holdout_split(50, 0.15, 42).unwrap(),
            train_holdout_split(50, 0.15, 43).unwrap()
        );
    }

    #[test]
    fn test_tiny_datasets() {
        let split = train_holdout_split(1, 0.15, 42).unwrap();
        assert_eq!(split.train, vec![0]);
        assert!(split.holdout.is_empty());

        let split = train_holdout_split(2, 0.15, 42).unwrap();
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.holdout.len(), 1);

        assert!(train_holdout_split(0, 0.15, 42).unwrap().train.is_empty());
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(train_holdout_split(10, 1.0, 42).is_err());
        assert!(train_holdout_split(10, -0.1, 42).is_err());
    }
}
