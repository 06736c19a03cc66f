use crate::domain::errors::TrainingError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One expanding-window walk-forward fold.
///
/// Both ranges are contiguous row ranges over the time-ordered data, and
/// `train.end == test.start`, so every train index precedes every test index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// 1-based fold number, in chronological order.
    pub index: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

impl Fold {
    pub fn train_indices(&self) -> Vec<usize> {
        self.train.clone().collect()
    }

    pub fn test_indices(&self) -> Vec<usize> {
        self.test.clone().collect()
    }

    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    pub fn test_len(&self) -> usize {
        self.test.len()
    }
}

/// Expanding-window time-series splitter.
///
/// `n_rows` rows are cut into `n_splits + 1` contiguous chunks; fold `k` trains
/// on chunks `1..=k` and tests on chunk `k + 1`. Every test chunk holds
/// `n_rows / (n_splits + 1)` rows and the first train chunk absorbs the
/// remainder. Output depends only on `n_rows` and `n_splits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkForwardSplit {
    n_splits: usize,
}

impl Default for WalkForwardSplit {
    fn default() -> Self {
        Self { n_splits: 3 }
    }
}

impl WalkForwardSplit {
    pub fn new(n_splits: usize) -> Result<Self, TrainingError> {
        if n_splits == 0 {
            return Err(TrainingError::invalid_config(
                "walk-forward split count must be at least 1",
            ));
        }
        Ok(Self { n_splits })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn split(&self, n_rows: usize) -> Result<Vec<Fold>, TrainingError> {
        if n_rows <= self.n_splits {
            return Err(TrainingError::InsufficientRows {
                rows: n_rows,
                splits: self.n_splits,
            });
        }

        let test_size = n_rows / (self.n_splits + 1);
        let first_test_start = n_rows - self.n_splits * test_size;

        Ok((0..self.n_splits)
            .map(|k| {
                let test_start = first_test_start + k * test_size;
                Fold {
                    index: k + 1,
                    train: 0..test_start,
                    test: test_start..test_start + test_size,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let folds = WalkForwardSplit::new(3).unwrap().split(200).unwrap();

        assert_eq!(folds.len(), 3);
        assert_eq!(folds[0].train, 0..50);
        assert_eq!(folds[0].test, 50..100);
        assert_eq!(folds[1].train, 0..100);
        assert_eq!(folds[1].test, 100..150);
        assert_eq!(folds[2].train, 0..150);
        assert_eq!(folds[2].test, 150..200);
    }

    #[test]
    fn test_remainder_goes_to_first_train_chunk() {
        let folds = WalkForwardSplit::new(3).unwrap().split(10).unwrap();

        // test_size = 10 / 4 = 2, first test starts at 10 - 6 = 4
        assert_eq!(folds[0].train, 0..4);
        assert_eq!(folds[0].test, 4..6);
        assert_eq!(folds[2].test, 8..10);
    }

    #[test]
    fn test_minimum_rows() {
        let folds = WalkForwardSplit::new(3).unwrap().split(4).unwrap();
        assert_eq!(folds.len(), 3);
        assert!(folds.iter().all(|f| f.test_len() == 1 && f.train_len() >= 1));
    }

    #[test]
    fn test_too_few_rows() {
        let result = WalkForwardSplit::new(3).unwrap().split(3);
        assert_eq!(
            result,
            Err(TrainingError::InsufficientRows { rows: 3, splits: 3 })
        );
    }

    #[test]
    fn test_zero_splits_rejected() {
        assert!(matches!(
            WalkForwardSplit::new(0),
            Err(TrainingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_no_leakage_for_many_shapes() {
        for n_splits in 1..8 {
            let splitter = WalkForwardSplit::new(n_splits).unwrap();
            for n_rows in (n_splits + 1)..120 {
                let folds = splitter.split(n_rows).unwrap();
                assert_eq!(folds.len(), n_splits);

                for fold in &folds {
                    assert!(!fold.train.is_empty());
                    assert!(!fold.test.is_empty());
                    assert_eq!(fold.train.end, fold.test.start);
                    assert!(fold.test.end <= n_rows);
                }
                for pair in folds.windows(2) {
                    assert_eq!(pair[0].test.end, pair[1].test.start);
                    assert!(pair[1].train.end > pair[0].train.end);
                }
                assert_eq!(folds.last().unwrap().test.end, n_rows);
            }
        }
    }
}
