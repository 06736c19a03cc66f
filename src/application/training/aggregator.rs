use crate::domain::results::{ModelResult, round3};
use std::collections::BTreeMap;

/// Out-of-fold predictions and their true labels, appended in fold order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutOfFold {
    predictions: Vec<u8>,
    actuals: Vec<u8>,
}

impl OutOfFold {
    pub fn extend(&mut self, predictions: &[u8], actuals: &[u8]) {
        debug_assert_eq!(predictions.len(), actuals.len());
        self.predictions.extend_from_slice(predictions);
        self.actuals.extend_from_slice(actuals);
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Unrounded share of matching predictions; `None` when empty.
    pub fn accuracy(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let correct = self
            .predictions
            .iter()
            .zip(&self.actuals)
            .filter(|(p, a)| p == a)
            .count();
        Some(correct as f64 / self.len() as f64)
    }
}

/// Turn per-model buffers into results. Models without predictions are left
/// out instead of reporting a division by zero.
pub fn aggregate(
    buffers: &BTreeMap<String, OutOfFold>,
    selected_features: &[String],
) -> BTreeMap<String, ModelResult> {
    buffers
        .iter()
        .filter_map(|(name, oof)| {
            oof.accuracy().map(|accuracy| {
                (
                    name.clone(),
                    ModelResult {
                        accuracy: round3(accuracy),
                        sample_count: oof.len(),
                        selected_features: selected_features.to_vec(),
                    },
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_over_concatenated_folds() {
        let mut oof = OutOfFold::default();
        oof.extend(&[1, 0, 1], &[1, 1, 1]);
        oof.extend(&[0, 0, 0], &[0, 0, 1]);

        assert_eq!(oof.len(), 6);
        assert!((oof.accuracy().unwrap() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_rounds_and_skips_empty() {
        let mut buffers = BTreeMap::new();
        let mut good = OutOfFold::default();
        good.extend(&[1, 0, 1], &[1, 1, 1]);
        buffers.insert("random_forest".to_string(), good);
        buffers.insert("gradient_boost".to_string(), OutOfFold::default());

        let features = vec!["rsi_14".to_string()];
        let results = aggregate(&buffers, &features);

        assert_eq!(results.len(), 1);
        let rf = &results["random_forest"];
        assert_eq!(rf.accuracy, 0.667);
        assert_eq!(rf.sample_count, 3);
        assert_eq!(rf.selected_features, features);
    }
}
