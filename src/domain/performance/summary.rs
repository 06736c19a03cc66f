use crate::domain::results::TrainingReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accuracy a model must beat to count as a success.
pub const DEFAULT_SUCCESS_BASELINE: f64 = 0.55;

/// Cross-instrument summary of walk-forward training outcomes.
///
/// Each instrument contributes its best model accuracy. Instruments whose
/// report is empty carry no accuracy and are only counted in
/// `instruments_without_models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub average_accuracy: f64,
    pub max_accuracy: f64,
    pub min_accuracy: f64,
    /// Share of scored instruments whose best accuracy exceeds the baseline.
    pub success_rate: f64,
    pub total_instruments: usize,
    pub instruments_without_models: usize,
    pub baseline: f64,
    pub generated_at: DateTime<Utc>,
}

impl PerformanceSummary {
    /// Summarize per-instrument reports. `None` when no instrument has a
    /// successful model.
    pub fn from_reports(reports: &BTreeMap<String, TrainingReport>, baseline: f64) -> Option<Self> {
        let accuracies: Vec<f64> = reports
            .values()
            .filter_map(TrainingReport::best_accuracy)
            .collect();

        if accuracies.is_empty() {
            return None;
        }

        let n = accuracies.len() as f64;
        let successes = accuracies.iter().filter(|&&a| a > baseline).count();

        Some(Self {
            average_accuracy: accuracies.iter().sum::<f64>() / n,
            max_accuracy: accuracies.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            min_accuracy: accuracies.iter().cloned().fold(f64::INFINITY, f64::min),
            success_rate: successes as f64 / n,
            total_instruments: accuracies.len(),
            instruments_without_models: reports.len() - accuracies.len(),
            baseline,
            generated_at: Utc::now(),
        })
    }

    pub fn above_baseline(&self) -> bool {
        self.average_accuracy > self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::results::ModelResult;

    fn report(accuracies: &[(&str, f64)]) -> TrainingReport {
        TrainingReport {
            results: accuracies
                .iter()
                .map(|(name, accuracy)| {
                    (
                        name.to_string(),
                        ModelResult {
                            accuracy: *accuracy,
                            sample_count: 100,
                            selected_features: vec![],
                        },
                    )
                })
                .collect(),
            failures: BTreeMap::new(),
            selected_features: vec![],
            feature_scores: vec![],
            dropped_constant: vec![],
            folds: vec![],
        }
    }

    #[test]
    fn test_summary_uses_best_model_per_instrument() {
        let mut reports = BTreeMap::new();
        reports.insert(
            "AAPL".to_string(),
            report(&[("random_forest", 0.52), ("gradient_boost", 0.61)]),
        );
        reports.insert("MSFT".to_string(), report(&[("random_forest", 0.50)]));
        reports.insert("TSLA".to_string(), report(&[]));

        let summary = PerformanceSummary::from_reports(&reports, DEFAULT_SUCCESS_BASELINE).unwrap();

        assert_eq!(summary.total_instruments, 2);
        assert_eq!(summary.instruments_without_models, 1);
        assert!((summary.average_accuracy - 0.555).abs() < 1e-12);
        assert_eq!(summary.max_accuracy, 0.61);
        assert_eq!(summary.min_accuracy, 0.50);
        assert_eq!(summary.success_rate, 0.5);
        assert!(summary.above_baseline());
    }

    #[test]
    fn test_summary_none_without_models() {
        let mut reports = BTreeMap::new();
        reports.insert("TSLA".to_string(), report(&[]));
        assert!(PerformanceSummary::from_reports(&reports, DEFAULT_SUCCESS_BASELINE).is_none());
    }
}
