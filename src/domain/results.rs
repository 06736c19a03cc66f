use crate::domain::errors::TrainingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Out-of-fold evaluation of one named model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Share of correct out-of-fold predictions, rounded to 3 decimals.
    pub accuracy: f64,
    /// Number of out-of-fold predictions collected.
    pub sample_count: usize,
    pub selected_features: Vec<String>,
}

/// Univariate score of one non-constant column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub name: String,
    /// `NaN` when undefined (serialized as `null`).
    pub f_statistic: f64,
    pub p_value: f64,
}

/// Train/test sizes of one processed fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldSummary {
    pub index: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Outcome of one walk-forward training call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub results: BTreeMap<String, ModelResult>,
    #[serde(serialize_with = "serialize_failures")]
    pub failures: BTreeMap<String, TrainingError>,
    pub selected_features: Vec<String>,
    /// Scores of every non-constant column; empty when ranking was skipped.
    pub feature_scores: Vec<FeatureScore>,
    pub dropped_constant: Vec<String>,
    pub folds: Vec<FoldSummary>,
}

impl TrainingReport {
    /// No model produced a result. Points at a data problem rather than
    /// weak predictive power.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, model: &str) -> Option<&ModelResult> {
        self.results.get(model)
    }

    /// Highest-accuracy model; ties resolve to the first name in order.
    pub fn best_model(&self) -> Option<(&str, &ModelResult)> {
        self.results
            .iter()
            .fold(None, |best: Option<(&String, &ModelResult)>, (name, result)| {
                match best {
                    Some((_, b)) if b.accuracy >= result.accuracy => best,
                    _ => Some((name, result)),
                }
            })
            .map(|(name, result)| (name.as_str(), result))
    }

    /// Confidence score consumed by downstream signal generation.
    pub fn best_accuracy(&self) -> Option<f64> {
        self.best_model().map(|(_, result)| result.accuracy)
    }
}

fn serialize_failures<S>(
    failures: &BTreeMap<String, TrainingError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(failures.len()))?;
    for (model, error) in failures {
        map.serialize_entry(model, &error.to_string())?;
    }
    map.end()
}

/// Round to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
