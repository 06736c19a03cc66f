use crate::domain::dataset::{FeatureMatrix, TargetVector, ensure_aligned, ensure_two_classes};
use crate::domain::errors::TrainingError;
use crate::domain::results::FeatureScore;
use crate::domain::stats::Stats;
use std::cmp::Ordering;
use tracing::debug;

pub const DEFAULT_MAX_FEATURES: usize = 15;

/// Reduced matrix plus the diagnostics of how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSelection {
    pub matrix: FeatureMatrix,
    pub selected: Vec<String>,
    pub dropped_constant: Vec<String>,
    /// Empty when ranking was skipped (one or zero columns survived).
    pub scores: Vec<FeatureScore>,
}

/// Constant-column filter followed by top-K ANOVA F ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSelector {
    max_features: usize,
}

impl Default for FeatureSelector {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl FeatureSelector {
    pub fn new(max_features: usize) -> Result<Self, TrainingError> {
        if max_features == 0 {
            return Err(TrainingError::invalid_config(
                "max selected features must be at least 1",
            ));
        }
        Ok(Self { max_features })
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn select(
        &self,
        features: &FeatureMatrix,
        target: &TargetVector,
    ) -> Result<FeatureSelection, TrainingError> {
        ensure_aligned(features, target)?;
        ensure_two_classes(target)?;

        let (kept, dropped): (Vec<usize>, Vec<usize>) = (0..features.n_columns())
            .partition(|&c| !Stats::is_constant(features.column_values(c)));
        let dropped_constant: Vec<String> = dropped
            .iter()
            .map(|&c| features.columns()[c].clone())
            .collect();

        if !dropped_constant.is_empty() {
            debug!("Dropping constant feature columns: {:?}", dropped_constant);
        }

        if kept.len() <= 1 {
            let matrix = features.select_columns(&kept);
            return Ok(FeatureSelection {
                selected: matrix.columns().to_vec(),
                matrix,
                dropped_constant,
                scores: Vec::new(),
            });
        }

        let scores: Vec<FeatureScore> = kept
            .iter()
            .map(|&c| {
                let values: Vec<f64> = features.column_values(c).collect();
                let score = Stats::anova_f(&values, target.labels());
                FeatureScore {
                    name: features.columns()[c].clone(),
                    f_statistic: score.f_statistic,
                    p_value: score.p_value,
                }
            })
            .collect();

        let k = self.max_features.min(kept.len());
        let mut ranked: Vec<usize> = (0..kept.len()).collect();
        // Stable sort: equal scores keep column order.
        ranked.sort_by(|&a, &b| rank_order(scores[a].f_statistic, scores[b].f_statistic));
        let mut chosen: Vec<usize> = ranked.into_iter().take(k).collect();
        chosen.sort_unstable();

        let positions: Vec<usize> = chosen.iter().map(|&i| kept[i]).collect();
        let matrix = features.select_columns(&positions);

        debug!(
            "Selected {} of {} non-constant features: {:?}",
            matrix.n_columns(),
            kept.len(),
            matrix.columns()
        );

        Ok(FeatureSelection {
            selected: matrix.columns().to_vec(),
            matrix,
            dropped_constant,
            scores,
        })
    }
}

/// Descending by score, `NaN` last.
fn rank_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
