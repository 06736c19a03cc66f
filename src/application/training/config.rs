use crate::application::ml::{ModelBankProfile, ModelSpec};
use crate::application::selection::DEFAULT_MAX_FEATURES;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SPLITS: usize = 3;

/// Parameters of one walk-forward training call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of expanding-window folds.
    pub n_splits: usize,
    /// Upper bound on selected feature columns.
    pub max_features: usize,
    /// Run constant-column filtering and F-test ranking before folding.
    pub feature_selection: bool,
    /// Train the models of a fold on the rayon pool instead of in sequence.
    pub parallel_models: bool,
    pub models: Vec<ModelSpec>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::for_profile(ModelBankProfile::Optimized)
    }
}

impl TrainingConfig {
    pub fn for_profile(profile: ModelBankProfile) -> Self {
        Self {
            n_splits: DEFAULT_SPLITS,
            max_features: DEFAULT_MAX_FEATURES,
            feature_selection: profile.selects_features(),
            parallel_models: false,
            models: profile.models(),
        }
    }

    pub fn with_splits(mut self, n_splits: usize) -> Self {
        self.n_splits = n_splits;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_parallel_models(mut self, parallel: bool) -> Self {
        self.parallel_models = parallel;
        self
    }

    pub fn with_models(mut self, models: Vec<ModelSpec>) -> Self {
        self.models = models;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.n_splits, 3);
        assert_eq!(config.max_features, 15);
        assert!(config.feature_selection);
        assert!(!config.parallel_models);
        assert_eq!(config.models.len(), 2);
    }

    #[test]
    fn test_baseline_profile_skips_selection() {
        let config = TrainingConfig::for_profile(ModelBankProfile::Baseline);
        assert!(!config.feature_selection);
    }
}
