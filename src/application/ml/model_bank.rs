use super::bagging::{BaggingClassifier, BaggingParams};
use super::boosting::{BoostingClassifier, BoostingParams};
use super::classifier::Classifier;
use crate::domain::errors::TrainingError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

/// Declarative description of one model in the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Bagging(BaggingParams),
    Boosting(BoostingParams),
}

impl ModelSpec {
    pub fn name(&self) -> &str {
        match self {
            ModelSpec::Bagging(p) => &p.name,
            ModelSpec::Boosting(p) => &p.name,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelSpec::Bagging(p) => p.validate(),
            ModelSpec::Boosting(p) => p.validate(),
        }
    }

    pub fn build(&self) -> Arc<dyn Classifier> {
        match self {
            ModelSpec::Bagging(p) => Arc::new(BaggingClassifier::new(p.clone())),
            ModelSpec::Boosting(p) => Arc::new(BoostingClassifier::new(p.clone())),
        }
    }
}

/// Preset model banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelBankProfile {
    /// Untuned ensembles, trained on every feature column.
    Baseline,
    /// Tuned ensembles, trained on the selected feature subset.
    #[default]
    Optimized,
}

impl FromStr for ModelBankProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" => Ok(ModelBankProfile::Baseline),
            "optimized" => Ok(ModelBankProfile::Optimized),
            _ => anyhow::bail!(
                "Invalid model bank profile: {}. Must be 'baseline' or 'optimized'",
                s
            ),
        }
    }
}

impl ModelBankProfile {
    pub fn models(&self) -> Vec<ModelSpec> {
        match self {
            ModelBankProfile::Baseline => vec![
                ModelSpec::Bagging(BaggingParams {
                    n_trees: 100,
                    max_depth: None,
                    min_samples_split: 2,
                    ..Default::default()
                }),
                ModelSpec::Boosting(BoostingParams {
                    n_estimators: 100,
                    max_depth: 3,
                    ..Default::default()
                }),
            ],
            ModelBankProfile::Optimized => vec![
                ModelSpec::Bagging(BaggingParams::default()),
                ModelSpec::Boosting(BoostingParams::default()),
            ],
        }
    }

    /// Whether this profile ranks and prunes feature columns before training.
    pub fn selects_features(&self) -> bool {
        matches!(self, ModelBankProfile::Optimized)
    }
}

/// Fixed, named set of classifiers trained independently on every fold.
#[derive(Clone)]
pub struct ModelBank {
    models: Vec<Arc<dyn Classifier>>,
}

impl std::fmt::Debug for ModelBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.models.iter().map(|m| m.name()))
            .finish()
    }
}

impl ModelBank {
    pub fn from_specs(specs: &[ModelSpec]) -> Result<Self, TrainingError> {
        for spec in specs {
            spec.validate().map_err(TrainingError::invalid_config)?;
        }
        Self::new(specs.iter().map(ModelSpec::build).collect())
    }

    /// Bank over arbitrary classifiers. Names must be unique.
    pub fn new(models: Vec<Arc<dyn Classifier>>) -> Result<Self, TrainingError> {
        if models.is_empty() {
            return Err(TrainingError::invalid_config("model bank is empty"));
        }
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.name().to_string()) {
                return Err(TrainingError::invalid_config(format!(
                    "duplicate model name '{}'",
                    model.name()
                )));
            }
        }
        Ok(Self { models })
    }

    pub fn models(&self) -> &[Arc<dyn Classifier>] {
        &self.models
    }

    pub fn names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_name_both_ensembles() {
        for profile in [ModelBankProfile::Baseline, ModelBankProfile::Optimized] {
            let bank = ModelBank::from_specs(&profile.models()).unwrap();
            assert_eq!(
                bank.names(),
                vec!["random_forest".to_string(), "gradient_boost".to_string()]
            );
        }
    }

    #[test]
    fn test_optimized_hyperparameters() {
        let models = ModelBankProfile::Optimized.models();
        match (&models[0], &models[1]) {
            (ModelSpec::Bagging(rf), ModelSpec::Boosting(gb)) => {
                assert_eq!(rf.n_trees, 200);
                assert_eq!(rf.max_depth, Some(10));
                assert_eq!(rf.min_samples_split, 10);
                assert_eq!(gb.n_estimators, 200);
                assert_eq!(gb.max_depth, 6);
                assert_eq!(gb.learning_rate, 0.1);
                assert_eq!((rf.seed, gb.seed), (42, 42));
            }
            other => panic!("unexpected model bank: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let specs = vec![
            ModelSpec::Bagging(BaggingParams::default()),
            ModelSpec::Bagging(BaggingParams::default()),
        ];
        assert!(matches!(
            ModelBank::from_specs(&specs),
            Err(TrainingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let specs = vec![ModelSpec::Boosting(BoostingParams {
            learning_rate: 2.0,
            ..Default::default()
        })];
        assert!(ModelBank::from_specs(&specs).is_err());
    }

    #[test]
    fn test_spec_toml_roundtrip_with_defaults() {
        let toml_src = r#"
            kind = "boosting"
            name = "fast_boost"
            n_estimators = 25
        "#;
        let spec: ModelSpec = toml::from_str(toml_src).unwrap();
        match spec {
            ModelSpec::Boosting(p) => {
                assert_eq!(p.name, "fast_boost");
                assert_eq!(p.n_estimators, 25);
                assert_eq!(p.max_depth, 6);
            }
            other => panic!("expected boosting spec, got {:?}", other),
        }
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(
            "Baseline".parse::<ModelBankProfile>().unwrap(),
            ModelBankProfile::Baseline
        );
        assert!("turbo".parse::<ModelBankProfile>().is_err());
    }
}
