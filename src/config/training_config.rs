//! Training configuration parsing from environment variables.
//!
//! Engine parameters come from `WF_*` variables; a model bank can be swapped
//! in from a TOML file with one `[[models]]` table per model.

use crate::application::ml::{ModelBankProfile, ModelSpec};
use crate::application::selection::DEFAULT_MAX_FEATURES;
use crate::application::training::{DEFAULT_SPLITS, TrainingConfig};
use crate::domain::performance::DEFAULT_SUCCESS_BASELINE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Rows below which the caller refuses to train.
pub const DEFAULT_MIN_ROWS: usize = 20;

/// Training environment configuration
#[derive(Debug, Clone)]
pub struct TrainingEnvConfig {
    pub n_splits: usize,
    pub max_features: usize,
    pub min_rows: usize,
    pub parallel_models: bool,
    pub profile: ModelBankProfile,
    /// Accuracy threshold for downstream signal generation.
    pub min_confidence: f64,
}

impl Default for TrainingEnvConfig {
    fn default() -> Self {
        Self {
            n_splits: DEFAULT_SPLITS,
            max_features: DEFAULT_MAX_FEATURES,
            min_rows: DEFAULT_MIN_ROWS,
            parallel_models: false,
            profile: ModelBankProfile::Optimized,
            min_confidence: DEFAULT_SUCCESS_BASELINE,
        }
    }
}

impl TrainingEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse from an arbitrary key lookup; missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let profile = match lookup("WF_PROFILE") {
            Some(s) => ModelBankProfile::from_str(&s)?,
            None => defaults.profile,
        };

        Ok(Self {
            n_splits: parse_or(&lookup, "WF_SPLITS", defaults.n_splits)?,
            max_features: parse_or(&lookup, "WF_MAX_FEATURES", defaults.max_features)?,
            min_rows: parse_or(&lookup, "WF_MIN_ROWS", defaults.min_rows)?,
            parallel_models: parse_or(&lookup, "WF_PARALLEL_MODELS", defaults.parallel_models)?,
            profile,
            min_confidence: parse_or(&lookup, "WF_MIN_CONFIDENCE", defaults.min_confidence)?,
        })
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig::for_profile(self.profile)
            .with_splits(self.n_splits)
            .with_max_features(self.max_features)
            .with_parallel_models(self.parallel_models)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .context(format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

#[derive(Debug, Deserialize)]
struct ModelBankFile {
    models: Vec<ModelSpec>,
}

/// Load a model bank override from TOML.
pub fn load_models_from_toml(path: &Path) -> Result<Vec<ModelSpec>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read model bank file: {}", path.display()))?;
    parse_models_toml(&content)
        .context(format!("Failed to parse model bank TOML: {}", path.display()))
}

pub fn parse_models_toml(content: &str) -> Result<Vec<ModelSpec>> {
    let file: ModelBankFile = toml::from_str(content)?;
    if file.models.is_empty() {
        anyhow::bail!("model bank file defines no models");
    }
    Ok(file.models)
}
