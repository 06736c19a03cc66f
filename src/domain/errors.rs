use thiserror::Error;

/// Errors raised by the walk-forward training engine.
///
/// Selection, splitting, input and configuration errors abort a training call.
/// `ModelFit` is scoped to one (model, fold) unit and only removes that model
/// from the report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("Insufficient data: {reason}")]
    DataInsufficient { reason: String },

    #[error("Insufficient rows: {rows} rows cannot produce {splits} walk-forward folds")]
    InsufficientRows { rows: usize, splits: usize },

    #[error("Model '{model}' failed to fit on fold {fold}: {reason}")]
    ModelFit {
        model: String,
        fold: usize,
        reason: String,
    },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl TrainingError {
    pub fn data_insufficient(reason: impl Into<String>) -> Self {
        Self::DataInsufficient {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// True for failures scoped to a single model.
    pub fn is_model_scoped(&self) -> bool {
        matches!(self, Self::ModelFit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_fit_formatting() {
        let error = TrainingError::ModelFit {
            model: "gradient_boost".to_string(),
            fold: 3,
            reason: "train slice has a single class".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("gradient_boost"));
        assert!(msg.contains("fold 3"));
        assert!(msg.contains("single class"));
        assert!(error.is_model_scoped());
    }

    #[test]
    fn test_insufficient_rows_formatting() {
        let error = TrainingError::InsufficientRows { rows: 3, splits: 3 };

        let msg = error.to_string();
        assert!(msg.contains("3 rows"));
        assert!(msg.contains("3 walk-forward folds"));
        assert!(!error.is_model_scoped());
    }
}
