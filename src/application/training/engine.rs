use super::aggregator::{OutOfFold, aggregate};
use super::config::TrainingConfig;
use crate::application::ml::{Classifier, ModelBank};
use crate::application::preprocessing::{PreparedFold, prepare_fold};
use crate::application::selection::FeatureSelector;
use crate::domain::dataset::{FeatureMatrix, TargetVector, ensure_aligned, ensure_two_classes};
use crate::domain::errors::TrainingError;
use crate::domain::fold::{Fold, WalkForwardSplit};
use crate::domain::results::{FoldSummary, TrainingReport};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Walk-forward training with the model bank described by `config.models`.
pub fn train_walk_forward(
    features: &FeatureMatrix,
    target: &TargetVector,
    config: &TrainingConfig,
) -> Result<TrainingReport, TrainingError> {
    let bank = ModelBank::from_specs(&config.models)?;
    train_with_bank(features, target, config, &bank)
}

/// Walk-forward training with an explicit model bank (`config.models` is
/// ignored).
///
/// Fold construction and feature selection errors abort the call, as does a
/// target without both classes under any profile. A model that fails to fit
/// on any fold is dropped from the results and recorded in `failures`; the
/// remaining models keep training.
pub fn train_with_bank(
    features: &FeatureMatrix,
    target: &TargetVector,
    config: &TrainingConfig,
    bank: &ModelBank,
) -> Result<TrainingReport, TrainingError> {
    ensure_aligned(features, target)?;
    let splitter = WalkForwardSplit::new(config.n_splits)?;
    // Selection keeps every row, so folds can be laid out up front.
    let folds = splitter.split(features.n_rows())?;
    ensure_two_classes(target)?;

    info!(
        "Walk-forward training: {} rows, {} feature columns, {} splits, models {:?}",
        features.n_rows(),
        features.n_columns(),
        config.n_splits,
        bank.names()
    );

    let (matrix, feature_scores, dropped_constant) = if config.feature_selection {
        let selection = FeatureSelector::new(config.max_features)?.select(features, target)?;
        (selection.matrix, selection.scores, selection.dropped_constant)
    } else {
        (features.clone(), Vec::new(), Vec::new())
    };
    let selected_features = matrix.columns().to_vec();

    let mut buffers: BTreeMap<String, OutOfFold> = bank
        .names()
        .into_iter()
        .map(|name| (name, OutOfFold::default()))
        .collect();
    let mut failures: BTreeMap<String, TrainingError> = BTreeMap::new();
    let mut summaries = Vec::with_capacity(folds.len());

    for fold in &folds {
        let active: Vec<&dyn Classifier> = bank
            .models()
            .iter()
            .filter(|m| !failures.contains_key(m.name()))
            .map(|m| &**m)
            .collect();
        if active.is_empty() {
            break;
        }

        let prepared = prepare_fold(
            &matrix.take_rows(&fold.train_indices()),
            &matrix.take_rows(&fold.test_indices()),
        );
        let y_train = target.take(&fold.train_indices());
        let y_test = target.take(&fold.test_indices());

        debug!(
            "Fold {}: train rows {:?}, test rows {:?}",
            fold.index, fold.train, fold.test
        );
        summaries.push(FoldSummary {
            index: fold.index,
            train_rows: fold.train_len(),
            test_rows: fold.test_len(),
        });

        let outcomes: Vec<(String, Result<Vec<u8>, TrainingError>)> = if config.parallel_models {
            active
                .par_iter()
                .map(|model| run_unit(*model, fold, &prepared, &y_train))
                .collect()
        } else {
            active
                .iter()
                .map(|model| run_unit(*model, fold, &prepared, &y_train))
                .collect()
        };

        for (name, outcome) in outcomes {
            match outcome {
                Ok(predictions) => {
                    if let Some(buffer) = buffers.get_mut(&name) {
                        buffer.extend(&predictions, &y_test);
                    }
                }
                Err(error) if error.is_model_scoped() => {
                    warn!("{}", error);
                    buffers.remove(&name);
                    failures.insert(name, error);
                }
                Err(error) => return Err(error),
            }
        }
    }

    let results = aggregate(&buffers, &selected_features);

    for (name, result) in &results {
        info!(
            "{}: accuracy {:.3} over {} out-of-fold predictions",
            name, result.accuracy, result.sample_count
        );
    }
    if results.is_empty() {
        warn!("No model produced out-of-fold predictions");
    }

    Ok(TrainingReport {
        results,
        failures,
        selected_features,
        feature_scores,
        dropped_constant,
        folds: summaries,
    })
}

/// Fit one model on one fold and predict its test slice.
fn run_unit(
    model: &dyn Classifier,
    fold: &Fold,
    prepared: &PreparedFold,
    y_train: &[u8],
) -> (String, Result<Vec<u8>, TrainingError>) {
    let name = model.name().to_string();
    let fit_error = |reason: String| TrainingError::ModelFit {
        model: name.clone(),
        fold: fold.index,
        reason,
    };

    let outcome = model
        .fit_predict(&prepared.x_train, y_train, &prepared.x_test)
        .map_err(fit_error)
        .and_then(|predictions| {
            if predictions.len() == prepared.x_test.len() {
                Ok(predictions)
            } else {
                Err(fit_error(format!(
                    "returned {} predictions for {} test rows",
                    predictions.len(),
                    prepared.x_test.len()
                )))
            }
        });

    (name, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::{BaggingParams, BoostingParams, ModelSpec};
    use std::sync::Arc;

    /// Records the train slice sizes it sees and predicts class 1.
    struct RecordingClassifier {
        name: String,
        seen: std::sync::Mutex<Vec<(usize, usize)>>,
    }

    impl Classifier for RecordingClassifier {
        fn name(&self) -> &str {
            &self.name
        }

        fn fit_predict(
            &self,
            x_train: &[Vec<f64>],
            _y_train: &[u8],
            x_test: &[Vec<f64>],
        ) -> Result<Vec<u8>, String> {
            self.seen
                .lock()
                .map_err(|e| e.to_string())?
                .push((x_train.len(), x_test.len()));
            Ok(vec![1; x_test.len()])
        }
    }

    fn dataset(n: usize) -> (FeatureMatrix, TargetVector) {
        let rows = (0..n)
            .map(|i| vec![(i % 2) as f64 + (i % 7) as f64 * 0.1, (i % 5) as f64])
            .collect();
        let features =
            FeatureMatrix::from_rows(vec!["a".to_string(), "b".to_string()], rows).unwrap();
        let target = TargetVector::new((0..n).map(|i| (i % 2) as u8).collect()).unwrap();
        (features, target)
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig::default().with_models(vec![
            ModelSpec::Bagging(BaggingParams {
                n_trees: 10,
                ..Default::default()
            }),
            ModelSpec::Boosting(BoostingParams {
                n_estimators: 20,
                max_depth: 3,
                ..Default::default()
            }),
        ])
    }

    #[test]
    fn test_each_fold_sees_expanding_train_slice() {
        let (features, target) = dataset(40);
        let recorder = Arc::new(RecordingClassifier {
            name: "recorder".to_string(),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let bank = ModelBank::new(vec![recorder.clone() as Arc<dyn Classifier>]).unwrap();

        let report = train_with_bank(&features, &target, &TrainingConfig::default(), &bank).unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(10, 10), (20, 10), (30, 10)]);
        // Always predicting 1 on an alternating target is right half the time.
        assert_eq!(report.results["recorder"].accuracy, 0.5);
        assert_eq!(report.results["recorder"].sample_count, 30);
    }

    #[test]
    fn test_trains_both_ensembles() {
        let (features, target) = dataset(60);
        let report = train_walk_forward(&features, &target, &small_config()).unwrap();

        assert_eq!(report.results.len(), 2);
        assert!(report.failures.is_empty());
        for result in report.results.values() {
            assert_eq!(result.sample_count, 45);
            assert!((0.0..=1.0).contains(&result.accuracy));
        }
        assert_eq!(report.folds.len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (features, target) = dataset(60);
        let sequential = train_walk_forward(&features, &target, &small_config()).unwrap();
        let parallel = train_walk_forward(
            &features,
            &target,
            &small_config().with_parallel_models(true),
        )
        .unwrap();

        assert_eq!(sequential.results, parallel.results);
    }

    #[test]
    fn test_misaligned_target_rejected() {
        let (features, _) = dataset(20);
        let target = TargetVector::new(vec![0, 1]).unwrap();
        assert!(matches!(
            train_walk_forward(&features, &target, &small_config()),
            Err(TrainingError::InvalidInput { .. })
        ));
    }
}
