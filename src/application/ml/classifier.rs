/// Interface for the binary classifiers trained inside the walk-forward loop.
///
/// Implementations are stateless: every call fits a fresh model on the train
/// slice and predicts the test slice, so nothing carries over between folds
/// or training calls.
pub trait Classifier: Send + Sync {
    /// Name the model is reported under.
    fn name(&self) -> &str;

    /// Fit on `(x_train, y_train)` and return one 0/1 label per `x_test` row.
    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[u8],
        x_test: &[Vec<f64>],
    ) -> Result<Vec<u8>, String>;
}

/// Shape checks shared by every classifier.
pub fn validate_training_inputs(x_train: &[Vec<f64>], y_train: &[u8]) -> Result<(), String> {
    if x_train.is_empty() {
        return Err("train slice has no rows".to_string());
    }
    if x_train.len() != y_train.len() {
        return Err(format!(
            "train slice has {} rows but {} labels",
            x_train.len(),
            y_train.len()
        ));
    }
    if x_train[0].is_empty() {
        return Err("train slice has no feature columns".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_featureless_slices() {
        assert!(validate_training_inputs(&[], &[]).is_err());
        assert!(validate_training_inputs(&[vec![], vec![]], &[0, 1]).is_err());
        assert!(validate_training_inputs(&[vec![1.0]], &[0, 1]).is_err());
        assert!(validate_training_inputs(&[vec![1.0], vec![2.0]], &[0, 1]).is_ok());
    }
}
