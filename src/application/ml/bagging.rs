use super::classifier::{Classifier, validate_training_inputs};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

/// Hyperparameters of the bagging ensemble (random forest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaggingParams {
    pub name: String,
    pub n_trees: u16,
    /// `None` grows trees until leaves are pure.
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for BaggingParams {
    fn default() -> Self {
        Self {
            name: "random_forest".to_string(),
            n_trees: 200,
            max_depth: Some(10),
            min_samples_split: 10,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

impl BaggingParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_trees == 0 {
            return Err(format!("model '{}': n_trees must be at least 1", self.name));
        }
        if self.min_samples_split < 2 {
            return Err(format!(
                "model '{}': min_samples_split must be at least 2",
                self.name
            ));
        }
        Ok(())
    }
}

/// Random forest classifier backed by smartcore.
#[derive(Debug, Clone)]
pub struct BaggingClassifier {
    params: BaggingParams,
}

impl BaggingClassifier {
    pub fn new(params: BaggingParams) -> Self {
        Self { params }
    }

    fn parameters(&self) -> RandomForestClassifierParameters {
        let params = RandomForestClassifierParameters::default()
            .with_n_trees(self.params.n_trees)
            .with_min_samples_split(self.params.min_samples_split)
            .with_min_samples_leaf(self.params.min_samples_leaf)
            .with_seed(self.params.seed);
        match self.params.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

impl Classifier for BaggingClassifier {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[u8],
        x_test: &[Vec<f64>],
    ) -> Result<Vec<u8>, String> {
        validate_training_inputs(x_train, y_train)?;
        if x_test.is_empty() {
            return Ok(Vec::new());
        }

        let x = DenseMatrix::from_2d_vec(&x_train.to_vec())
            .map_err(|e| format!("Matrix creation failed: {}", e))?;
        let y: Vec<i32> = y_train.iter().map(|&l| i32::from(l)).collect();

        let model: RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>> =
            RandomForestClassifier::fit(&x, &y, self.parameters())
                .map_err(|e| format!("Training error: {}", e))?;

        let x_test_m = DenseMatrix::from_2d_vec(&x_test.to_vec())
            .map_err(|e| format!("Matrix creation failed: {}", e))?;
        let predictions = model
            .predict(&x_test_m)
            .map_err(|e| format!("Predict error: {}", e))?;

        Ok(predictions.into_iter().map(|p| u8::from(p > 0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable(n: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
        let x = (0..n)
            .map(|i| {
                let y = (i % 2) as f64;
                vec![y * 2.0 - 1.0 + (i % 5) as f64 * 0.05, (i % 3) as f64]
            })
            .collect();
        let y = (0..n).map(|i| (i % 2) as u8).collect();
        (x, y)
    }

    #[test]
    fn test_learns_separable_data() {
        let (x, y) = separable(60);
        let classifier = BaggingClassifier::new(BaggingParams {
            n_trees: 20,
            ..Default::default()
        });

        let predictions = classifier.fit_predict(&x[..40], &y[..40], &x[40..]).unwrap();
        assert_eq!(predictions.len(), 20);
        assert_eq!(predictions, y[40..].to_vec());
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let (x, y) = separable(60);
        let classifier = BaggingClassifier::new(BaggingParams {
            n_trees: 15,
            ..Default::default()
        });

        let first = classifier.fit_predict(&x[..40], &y[..40], &x[40..]).unwrap();
        let second = classifier.fit_predict(&x[..40], &y[..40], &x[40..]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_featureless_slice_fails() {
        let classifier = BaggingClassifier::new(BaggingParams::default());
        let result = classifier.fit_predict(&[vec![], vec![]], &[0, 1], &[vec![]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_params() {
        let params = BaggingParams {
            n_trees: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(BaggingParams::default().validate().is_ok());
    }
}
