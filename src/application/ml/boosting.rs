use super::classifier::{Classifier, validate_training_inputs};
use super::regression_tree::{RegressionTree, TreeParams};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Hyperparameters of the boosting ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    pub name: String,
    pub n_estimators: usize,
    pub max_depth: u16,
    pub learning_rate: f64,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of train rows drawn (without replacement) for each stage.
    pub subsample: f64,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            name: "gradient_boost".to_string(),
            n_estimators: 200,
            max_depth: 6,
            learning_rate: 0.1,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl BoostingParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_estimators == 0 {
            return Err(format!(
                "model '{}': n_estimators must be at least 1",
                self.name
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(format!(
                "model '{}': learning_rate {} outside (0, 1]",
                self.name, self.learning_rate
            ));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(format!(
                "model '{}': subsample {} outside (0, 1]",
                self.name, self.subsample
            ));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Binary log-loss gradient boosting over regression trees.
#[derive(Debug, Clone)]
pub struct BoostingClassifier {
    params: BoostingParams,
}

/// Fitted additive model: `init + learning_rate * sum(tree(x))` in log-odds.
struct BoostedTrees {
    init: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl BoostedTrees {
    fn raw_score(&self, row: &[f64]) -> f64 {
        self.init + self.learning_rate * self.trees.iter().map(|t| t.predict(row)).sum::<f64>()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl BoostingClassifier {
    pub fn new(params: BoostingParams) -> Self {
        Self { params }
    }

    fn fit(&self, x_train: &[Vec<f64>], y_train: &[u8]) -> Result<BoostedTrees, String> {
        validate_training_inputs(x_train, y_train)?;

        let n = y_train.len();
        let positives = y_train.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == n {
            return Err(format!(
                "boosting needs both classes in the train slice, found only class {}",
                u8::from(positives == n)
            ));
        }

        let prior = positives as f64 / n as f64;
        let init = (prior / (1.0 - prior)).ln();
        let targets: Vec<f64> = y_train.iter().map(|&l| f64::from(l)).collect();
        let mut raw = vec![init; n];

        let sample_size = ((n as f64 * self.params.subsample).round() as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut order: Vec<usize> = (0..n).collect();

        let mut trees = Vec::with_capacity(self.params.n_estimators);
        for _ in 0..self.params.n_estimators {
            let probs: Vec<f64> = raw.iter().map(|&r| sigmoid(r)).collect();
            let gradients: Vec<f64> = targets.iter().zip(&probs).map(|(y, p)| y - p).collect();
            let hessians: Vec<f64> = probs.iter().map(|p| p * (1.0 - p)).collect();

            let sample: Vec<usize> = if sample_size < n {
                order.shuffle(&mut rng);
                let mut drawn = order[..sample_size].to_vec();
                drawn.sort_unstable();
                drawn
            } else {
                (0..n).collect()
            };

            let tree = RegressionTree::fit(
                x_train,
                &gradients,
                &hessians,
                &sample,
                self.params.tree_params(),
            );
            for (score, row) in raw.iter_mut().zip(x_train) {
                *score += self.params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Ok(BoostedTrees {
            init,
            learning_rate: self.params.learning_rate,
            trees,
        })
    }
}

impl Classifier for BoostingClassifier {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[u8],
        x_test: &[Vec<f64>],
    ) -> Result<Vec<u8>, String> {
        let model = self.fit(x_train, y_train)?;
        Ok(x_test
            .iter()
            .map(|row| u8::from(model.raw_score(row) > 0.0))
            .collect())
    }
}
