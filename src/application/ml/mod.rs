pub mod bagging;
pub mod boosting;
pub mod classifier;
pub mod model_bank;
mod regression_tree;

pub use bagging::{BaggingClassifier, BaggingParams};
pub use boosting::{BoostingClassifier, BoostingParams};
pub use classifier::Classifier;
pub use model_bank::{ModelBank, ModelBankProfile, ModelSpec};
