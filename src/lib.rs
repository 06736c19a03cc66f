pub mod application;
pub mod config;
pub mod domain;

pub use application::training::{TrainingConfig, train_walk_forward, train_with_bank};
pub use domain::dataset::{FeatureMatrix, TargetVector};
pub use domain::errors::TrainingError;
pub use domain::results::{ModelResult, TrainingReport};
