mod feature_selector;

pub use crate::domain::results::FeatureScore;
pub use feature_selector::{DEFAULT_MAX_FEATURES, FeatureSelection, FeatureSelector};
