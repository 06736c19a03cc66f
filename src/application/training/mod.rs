//! Walk-forward training: selection, folding, per-fold scaling, model bank
//! fitting and out-of-fold aggregation.

pub mod aggregator;
pub mod config;
pub mod engine;

pub use config::{DEFAULT_SPLITS, TrainingConfig};
pub use engine::{train_walk_forward, train_with_bank};
