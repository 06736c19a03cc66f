// Classifiers and the model bank
pub mod ml;

// Per-fold missing-value handling and scaling
pub mod preprocessing;

// Constant-column filtering and univariate ranking
pub mod selection;

// Walk-forward orchestration
pub mod training;
