// Feature matrix and target contract
pub mod dataset;

// Domain-specific error types
pub mod errors;

// Walk-forward fold splitting
pub mod fold;

// Cross-instrument summaries
pub mod performance;

// Per-model training results
pub mod results;

// Univariate statistics
pub mod stats;
