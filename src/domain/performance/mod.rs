// Cross-instrument training summaries
pub mod summary;

pub use summary::{DEFAULT_SUCCESS_BASELINE, PerformanceSummary};
