//! Per-fold preprocessing.
//!
//! Missing or non-finite values become 0 in each slice independently, then a
//! [`StandardScaler`] is fitted on the train slice alone and applied to both
//! slices. The test slice never contributes to the fitted parameters.

mod scaler;

pub use scaler::StandardScaler;

/// Scaled train/test slices of one fold plus the scaler that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFold {
    pub x_train: Vec<Vec<f64>>,
    pub x_test: Vec<Vec<f64>>,
    pub scaler: StandardScaler,
}

/// Replace `NaN` and infinities with 0.
pub fn fill_non_finite(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v.is_finite() { v } else { 0.0 })
                .collect()
        })
        .collect()
}

pub fn prepare_fold(x_train: &[Vec<f64>], x_test: &[Vec<f64>]) -> PreparedFold {
    let train = fill_non_finite(x_train);
    let test = fill_non_finite(x_test);

    let scaler = StandardScaler::fit(&train);

    PreparedFold {
        x_train: scaler.transform(&train),
        x_test: scaler.transform(&test),
        scaler,
    }
}
