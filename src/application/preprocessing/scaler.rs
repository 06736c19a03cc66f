use crate::domain::stats::Stats;
use serde::{Deserialize, Serialize};

/// Per-column standardization fitted on a training slice.
///
/// Zero-variance columns keep a scale of 1 so they map to 0 instead of
/// dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and population standard deviations on `rows` only.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_columns = rows.first().map(Vec::len).unwrap_or(0);
        let (means, scales) = (0..n_columns)
            .map(|c| {
                let column: Vec<f64> = rows.iter().map(|row| row[c]).collect();
                let (mean, std) = Stats::mean_and_std(&column);
                let scale = if std > 0.0 && std.is_finite() { std } else { 1.0 };
                (mean, scale)
            })
            .unzip();

        Self { means, scales }
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (mean, scale))| (v - mean) / scale)
                    .collect()
            })
            .collect()
    }
}
