use crate::domain::errors::TrainingError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Time-ordered table of named numeric feature columns.
///
/// Row `i` precedes row `i + 1` chronologically. Missing values are stored as
/// `f64::NAN`. The engine never mutates a caller's matrix; every selection or
/// slice produces a new copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build from column names and row-major values (`NaN` = missing).
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, TrainingError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TrainingError::invalid_input(format!(
                    "duplicate feature column '{}'",
                    name
                )));
            }
        }

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(TrainingError::invalid_input(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Build from named columns with explicit optional values.
    pub fn from_columns(columns: Vec<(String, Vec<Option<f64>>)>) -> Result<Self, TrainingError> {
        let n_rows = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != n_rows) {
            return Err(TrainingError::invalid_input(format!(
                "column '{}' has {} values, expected {}",
                name,
                values.len(),
                n_rows
            )));
        }

        let rows = (0..n_rows)
            .map(|r| {
                columns
                    .iter()
                    .map(|(_, values)| values[r].unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        let names = columns.into_iter().map(|(name, _)| name).collect();

        Self::from_rows(names, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (row, column); `None` when missing.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .filter(|v| !v.is_nan())
    }

    /// Iterate one column top to bottom (missing values as `NaN`).
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[column])
    }

    /// Copy keeping only the given column positions, in the given order.
    pub fn select_columns(&self, positions: &[usize]) -> Self {
        Self {
            columns: positions.iter().map(|&c| self.columns[c].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| positions.iter().map(|&c| row[c]).collect())
                .collect(),
        }
    }

    /// Copy of the raw rows at the given indices.
    pub fn take_rows(&self, indices: &[usize]) -> Vec<Vec<f64>> {
        indices.iter().map(|&i| self.rows[i].clone()).collect()
    }
}

/// Binary labels index-aligned with a [`FeatureMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetVector {
    labels: Vec<u8>,
}

impl TargetVector {
    pub fn new(labels: Vec<u8>) -> Result<Self, TrainingError> {
        if let Some((i, label)) = labels.iter().enumerate().find(|(_, l)| **l > 1) {
            return Err(TrainingError::invalid_input(format!(
                "target label {} at row {} is not 0/1",
                label, i
            )));
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct classes present.
    pub fn class_count(&self) -> usize {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        usize::from(positives > 0) + usize::from(positives < self.labels.len())
    }

    pub fn take(&self, indices: &[usize]) -> Vec<u8> {
        indices.iter().map(|&i| self.labels[i]).collect()
    }
}

/// Reject a matrix/target pair whose rows are not index-aligned.
pub fn ensure_aligned(features: &FeatureMatrix, target: &TargetVector) -> Result<(), TrainingError> {
    if features.n_rows() != target.len() {
        return Err(TrainingError::invalid_input(format!(
            "feature matrix has {} rows but target has {} labels",
            features.n_rows(),
            target.len()
        )));
    }
    Ok(())
}

/// Reject a target that does not contain both 0 and 1.
pub fn ensure_two_classes(target: &TargetVector) -> Result<(), TrainingError> {
    let classes = target.class_count();
    if classes < 2 {
        return Err(TrainingError::data_insufficient(format!(
            "target has {} distinct class(es); training needs both 0 and 1",
            classes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = FeatureMatrix::from_rows(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(TrainingError::InvalidInput { .. })));
    }

    #[test]
    fn test_from_rows_rejects_duplicate_columns() {
        let result = FeatureMatrix::from_rows(names(&["a", "a"]), vec![vec![1.0, 2.0]]);
        assert!(matches!(result, Err(TrainingError::InvalidInput { .. })));
    }

    #[test]
    fn test_from_columns_maps_missing_to_nan() {
        let matrix = FeatureMatrix::from_columns(vec![
            ("rsi_14".to_string(), vec![Some(40.0), None, Some(60.0)]),
            ("momentum_5".to_string(), vec![Some(0.1), Some(0.2), Some(0.3)]),
        ])
        .unwrap();

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_columns(), 2);
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(1, 1), Some(0.2));
        assert!(matrix.rows()[1][0].is_nan());
    }

    #[test]
    fn test_select_columns_is_a_copy() {
        let matrix = FeatureMatrix::from_rows(
            names(&["a", "b", "c"]),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();

        let selected = matrix.select_columns(&[0, 2]);
        assert_eq!(selected.columns(), &["a".to_string(), "c".to_string()]);
        assert_eq!(selected.rows()[1], vec![4.0, 6.0]);
        assert_eq!(matrix.n_columns(), 3);
    }

    #[test]
    fn test_target_rejects_non_binary_labels() {
        assert!(TargetVector::new(vec![0, 1, 2]).is_err());
    }

    #[test]
    fn test_target_class_count() {
        assert_eq!(TargetVector::new(vec![]).unwrap().class_count(), 0);
        assert_eq!(TargetVector::new(vec![0, 0, 0]).unwrap().class_count(), 1);
        assert_eq!(TargetVector::new(vec![1, 1]).unwrap().class_count(), 1);
        assert_eq!(TargetVector::new(vec![0, 1, 0]).unwrap().class_count(), 2);
    }

    #[test]
    fn test_alignment_check() {
        let matrix = FeatureMatrix::from_rows(names(&["a"]), vec![vec![1.0], vec![2.0]]).unwrap();
        let target = TargetVector::new(vec![0, 1, 1]).unwrap();
        assert!(ensure_aligned(&matrix, &target).is_err());
    }

    #[test]
    fn test_two_class_check() {
        let single = TargetVector::new(vec![1, 1, 1]).unwrap();
        assert!(matches!(
            ensure_two_classes(&single),
            Err(TrainingError::DataInsufficient { .. })
        ));
        assert!(ensure_two_classes(&TargetVector::new(vec![1, 0]).unwrap()).is_ok());
    }
}
