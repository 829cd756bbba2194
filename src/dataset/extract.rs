//! Column extraction: aligned (x, y) samples and tree feature matrices

use super::record::Dataset;
use super::schema::ColumnKind;
use crate::error::{InsightError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Aligned numeric samples for one (x, y) column pair.
///
/// `x` and `y` always have the same length and hold only finite values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSamples")]
pub struct Samples {
    x: Vec<f64>,
    y: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSamples {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TryFrom<RawSamples> for Samples {
    type Error = InsightError;

    fn try_from(raw: RawSamples) -> Result<Self> {
        Samples::from_pairs(&raw.x, &raw.y)
    }
}

impl Samples {
    /// Build samples from two sequences, keeping only pairs where both values are finite
    pub fn from_pairs(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(InsightError::DimensionMismatch {
                features: x.len(),
                targets: y.len(),
            });
        }
        Ok(x.iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
            .collect())
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Smallest and largest x, if any
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut it = self.x.iter().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl FromIterator<(f64, f64)> for Samples {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let (x, y) = iter.into_iter().unzip();
        Self { x, y }
    }
}

fn require_column(dataset: &Dataset, column: &str) -> Result<()> {
    if dataset.schema().contains(column) {
        Ok(())
    } else {
        Err(InsightError::InvalidColumn(column.to_string()))
    }
}

/// Extract aligned samples for `x_col` and `y_col`.
///
/// Rows where either value is missing or not a finite number are skipped.
pub fn extract_samples(dataset: &Dataset, x_col: &str, y_col: &str) -> Result<Samples> {
    require_column(dataset, x_col)?;
    require_column(dataset, y_col)?;

    Ok(dataset
        .records()
        .iter()
        .filter_map(|r| Some((r.numeric(x_col)?, r.numeric(y_col)?)))
        .collect())
}

/// Build the tree feature matrix and binary target.
///
/// One row per record, features in `feature_columns` order. The target is `1`
/// when the record's target value is exactly 1, otherwise `0`.
pub fn feature_matrix<S: AsRef<str>>(
    dataset: &Dataset,
    feature_columns: &[S],
    target_column: &str,
) -> Result<(Array2<f64>, Vec<u8>)> {
    for col in feature_columns {
        let col = col.as_ref();
        require_column(dataset, col)?;
        if dataset.schema().kind_of(col) == Some(ColumnKind::Categorical) {
            return Err(InsightError::InvalidInput(format!(
                "feature column '{}' is categorical",
                col
            )));
        }
    }
    require_column(dataset, target_column)?;

    let n_rows = dataset.len();
    let n_features = feature_columns.len();
    let mut values = Vec::with_capacity(n_rows * n_features);
    let mut target = Vec::with_capacity(n_rows);

    for (row, record) in dataset.records().iter().enumerate() {
        for col in feature_columns {
            let col = col.as_ref();
            let v = record.numeric(col).ok_or_else(|| {
                InsightError::InvalidInput(format!("row {} has no numeric value for '{}'", row, col))
            })?;
            values.push(v);
        }
        target.push(u8::from(record.numeric(target_column) == Some(1.0)));
    }

    let features = Array2::from_shape_vec((n_rows, n_features), values)?;
    Ok((features, target))
}
