//! R² correlation matrix over every ordered pair of columns

use super::linear_regression::fit;
use crate::dataset::{extract_samples, Dataset};
use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Why a cell has no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unavailable {
    InsufficientData,
    DegenerateFit,
}

/// One matrix cell: R² of the column pair, or N/A
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatrixCell {
    Value { r_squared: f64 },
    NotAvailable { reason: Unavailable },
}

/// Colour band used when presenting a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationBand {
    Strong,
    Moderate,
    Weak,
}

impl MatrixCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            MatrixCell::Value { r_squared } => Some(*r_squared),
            MatrixCell::NotAvailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.value().is_some()
    }

    pub fn band(&self) -> Option<CorrelationBand> {
        self.value().map(|r2| {
            if r2 >= 0.3 {
                CorrelationBand::Strong
            } else if r2 >= 0.1 {
                CorrelationBand::Moderate
            } else {
                CorrelationBand::Weak
            }
        })
    }
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixCell::Value { r_squared } => write!(f, "{:.4}", r_squared),
            MatrixCell::NotAvailable { .. } => write!(f, "N/A"),
        }
    }
}

/// Square R² grid; cell `(a, b)` regresses column `b` on column `a`.
///
/// Not symmetric in general.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    /// Row-major, `columns.len()` squared
    cells: Vec<MatrixCell>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell for `(x_col, y_col)`
    pub fn get(&self, x_col: &str, y_col: &str) -> Option<&MatrixCell> {
        let i = self.index_of(x_col)?;
        let j = self.index_of(y_col)?;
        self.cells.get(i * self.columns.len() + j)
    }

    /// Iterate `(x_col, y_col, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &MatrixCell)> + '_ {
        let n = self.columns.len();
        self.cells.iter().enumerate().map(move |(k, cell)| {
            (self.columns[k / n].as_str(), self.columns[k % n].as_str(), cell)
        })
    }

    /// Display rows: one `Vec` of formatted cells per x column
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(self.columns.len().max(1))
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    /// Number of N/A cells
    pub fn unavailable_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_available()).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Fit every ordered pair of `columns`.
///
/// Diagonal cells are 1.0 by convention. A pair that cannot be fitted becomes
/// N/A and the sweep carries on. Unknown column names fail before any fitting.
/// Repeated names are collapsed to their first occurrence.
pub fn build_matrix<S: AsRef<str>>(dataset: &Dataset, columns: &[S]) -> Result<CorrelationMatrix> {
    let mut names: Vec<String> = Vec::with_capacity(columns.len());
    for col in columns {
        let col = col.as_ref();
        if !dataset.schema().contains(col) {
            return Err(InsightError::InvalidColumn(col.to_string()));
        }
        if !names.iter().any(|n| n == col) {
            names.push(col.to_string());
        }
    }

    let mut cells = Vec::with_capacity(names.len() * names.len());
    for x_col in &names {
        for y_col in &names {
            cells.push(compute_cell(dataset, x_col, y_col)?);
        }
    }

    let matrix = CorrelationMatrix {
        columns: names,
        cells,
    };
    info!(
        columns = matrix.columns.len(),
        unavailable = matrix.unavailable_count(),
        "Correlation matrix built"
    );
    Ok(matrix)
}

fn compute_cell(dataset: &Dataset, x_col: &str, y_col: &str) -> Result<MatrixCell> {
    if x_col == y_col {
        return Ok(MatrixCell::Value { r_squared: 1.0 });
    }

    let samples = extract_samples(dataset, x_col, y_col)?;
    match fit(&samples) {
        Ok(result) => {
            debug!(x = x_col, y = y_col, r_squared = result.r_squared, "Matrix cell");
            Ok(MatrixCell::Value {
                r_squared: result.r_squared,
            })
        }
        Err(e) if e.is_pair_recoverable() => {
            warn!(x = x_col, y = y_col, error = %e, "Matrix cell unavailable");
            let reason = match e {
                InsightError::DegenerateFit { .. } => Unavailable::DegenerateFit,
                _ => Unavailable::InsufficientData,
            };
            Ok(MatrixCell::NotAvailable { reason })
        }
        Err(e) => Err(e),
    }
}
