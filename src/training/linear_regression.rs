//! Simple (one-predictor) ordinary least squares regression

use crate::dataset::{display_name, extract_samples, Dataset, Samples};
use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Predict y for a single x
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predict y for each x
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Display form, four decimals
    pub fn equation(&self) -> String {
        format!("y = {:.4}x + {:.4}", self.slope, self.intercept)
    }
}

/// How much of the target's variance a fit explains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStrength {
    Strong,
    Moderate,
    Weak,
    VeryLittle,
}

impl FitStrength {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > 0.7 {
            FitStrength::Strong
        } else if r_squared > 0.5 {
            FitStrength::Moderate
        } else if r_squared > 0.3 {
            FitStrength::Weak
        } else {
            FitStrength::VeryLittle
        }
    }
}

/// Result of fitting a [`LinearModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: LinearModel,
    pub r_squared: f64,
    pub equation: String,
    pub n_samples: usize,
}

impl FitResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.model.predict(x)
    }

    pub fn strength(&self) -> FitStrength {
        FitStrength::from_r_squared(self.r_squared)
    }

    /// R² as a percentage
    pub fn explained_variance_pct(&self) -> f64 {
        self.r_squared * 100.0
    }

    /// The fitted line evaluated at the smallest and largest sample x
    pub fn line_endpoints(&self, samples: &Samples) -> Option<[(f64, f64); 2]> {
        let (lo, hi) = samples.x_range()?;
        Some([(lo, self.predict(lo)), (hi, self.predict(hi))])
    }

    /// One-sentence interpretation of the fit between two named columns
    pub fn describe(&self, x_col: &str, y_col: &str) -> String {
        let x = display_name(x_col);
        let y = display_name(y_col);
        let pct = self.explained_variance_pct();
        match self.strength() {
            FitStrength::Strong => format!(
                "This is a strong correlation, indicating that {x} is a good predictor of {y}. \
                 About {pct:.1}% of the variation in {y} can be explained by {x}."
            ),
            FitStrength::Moderate => format!(
                "This is a moderate correlation between {x} and {y}. \
                 About {pct:.1}% of the variation in {y} can be explained by {x}."
            ),
            FitStrength::Weak => format!(
                "This is a weak correlation between {x} and {y}. \
                 Only about {pct:.1}% of the variation in {y} can be explained by {x}."
            ),
            FitStrength::VeryLittle => format!(
                "There is very little correlation between {x} and {y}. \
                 Only about {pct:.1}% of the variation can be explained by this model."
            ),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fit `y = slope * x + intercept` by ordinary least squares.
///
/// Requires at least two samples and non-zero variance in x. When every y is
/// identical R² is undefined and [`InsightError::DegenerateFit`] is returned.
pub fn fit(samples: &Samples) -> Result<FitResult> {
    let n = samples.len();
    if n < 2 {
        return Err(InsightError::InsufficientData {
            n_samples: n,
            reason: "need at least 2 samples".to_string(),
        });
    }

    let x_mean = mean(samples.x());
    let y_mean = mean(samples.y());

    let (mut sxx, mut sxy, mut ss_tot) = (0.0, 0.0, 0.0);
    for (x, y) in samples.iter() {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        ss_tot += dy * dy;
    }

    if sxx == 0.0 {
        return Err(InsightError::InsufficientData {
            n_samples: n,
            reason: "x has zero variance".to_string(),
        });
    }
    if ss_tot == 0.0 {
        return Err(InsightError::DegenerateFit { n_samples: n });
    }

    let slope = sxy / sxx;
    let model = LinearModel {
        slope,
        intercept: y_mean - slope * x_mean,
    };

    let ss_res: f64 = samples
        .iter()
        .map(|(x, y)| (y - model.predict(x)).powi(2))
        .sum();
    let r_squared = 1.0 - ss_res / ss_tot;

    debug!(n_samples = n, slope, intercept = model.intercept, r_squared, "Linear fit");

    Ok(FitResult {
        equation: model.equation(),
        model,
        r_squared,
        n_samples: n,
    })
}

/// Extract `x_col`/`y_col` from the dataset and fit y on x
pub fn fit_columns(dataset: &Dataset, x_col: &str, y_col: &str) -> Result<FitResult> {
    let samples = extract_samples(dataset, x_col, y_col)?;
    fit(&samples)
}
