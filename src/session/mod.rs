//! Analysis session: one loaded dataset and the latest trained results
//!
//! Every operation takes its inputs explicitly; the session only remembers the
//! newest regression and tree so that `predict` has a model to use.

mod slot;

pub use slot::{ResultSlot, Ticket};

use crate::dataset::{extract_samples, feature_matrix, Dataset, Samples};
use crate::error::{InsightError, Result};
use crate::training::{
    build_matrix, fit, train_and_evaluate, AnalysisConfig, CorrelationMatrix, FitResult,
    TreeRenderer, TreeReport,
};
use crate::utils::DataLoader;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// A regression fitted between two named columns
#[derive(Debug, Clone, Serialize)]
pub struct RegressionOutcome {
    pub x_column: String,
    pub y_column: String,
    pub fit: FitResult,
    pub samples: Samples,
}

impl RegressionOutcome {
    /// Interpretation sentence for the fit
    pub fn describe(&self) -> String {
        self.fit.describe(&self.x_column, &self.y_column)
    }
}

/// A trained tree, its evaluation, and its text rendering
#[derive(Debug, Clone, Serialize)]
pub struct TreeOutcome {
    pub report: TreeReport,
    pub rendered: String,
}

/// Owns a dataset and the newest result of each training action
pub struct AnalysisSession {
    dataset: Arc<Dataset>,
    config: AnalysisConfig,
    regression: ResultSlot<RegressionOutcome>,
    tree: ResultSlot<TreeOutcome>,
}

impl AnalysisSession {
    pub fn new(dataset: Dataset, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(InsightError::EmptyDataset(
                "no complete rows in dataset".to_string(),
            ));
        }
        info!(rows = dataset.len(), columns = dataset.schema().len(), "Session ready");
        Ok(Self {
            dataset: Arc::new(dataset),
            config,
            regression: ResultSlot::new(),
            tree: ResultSlot::new(),
        })
    }

    /// Load a CSV file and open a session over it
    pub fn from_csv(path: impl AsRef<Path>, config: AnalysisConfig) -> Result<Self> {
        let dataset = DataLoader::new().load_csv(path)?;
        Self::new(dataset, config)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Fit `y_col` on `x_col` and make it the current regression
    pub fn train_regression(&self, x_col: &str, y_col: &str) -> Result<Arc<RegressionOutcome>> {
        if x_col == y_col {
            return Err(InsightError::InvalidInput(format!(
                "x and y must be different columns, both are '{}'",
                x_col
            )));
        }

        let ticket = self.regression.begin();
        let samples = extract_samples(&self.dataset, x_col, y_col)?;
        let fit = fit(&samples)?;

        let outcome = Arc::new(RegressionOutcome {
            x_column: x_col.to_string(),
            y_column: y_col.to_string(),
            fit,
            samples,
        });
        if !self.regression.complete(ticket, Arc::clone(&outcome)) {
            warn!(generation = ticket.generation(), "Regression result superseded");
        }
        Ok(outcome)
    }

    /// Predict y for `x` with the current regression
    pub fn predict(&self, x: f64) -> Result<f64> {
        if !x.is_finite() {
            return Err(InsightError::InvalidInput(format!("x = {} is not finite", x)));
        }
        let current = self.regression.latest().ok_or(InsightError::ModelNotFitted)?;
        Ok(current.fit.predict(x))
    }

    /// Train and evaluate the tree; `max_depth` overrides the configured depth
    pub fn train_tree(&self, max_depth: Option<usize>) -> Result<Arc<TreeOutcome>> {
        let ticket = self.tree.begin();

        let mut tree_config = self.config.tree.clone();
        if let Some(depth) = max_depth {
            tree_config.max_depth = depth;
        }

        let (features, target) = feature_matrix(
            &self.dataset,
            &self.config.feature_columns,
            &self.config.target_column,
        )?;
        let report = train_and_evaluate(&features, &target, &tree_config)?;
        let rendered = TreeRenderer::new(&self.config.feature_labels).render(&report.tree);

        let outcome = Arc::new(TreeOutcome { report, rendered });
        if !self.tree.complete(ticket, Arc::clone(&outcome)) {
            warn!(generation = ticket.generation(), "Tree result superseded");
        }
        Ok(outcome)
    }

    /// R² sweep over the configured correlation columns
    pub fn correlation_matrix(&self) -> Result<CorrelationMatrix> {
        build_matrix(&self.dataset, &self.config.correlation_columns)
    }

    pub fn latest_regression(&self) -> Option<Arc<RegressionOutcome>> {
        self.regression.latest()
    }

    pub fn latest_tree(&self) -> Option<Arc<TreeOutcome>> {
        self.tree.latest()
    }

    /// Slot backing regression results, for callers running fits off-thread
    pub fn regression_slot(&self) -> &ResultSlot<RegressionOutcome> {
        &self.regression
    }

    /// Slot backing tree results, for callers training off-thread
    pub fn tree_slot(&self) -> &ResultSlot<TreeOutcome> {
        &self.tree
    }
}
