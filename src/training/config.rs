//! Analysis configuration

use crate::dataset::{FEATURE_COLUMNS, FEATURE_LABELS, TARGET_COLUMN};
use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};

/// Decision tree growth and evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum tree depth (0 = single leaf)
    pub max_depth: usize,

    /// Nodes with this many samples or fewer become leaves
    pub min_samples_per_node: usize,

    /// Leading fraction of rows used for training; the rest is the test set
    pub train_fraction: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_per_node: 1,
            train_fraction: 0.7,
        }
    }
}

impl TreeConfig {
    /// Builder method to set max depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to set the minimum node size
    pub fn with_min_samples_per_node(mut self, n: usize) -> Self {
        self.min_samples_per_node = n;
        self
    }

    /// Builder method to set the train fraction
    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(InsightError::InvalidParameter {
                name: "train_fraction".to_string(),
                value: self.train_fraction.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Column selection for the tree and the correlation sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Feature columns, in feature-vector order
    pub feature_columns: Vec<String>,

    /// Human-readable feature names used when rendering trees
    pub feature_labels: Vec<String>,

    /// Binary target column (1 = positive, anything else = 0)
    pub target_column: String,

    /// Columns swept by the R² correlation matrix
    pub correlation_columns: Vec<String>,

    /// Tree settings
    pub tree: TreeConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let features: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        Self {
            correlation_columns: features.clone(),
            feature_columns: features,
            feature_labels: FEATURE_LABELS.iter().map(|l| l.to_string()).collect(),
            target_column: TARGET_COLUMN.to_string(),
            tree: TreeConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration for custom feature and target columns.
    ///
    /// Feature labels default to the column names themselves.
    pub fn new(feature_columns: Vec<String>, target: impl Into<String>) -> Self {
        Self {
            correlation_columns: feature_columns.clone(),
            feature_labels: feature_columns.clone(),
            feature_columns,
            target_column: target.into(),
            tree: TreeConfig::default(),
        }
    }

    /// Builder method to set feature labels
    pub fn with_feature_labels(mut self, labels: Vec<String>) -> Self {
        self.feature_labels = labels;
        self
    }

    /// Builder method to set the correlation sweep columns
    pub fn with_correlation_columns(mut self, columns: Vec<String>) -> Self {
        self.correlation_columns = columns;
        self
    }

    /// Builder method to set tree settings
    pub fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }

    /// Builder method to set max depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.tree.max_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_columns.is_empty() {
            return Err(InsightError::ConfigError(
                "at least one feature column is required".to_string(),
            ));
        }
        if self.feature_labels.len() != self.feature_columns.len() {
            return Err(InsightError::ConfigError(format!(
                "{} feature labels for {} feature columns",
                self.feature_labels.len(),
                self.feature_columns.len()
            )));
        }
        if self.feature_columns.contains(&self.target_column) {
            return Err(InsightError::ConfigError(format!(
                "target column '{}' is also listed as a feature",
                self.target_column
            )));
        }
        self.tree.validate()
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
