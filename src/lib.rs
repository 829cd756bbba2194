//! cardio_insight - regression and classification core for heart-health data
//!
//! This crate provides the analytics behind an exploratory health dashboard:
//! - Loading a delimited dataset into typed, complete records
//! - Simple linear regression between two numeric columns, with R²
//! - An R² matrix over every ordered pair of a column set
//! - A shallow Gini decision tree predicting a binary outcome
//!
//! # Modules
//!
//! - [`dataset`] - Schema, records and column extraction
//! - [`training`] - Regression, correlation matrix, decision tree, evaluation
//! - [`session`] - Dataset owner holding the latest trained results
//! - [`utils`] - CSV loading
//!
//! Presentation is left to callers: every result is `serde`-serializable and
//! trees can be rendered as plain text.

// Core error handling
pub mod error;

// Data
pub mod dataset;
pub mod utils;

// Models
pub mod training;

// Stateful wrapper
pub mod session;

pub use error::{InsightError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{InsightError, Result};

    // Data
    pub use crate::dataset::{
        display_name, extract_samples, feature_matrix, ColumnKind, Dataset, Record, Samples,
        Schema, Value, FEATURE_COLUMNS, FEATURE_LABELS, TARGET_COLUMN,
    };
    pub use crate::utils::DataLoader;

    // Training
    pub use crate::training::{
        build_matrix, fit, fit_columns, render_tree, train, train_and_evaluate, AnalysisConfig,
        CorrelationMatrix, DecisionTreeClassifier, FitResult, LinearModel, MatrixCell, TreeConfig,
        TreeNode, TreeReport,
    };

    // Session
    pub use crate::session::{AnalysisSession, RegressionOutcome, TreeOutcome};
}
