//! Model training module
//!
//! Provides the statistical engines behind the analysis:
//! - Simple linear regression (closed-form OLS) with R²
//! - R² correlation matrix over column pairs
//! - Binary decision tree with Gini split selection
//! - Ordered train/test evaluation and text rendering of trees

mod config;
pub mod correlation;
pub mod decision_tree;
pub mod evaluation;
pub mod linear_regression;
pub mod tree_render;

pub use config::{AnalysisConfig, TreeConfig};
pub use correlation::{build_matrix, CorrelationBand, CorrelationMatrix, MatrixCell, Unavailable};
pub use decision_tree::{evaluate, predict, train, DecisionTreeClassifier, TreeNode};
pub use evaluation::{accuracy, train_and_evaluate, train_test_split, TrainTestSplit, TreeReport};
pub use linear_regression::{fit, fit_columns, FitResult, FitStrength, LinearModel};
pub use tree_render::{render_tree, RenderedTree, TreeRenderer};
