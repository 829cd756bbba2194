//! Ordered train/test split and held-out evaluation of the decision tree

use super::config::TreeConfig;
use super::decision_tree::{evaluate, DecisionTreeClassifier, TreeNode};
use crate::error::{InsightError, Result};
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A train/test partition of a feature matrix and target
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub y_train: Vec<u8>,
    pub x_test: Array2<f64>,
    pub y_test: Vec<u8>,
}

/// Split without shuffling: the first `floor(n * train_fraction)` rows train,
/// the remaining rows test.
pub fn train_test_split(
    features: &Array2<f64>,
    target: &[u8],
    train_fraction: f64,
) -> Result<TrainTestSplit> {
    if features.nrows() != target.len() {
        return Err(InsightError::DimensionMismatch {
            features: features.nrows(),
            targets: target.len(),
        });
    }
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(InsightError::InvalidParameter {
            name: "train_fraction".to_string(),
            value: train_fraction.to_string(),
            reason: "must lie strictly between 0 and 1".to_string(),
        });
    }

    let split_index = (features.nrows() as f64 * train_fraction).floor() as usize;
    Ok(TrainTestSplit {
        x_train: features.slice(s![..split_index, ..]).to_owned(),
        y_train: target[..split_index].to_vec(),
        x_test: features.slice(s![split_index.., ..]).to_owned(),
        y_test: target[split_index..].to_vec(),
    })
}

/// Fraction of equal entries
pub fn accuracy(predicted: &[u8], actual: &[u8]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(InsightError::DimensionMismatch {
            features: predicted.len(),
            targets: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(InsightError::EmptyDataset("no predictions to score".to_string()));
    }
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    Ok(correct as f64 / actual.len() as f64)
}

/// Trained tree with its held-out performance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeReport {
    pub tree: TreeNode,
    /// Test-set accuracy in [0, 1]
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub max_depth: usize,
    pub feature_importances: Array1<f64>,
}

impl TreeReport {
    pub fn accuracy_pct(&self) -> f64 {
        self.accuracy * 100.0
    }

    /// Short human-readable performance summary
    pub fn summary(&self) -> String {
        format!(
            "Accuracy on test data: {:.2}%\n\
             Model trained on {} samples, tested on {} samples\n\
             Maximum tree depth: {}",
            self.accuracy_pct(),
            self.n_train,
            self.n_test,
            self.max_depth
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Split, train on the leading rows, and score on the rest
pub fn train_and_evaluate(
    features: &Array2<f64>,
    target: &[u8],
    config: &TreeConfig,
) -> Result<TreeReport> {
    config.validate()?;
    if features.nrows() == 0 || target.is_empty() {
        return Err(InsightError::EmptyDataset(format!(
            "{} feature rows, {} targets",
            features.nrows(),
            target.len()
        )));
    }

    let split = train_test_split(features, target, config.train_fraction)?;
    for (part, rows) in [("train", split.y_train.len()), ("test", split.y_test.len())] {
        if rows == 0 {
            return Err(InsightError::EmptyDataset(format!(
                "{} split of {} rows at train fraction {} is empty",
                part,
                target.len(),
                config.train_fraction
            )));
        }
    }

    let mut classifier = DecisionTreeClassifier::new()
        .with_max_depth(config.max_depth)
        .with_min_samples_per_node(config.min_samples_per_node);
    classifier.fit(&split.x_train, &split.y_train)?;

    let feature_importances = classifier
        .feature_importances()
        .cloned()
        .unwrap_or_else(|| Array1::zeros(features.ncols()));
    let tree = classifier.into_root().ok_or(InsightError::ModelNotFitted)?;

    let accuracy = evaluate(&tree, split.x_test.view(), &split.y_test)?;

    info!(
        n_train = split.y_train.len(),
        n_test = split.y_test.len(),
        max_depth = config.max_depth,
        accuracy,
        "Decision tree evaluated"
    );

    Ok(TreeReport {
        tree,
        accuracy,
        n_train: split.y_train.len(),
        n_test: split.y_test.len(),
        max_depth: config.max_depth,
        feature_importances,
    })
}
