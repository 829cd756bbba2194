//! Binary classification tree with Gini split selection

use crate::error::{InsightError, Result};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Splits must reduce impurity by more than this to be taken
const MIN_GAIN: f64 = 1e-12;

/// Decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Terminal node predicting its majority class
    Leaf {
        predicted_class: u8,
        n_samples: usize,
        /// class -> sample count
        distribution: BTreeMap<u8, usize>,
    },
    /// Internal node: `feature <= threshold` goes left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

impl TreeNode {
    fn leaf(counts: [usize; 2]) -> Self {
        // ties go to class 0
        let predicted_class = u8::from(counts[1] > counts[0]);
        let distribution = counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(class, &c)| (class as u8, c))
            .collect();
        TreeNode::Leaf {
            predicted_class,
            n_samples: counts[0] + counts[1],
            distribution,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn n_samples(&self) -> usize {
        match self {
            TreeNode::Leaf { n_samples, .. } | TreeNode::Split { n_samples, .. } => *n_samples,
        }
    }

    /// Share of a leaf's samples belonging to its predicted class
    pub fn confidence(&self) -> Option<f64> {
        match self {
            TreeNode::Leaf {
                predicted_class,
                n_samples,
                distribution,
            } if *n_samples > 0 => {
                let hits = distribution.get(predicted_class).copied().unwrap_or(0);
                Some(hits as f64 / *n_samples as f64)
            }
            _ => None,
        }
    }

    /// Classify one feature vector
    pub fn predict(&self, features: &[f64]) -> Result<u8> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { predicted_class, .. } => return Ok(*predicted_class),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let value = features.get(*feature_idx).ok_or_else(|| {
                        InsightError::InvalidInput(format!(
                            "feature vector has {} values, tree splits on index {}",
                            features.len(),
                            feature_idx
                        ))
                    })?;
                    node = if *value <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Number of levels; a lone leaf has depth 0
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn gini(counts: [usize; 2]) -> f64 {
    let n = (counts[0] + counts[1]) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / n;
    let p1 = counts[1] as f64 / n;
    1.0 - p0 * p0 - p1 * p1
}

fn class_counts(target: &[u8], indices: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &i in indices {
        counts[target[i] as usize] += 1;
    }
    counts
}

fn validate(features: &ArrayView2<f64>, target: &[u8]) -> Result<()> {
    if features.nrows() == 0 || target.is_empty() {
        return Err(InsightError::EmptyDataset(format!(
            "{} feature rows, {} targets",
            features.nrows(),
            target.len()
        )));
    }
    if features.nrows() != target.len() {
        return Err(InsightError::DimensionMismatch {
            features: features.nrows(),
            targets: target.len(),
        });
    }
    if features.ncols() == 0 {
        return Err(InsightError::EmptyDataset("no feature columns".to_string()));
    }
    if let Some(bad) = target.iter().find(|&&t| t > 1) {
        return Err(InsightError::InvalidInput(format!(
            "target class {} is not 0 or 1",
            bad
        )));
    }
    if features.iter().any(|v| !v.is_finite()) {
        return Err(InsightError::InvalidInput(
            "feature matrix contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

struct TreeBuilder<'a, 'b> {
    features: ArrayView2<'a, f64>,
    target: &'b [u8],
    max_depth: usize,
    min_samples_per_node: usize,
    importances: Vec<f64>,
}

struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

impl TreeBuilder<'_, '_> {
    fn build(&mut self, indices: &[usize], depth: usize) -> TreeNode {
        let n_samples = indices.len();
        let counts = class_counts(self.target, indices);

        let is_pure = counts[0] == 0 || counts[1] == 0;
        if depth >= self.max_depth || n_samples <= self.min_samples_per_node || is_pure {
            return TreeNode::leaf(counts);
        }

        let parent_impurity = gini(counts);
        let Some(best) = self.find_best_split(indices, counts, parent_impurity) else {
            return TreeNode::leaf(counts);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.features[[i, best.feature_idx]] <= best.threshold);

        debug!(
            depth,
            feature = best.feature_idx,
            threshold = best.threshold,
            gain = best.gain,
            left = left_indices.len(),
            right = right_indices.len(),
            "Split"
        );

        self.importances[best.feature_idx] += n_samples as f64 * best.gain;

        let left = Box::new(self.build(&left_indices, depth + 1));
        let right = Box::new(self.build(&right_indices, depth + 1));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity: parent_impurity,
        }
    }

    /// Scan features in index order and thresholds in ascending order;
    /// the first strictly-best candidate wins.
    fn find_best_split(
        &self,
        indices: &[usize],
        counts: [usize; 2],
        parent_impurity: f64,
    ) -> Option<BestSplit> {
        let n = indices.len() as f64;
        let mut best: Option<BestSplit> = None;

        for feature_idx in 0..self.features.ncols() {
            let mut column: Vec<(f64, u8)> = indices
                .iter()
                .map(|&i| (self.features[[i, feature_idx]], self.target[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = [0usize; 2];
            for k in 0..column.len() - 1 {
                left[column[k].1 as usize] += 1;

                let (value, next) = (column[k].0, column[k + 1].0);
                if value == next {
                    continue;
                }

                let right = [counts[0] - left[0], counts[1] - left[1]];
                let n_left = (left[0] + left[1]) as f64;
                let n_right = (right[0] + right[1]) as f64;
                let weighted = (n_left * gini(left) + n_right * gini(right)) / n;
                let gain = parent_impurity - weighted;

                let current = best.as_ref().map_or(MIN_GAIN, |b| b.gain);
                if gain > current {
                    best = Some(BestSplit {
                        feature_idx,
                        threshold: (value + next) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Grow a tree on `features` (one row per sample) and binary `target`.
///
/// A node becomes a leaf at `max_depth`, when it holds `min_samples_per_node`
/// samples or fewer, when it is pure, or when no split reduces Gini impurity.
pub fn train(
    features: ArrayView2<f64>,
    target: &[u8],
    max_depth: usize,
    min_samples_per_node: usize,
) -> Result<TreeNode> {
    train_with_importances(features, target, max_depth, min_samples_per_node)
        .map(|(root, _)| root)
}

fn train_with_importances(
    features: ArrayView2<f64>,
    target: &[u8],
    max_depth: usize,
    min_samples_per_node: usize,
) -> Result<(TreeNode, Array1<f64>)> {
    validate(&features, target)?;

    let mut builder = TreeBuilder {
        features,
        target,
        max_depth,
        min_samples_per_node,
        importances: vec![0.0; features.ncols()],
    };
    let indices: Vec<usize> = (0..target.len()).collect();
    let root = builder.build(&indices, 0);

    let mut importances = builder.importances;
    let total: f64 = importances.iter().sum();
    if total > 0.0 {
        for imp in &mut importances {
            *imp /= total;
        }
    }

    info!(
        n_samples = target.len(),
        n_features = features.ncols(),
        depth = root.depth(),
        leaves = root.n_leaves(),
        "Decision tree trained"
    );

    Ok((root, Array1::from_vec(importances)))
}

/// Classify one feature vector
pub fn predict(root: &TreeNode, features: &[f64]) -> Result<u8> {
    root.predict(features)
}

/// Fraction of rows whose prediction equals the target
pub fn evaluate(root: &TreeNode, features: ArrayView2<f64>, target: &[u8]) -> Result<f64> {
    if features.nrows() == 0 || target.is_empty() {
        return Err(InsightError::EmptyDataset("no evaluation samples".to_string()));
    }
    if features.nrows() != target.len() {
        return Err(InsightError::DimensionMismatch {
            features: features.nrows(),
            targets: target.len(),
        });
    }

    let mut correct = 0usize;
    for (row, &actual) in features.rows().into_iter().zip(target) {
        let sample = row.to_vec();
        if root.predict(&sample)? == actual {
            correct += 1;
        }
    }
    Ok(correct as f64 / target.len() as f64)
}

/// Decision tree classifier model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: usize,
    /// Nodes this small become leaves
    pub min_samples_per_node: usize,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeClassifier {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: 5,
            min_samples_per_node: 1,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the minimum node size
    pub fn with_min_samples_per_node(mut self, n: usize) -> Self {
        self.min_samples_per_node = n;
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> Result<&mut Self> {
        let (root, importances) =
            train_with_importances(x.view(), y, self.max_depth, self.min_samples_per_node)?;
        self.n_features = x.ncols();
        self.root = Some(root);
        self.feature_importances = Some(importances);
        Ok(self)
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Consume the classifier, keeping only its tree
    pub fn into_root(self) -> Option<TreeNode> {
        self.root
    }

    /// Classify a single sample
    pub fn predict_sample(&self, sample: &[f64]) -> Result<u8> {
        self.root
            .as_ref()
            .ok_or(InsightError::ModelNotFitted)?
            .predict(sample)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<u8>> {
        let root = self.root.as_ref().ok_or(InsightError::ModelNotFitted)?;
        if x.ncols() != self.n_features {
            return Err(InsightError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        x.rows()
            .into_iter()
            .map(|row| root.predict(&row.to_vec()))
            .collect()
    }

    /// Accuracy against known labels
    pub fn score(&self, x: &Array2<f64>, y: &[u8]) -> Result<f64> {
        let root = self.root.as_ref().ok_or(InsightError::ModelNotFitted)?;
        evaluate(root, x.view(), y)
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }

    /// Get number of leaves
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::n_leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_feature_split() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = [0, 0, 1, 1];

        let root = train(x.view(), &y, 1, 1).unwrap();

        match &root {
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
                n_samples,
                ..
            } => {
                assert_eq!(*feature_idx, 0);
                assert!(*threshold > 2.0 && *threshold < 3.0);
                assert_eq!(*n_samples, 4);
                assert!(left.is_leaf() && right.is_leaf());
                assert_eq!(left.confidence(), Some(1.0));
                assert_eq!(right.confidence(), Some(1.0));
            }
            TreeNode::Leaf { .. } => panic!("expected a split"),
        }
        assert_eq!(evaluate(&root, x.view(), &y).unwrap(), 1.0);
    }

    #[test]
    fn test_target_borrowed_separately_from_features() {
        let x = array![[1.0, 5.0], [2.0, 4.0], [3.0, 3.0], [4.0, 2.0]];
        let view = x.view();

        let root = {
            let y: Vec<u8> = vec![0, 0, 1, 1];
            train(view, &y, 2, 1).unwrap()
        };

        assert_eq!(root.predict(&[1.5, 4.5]).unwrap(), 0);
        assert_eq!(root.predict(&[3.5, 2.5]).unwrap(), 1);
    }

    #[test]
    fn test_zero_depth_is_majority_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = [1, 0, 1, 1, 0];

        let root = train(x.view(), &y, 0, 1).unwrap();
        match root {
            TreeNode::Leaf {
                predicted_class,
                n_samples,
                distribution,
            } => {
                assert_eq!(predicted_class, 1);
                assert_eq!(n_samples, 5);
                assert_eq!(distribution.get(&0), Some(&2));
                assert_eq!(distribution.get(&1), Some(&3));
            }
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn test_tie_goes_to_class_zero() {
        let x = array![[1.0], [1.0]];
        let root = train(x.view(), &[1, 0], 3, 1).unwrap();
        assert_eq!(root.predict(&[1.0]).unwrap(), 0);
    }

    #[test]
    fn test_first_feature_wins_equal_gain() {
        // both columns separate the classes perfectly
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let root = train(x.view(), &[0, 0, 1, 1], 2, 1).unwrap();
        match root {
            TreeNode::Split { feature_idx, threshold, .. } => {
                assert_eq!(feature_idx, 0);
                assert_eq!(threshold, 2.5);
            }
            _ => panic!("expected a split"),
        }
    }

    #[test]
    fn test_min_samples_per_node_stops_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let root = train(x.view(), &[0, 1, 0, 1], 5, 4).unwrap();
        assert!(root.is_leaf());
    }

    #[test]
    fn test_max_depth_respected() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = [0, 1, 0, 1, 0, 1, 0, 1];
        for max_depth in 0..4 {
            let root = train(x.view(), &y, max_depth, 1).unwrap();
            assert!(root.depth() <= max_depth);
        }
    }

    #[test]
    fn test_input_validation() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            train(empty.view(), &[], 2, 1),
            Err(InsightError::EmptyDataset(_))
        ));

        let x = array![[1.0], [2.0]];
        assert!(matches!(
            train(x.view(), &[0], 2, 1),
            Err(InsightError::DimensionMismatch { features: 2, targets: 1 })
        ));
        assert!(matches!(
            train(x.view(), &[0, 2], 2, 1),
            Err(InsightError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let x = array![[1.0, 5.0], [2.0, 3.0], [3.0, 4.0], [4.0, 1.0], [5.0, 2.0]];
        let root = train(x.view(), &[0, 1, 0, 1, 1], 3, 1).unwrap();
        let sample = [2.5, 3.5];
        let first = root.predict(&sample).unwrap();
        for _ in 0..10 {
            assert_eq!(root.predict(&sample).unwrap(), first);
        }
    }

    #[test]
    fn test_predict_short_vector() {
        let x = array![[0.0, 1.0], [0.0, 2.0]];
        let root = train(x.view(), &[0, 1], 1, 1).unwrap();
        assert!(matches!(root.predict(&[0.0]), Err(InsightError::InvalidInput(_))));
    }

    #[test]
    fn test_classifier_wrapper() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = [0, 0, 1, 1];

        let mut tree = DecisionTreeClassifier::new().with_max_depth(2);
        assert!(matches!(tree.predict(&x), Err(InsightError::ModelNotFitted)));

        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), vec![0, 0, 1, 1]);
        assert_eq!(tree.score(&x, &y).unwrap(), 1.0);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);

        let importances = tree.feature_importances().unwrap();
        assert!((importances[0] - 1.0).abs() < 1e-12);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_json_shape() {
        let x = array![[1.0], [2.0]];
        let root = train(x.view(), &[0, 1], 1, 1).unwrap();
        let json: serde_json::Value = serde_json::from_str(&root.to_json().unwrap()).unwrap();

        assert_eq!(json["kind"], "split");
        assert_eq!(json["feature_idx"], 0);
        assert_eq!(json["left"]["kind"], "leaf");
        assert_eq!(json["left"]["predicted_class"], 0);
        assert_eq!(json["right"]["distribution"]["1"], 1);
    }
}
