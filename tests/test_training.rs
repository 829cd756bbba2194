//! Integration test: regression, correlation sweep and decision tree

use cardio_insight::dataset::{Dataset, Record, Samples, Schema};
use cardio_insight::training::{
    build_matrix, evaluate, fit, predict, train, train_and_evaluate, DecisionTreeClassifier,
    MatrixCell, TreeConfig, TreeNode,
};
use cardio_insight::InsightError;
use ndarray::{array, Array2};

#[test]
fn test_fit_perfect_doubling() {
    let samples = Samples::from_pairs(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
    let result = fit(&samples).unwrap();

    assert!((result.model.slope - 2.0).abs() < 1e-9);
    assert!(result.model.intercept.abs() < 1e-9);
    assert!((result.r_squared - 1.0).abs() < 1e-9);
    assert!((result.model.predict(5.0) - 10.0).abs() < 1e-9);
}

#[test]
fn test_fit_constant_target_never_returns_nan() {
    let samples = Samples::from_pairs(&[1.0, 2.0, 3.0, 4.0], &[3.0, 3.0, 3.0, 3.0]).unwrap();
    let result = fit(&samples);
    assert!(matches!(result, Err(InsightError::DegenerateFit { .. })));
}

#[test]
fn test_fit_r_squared_in_unit_interval() {
    let x = [63.0, 37.0, 41.0, 56.0, 57.0, 57.0, 56.0, 44.0, 52.0, 57.0];
    let y = [145.0, 130.0, 130.0, 120.0, 120.0, 140.0, 140.0, 120.0, 172.0, 150.0];
    let result = fit(&Samples::from_pairs(&x, &y).unwrap()).unwrap();
    assert!(result.r_squared >= 0.0 && result.r_squared <= 1.0);
}

fn matrix_dataset() -> Dataset {
    let schema = Schema::numeric(&["age", "oldpeak", "slope_peak_exercise"]);
    let records = vec![
        Record::new().with("age", 63.0).with("oldpeak", 2.3).with("slope_peak_exercise", 1.0),
        Record::new().with("age", 37.0).with("oldpeak", 3.5).with("slope_peak_exercise", 1.0),
        Record::new().with("age", 41.0).with("oldpeak", 1.4).with("slope_peak_exercise", 1.0),
        Record::new().with("age", 56.0).with("oldpeak", 0.8).with("slope_peak_exercise", 1.0),
    ];
    Dataset::from_records(schema, records)
}

#[test]
fn test_matrix_diagonal_only() {
    let matrix = build_matrix(&matrix_dataset(), &["age", "age"]).unwrap();
    let cells: Vec<_> = matrix.iter().collect();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0], ("age", "age", &MatrixCell::Value { r_squared: 1.0 }));
}

#[test]
fn test_matrix_sweep_completeness() {
    let columns = ["age", "oldpeak", "slope_peak_exercise"];
    let matrix = build_matrix(&matrix_dataset(), &columns).unwrap();

    for a in &columns {
        for b in &columns {
            assert!(matrix.get(a, b).is_some(), "missing cell ({a}, {b})");
        }
    }
    assert!(matrix.get("age", "oldpeak").unwrap().is_available());
    assert!(!matrix.get("age", "slope_peak_exercise").unwrap().is_available());
    assert!(!matrix.get("slope_peak_exercise", "age").unwrap().is_available());
}

#[test]
fn test_matrix_pairs_fitted_independently() {
    let matrix = build_matrix(&matrix_dataset(), &["age", "oldpeak"]).unwrap();
    let forward = matrix.get("age", "oldpeak").unwrap().value().unwrap();
    let backward = matrix.get("oldpeak", "age").unwrap().value().unwrap();
    // simple OLS with intercept gives r² either way; only rounding may differ
    assert!((forward - backward).abs() < 1e-9);
}

#[test]
fn test_tree_end_to_end_single_feature() {
    let x = array![[1.0], [2.0], [3.0], [4.0]];
    let y = [0, 0, 1, 1];

    let root = train(x.view(), &y, 1, 1).unwrap();
    let TreeNode::Split { feature_idx, threshold, left, right, .. } = &root else {
        panic!("expected split root");
    };
    assert_eq!(*feature_idx, 0);
    assert!(*threshold > 2.0 && *threshold < 3.0);
    assert!(matches!(**left, TreeNode::Leaf { predicted_class: 0, .. }));
    assert!(matches!(**right, TreeNode::Leaf { predicted_class: 1, .. }));
    assert_eq!(evaluate(&root, x.view(), &y).unwrap(), 1.0);
}

#[test]
fn test_tree_zero_depth_majority() {
    let x = array![[5.0, 1.0], [6.0, 2.0], [7.0, 3.0]];
    let root = train(x.view(), &[0, 1, 1], 0, 1).unwrap();
    assert!(matches!(root, TreeNode::Leaf { predicted_class: 1, n_samples: 3, .. }));
}

#[test]
fn test_tree_perfect_separator_reaches_full_training_accuracy() {
    // feature 1 separates perfectly, feature 0 is noise
    let x = array![
        [3.0, 0.1],
        [1.0, 0.4],
        [4.0, 0.2],
        [1.0, 0.9],
        [5.0, 0.8],
        [9.0, 0.7],
        [2.0, 0.3],
        [6.0, 0.6],
    ];
    let y = [0, 0, 0, 1, 1, 1, 0, 1];

    for max_depth in 1..4 {
        let root = train(x.view(), &y, max_depth, 1).unwrap();
        assert_eq!(evaluate(&root, x.view(), &y).unwrap(), 1.0);
    }
}

#[test]
fn test_tree_predict_repeatable() {
    let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0], [4.0, 0.0]];
    let root = train(x.view(), &[0, 1, 0, 1], 3, 1).unwrap();
    let a = predict(&root, &[2.5, 0.5]).unwrap();
    let b = predict(&root, &[2.5, 0.5]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_tree_errors() {
    let empty = Array2::<f64>::zeros((0, 8));
    assert!(matches!(train(empty.view(), &[], 5, 1), Err(InsightError::EmptyDataset(_))));

    let x = array![[1.0], [2.0], [3.0]];
    assert!(matches!(
        train(x.view(), &[0, 1], 5, 1),
        Err(InsightError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_train_and_evaluate_uses_leading_rows() {
    // last 30% are deliberately mislabeled relative to the first 70%
    let x = Array2::from_shape_vec((10, 1), (1..=10).map(f64::from).collect()).unwrap();
    let y = [0, 0, 0, 0, 1, 1, 1, 0, 0, 0];

    let report = train_and_evaluate(&x, &y, &TreeConfig::default().with_max_depth(1)).unwrap();
    assert_eq!(report.n_train, 7);
    assert_eq!(report.n_test, 3);
    assert_eq!(report.accuracy, 0.0);
}

#[test]
fn test_classifier_on_heart_like_features() {
    let x = array![
        [63.0, 145.0, 233.0, 0.0, 150.0, 2.3, 0.0, 0.0],
        [37.0, 130.0, 250.0, 1.0, 187.0, 3.5, 0.0, 0.0],
        [41.0, 130.0, 204.0, 0.0, 172.0, 1.4, 2.0, 0.0],
        [56.0, 120.0, 236.0, 1.0, 178.0, 0.8, 2.0, 0.0],
        [67.0, 160.0, 286.0, 0.0, 108.0, 1.5, 1.0, 3.0],
        [67.0, 120.0, 229.0, 0.0, 129.0, 2.6, 1.0, 2.0],
        [62.0, 140.0, 268.0, 0.0, 160.0, 3.6, 0.0, 2.0],
        [63.0, 130.0, 254.0, 0.0, 147.0, 1.4, 1.0, 1.0],
    ];
    let y = [0, 0, 0, 0, 1, 1, 1, 1];

    let mut tree = DecisionTreeClassifier::new().with_max_depth(3);
    tree.fit(&x, &y).unwrap();
    assert_eq!(tree.score(&x, &y).unwrap(), 1.0);
    assert!(tree.depth() <= 3);
}
