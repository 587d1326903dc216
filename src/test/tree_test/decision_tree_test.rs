use super::*;
use approx::assert_abs_diff_eq;

fn classification_data() -> (Array2<f64>, Array1<f64>) {
    let x = arr2(&[
        [1.0, 2.0],
        [1.2, 1.8],
        [0.8, 2.1],
        [1.1, 2.2],
        [8.0, 9.0],
        [8.2, 8.8],
        [7.9, 9.1],
        [8.1, 9.2],
    ]);
    let y = arr1(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    (x, y)
}

// Test basic constructor functionality
#[test]
fn test_new() {
    let params = DecisionTreeParams {
        max_depth: Some(5),
        min_split_size: 2,
        min_information_gain: 0.01,
        features_per_split: Some(1),
        random_state: Some(42),
    };
    let tree = DecisionTree::new(true, Some(params)).unwrap();

    assert!(tree.get_is_classifier());
    assert_eq!(tree.get_parameters().max_depth, Some(5));
    assert_eq!(tree.get_parameters().min_split_size, 2);
    assert_eq!(tree.get_parameters().features_per_split, Some(1));
    assert_eq!(tree.get_parameters().random_state, Some(42));
    assert!(tree.get_tree().is_none());
    assert_eq!(tree.get_n_features(), 0);
    assert_eq!(tree.get_n_classes(), None);
}

// Test default constructor
#[test]
fn test_default() {
    let tree = DecisionTree::default();
    assert!(!tree.get_is_classifier());
    assert_eq!(tree.get_parameters().max_depth, None);
    assert_eq!(tree.get_parameters().min_split_size, 1);
    assert_eq!(tree.get_parameters().features_per_split, None);
    assert!(tree.get_tree().is_none());
}

// Test hyperparameter validation at construction
#[test]
fn test_invalid_params() {
    let zero_split = DecisionTreeParams {
        min_split_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        DecisionTree::new(false, Some(zero_split)),
        Err(ModelError::InputValidationError(_))
    ));

    let zero_gain = DecisionTreeParams {
        min_information_gain: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        DecisionTree::new(false, Some(zero_gain)),
        Err(ModelError::InputValidationError(_))
    ));

    let zero_features = DecisionTreeParams {
        features_per_split: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        DecisionTree::new(false, Some(zero_features)),
        Err(ModelError::InputValidationError(_))
    ));
}

// Test that an unconstrained regression tree recalls its training targets
#[test]
fn test_regression_recalls_training_data() {
    let x = arr2(&[[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]]);
    let y = arr1(&[3.0, 1.0, 4.0, 1.5, 5.0, 9.0, 2.0, 6.0]);

    let mut tree = DecisionTree::new(false, None).unwrap();
    tree.fit(x.view(), y.view()).unwrap();

    let predictions = tree.predict(x.view()).unwrap();
    for (&prediction, &target) in predictions.iter().zip(y.iter()) {
        assert_abs_diff_eq!(prediction, target, epsilon = 1e-12);
    }
}

// Test classification predictions and probability output
#[test]
fn test_classification_predict_and_proba() {
    let (x, y) = classification_data();

    let mut tree = DecisionTree::new(true, None).unwrap();
    tree.fit(x.view(), y.view()).unwrap();
    assert_eq!(tree.get_n_classes(), Some(2));
    assert_eq!(tree.get_n_features(), 2);

    let predictions = tree.predict(x.view()).unwrap();
    for (prediction, target) in predictions.iter().zip(y.iter()) {
        assert_eq!(prediction, target);
    }

    let probabilities = tree.predict_proba(x.view()).unwrap();
    assert_eq!(probabilities.shape(), &[8, 2]);
    for row in probabilities.outer_iter() {
        assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
    }

    let single = tree.predict_proba_one(&[1.0, 2.0]).unwrap();
    assert_abs_diff_eq!(single[0], 1.0, epsilon = 1e-9);
}

// Test that a zero depth limit yields a single leaf predicting the target mean
#[test]
fn test_max_depth_zero_single_leaf() {
    let x = arr2(&[[1.0], [2.0], [3.0], [4.0]]);
    let y = arr1(&[1.0, 2.0, 3.0, 6.0]);

    let params = DecisionTreeParams {
        max_depth: Some(0),
        ..Default::default()
    };
    let mut tree = DecisionTree::new(false, Some(params)).unwrap();
    tree.fit(x.view(), y.view()).unwrap();

    let fitted = tree.get_tree().unwrap();
    assert_eq!(fitted.node_count(), 1);
    assert_eq!(fitted.leaf_count(), 1);
    assert_abs_diff_eq!(tree.predict_one(&[100.0]).unwrap(), 3.0, epsilon = 1e-12);
}

// Test that a split size floor covering the whole node yields a single leaf
#[test]
fn test_min_split_size_covering_data_single_leaf() {
    let x = arr2(&[[1.0], [2.0], [3.0], [4.0]]);
    let y = arr1(&[1.0, 2.0, 3.0, 4.0]);

    let params = DecisionTreeParams {
        min_split_size: 4,
        ..Default::default()
    };
    let mut tree = DecisionTree::new(false, Some(params)).unwrap();
    tree.fit(x.view(), y.view()).unwrap();

    assert_eq!(tree.get_tree().unwrap().leaf_count(), 1);
}

// Test that raising the gain threshold never grows a larger tree
#[test]
fn test_min_information_gain_prunes() {
    let mut rng = StdRng::seed_from_u64(3);
    let x = Array2::from_shape_fn((60, 2), |_| rng.random_range(0.0..10.0));
    let y = Array1::from_shape_fn(60, |i| x[[i, 0]] + rng.random_range(-0.5..0.5));

    let mut loose = DecisionTree::new(false, None).unwrap();
    loose.fit(x.view(), y.view()).unwrap();

    let params = DecisionTreeParams {
        min_information_gain: 1.0,
        ..Default::default()
    };
    let mut strict = DecisionTree::new(false, Some(params)).unwrap();
    strict.fit(x.view(), y.view()).unwrap();

    assert!(strict.get_tree().unwrap().leaf_count() <= loose.get_tree().unwrap().leaf_count());
}

// Test learning against a row subset with repeated indices
#[test]
fn test_fit_with_indices_repeats() {
    let (x, y) = classification_data();
    let indices = [0, 0, 1, 2, 4, 5, 5, 6];

    let mut tree = DecisionTree::new(true, None).unwrap();
    tree.fit_with_indices(x.view(), y.view(), &indices).unwrap();

    assert_eq!(tree.predict_one(&[1.0, 2.0]).unwrap(), 0.0);
    assert_eq!(tree.predict_one(&[8.0, 9.0]).unwrap(), 1.0);
}

// Test that out-of-range and empty index subsets are rejected
#[test]
fn test_fit_with_indices_invalid() {
    let (x, y) = classification_data();

    let mut tree = DecisionTree::new(true, None).unwrap();
    assert!(matches!(
        tree.fit_with_indices(x.view(), y.view(), &[0, 99]),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        tree.fit_with_indices(x.view(), y.view(), &[]),
        Err(ModelError::InputValidationError(_))
    ));
}

// Test fractional and negative class labels are rejected
#[test]
fn test_invalid_class_labels() {
    let x = arr2(&[[1.0], [2.0]]);

    let mut tree = DecisionTree::new(true, None).unwrap();
    assert!(matches!(
        tree.fit(x.view(), arr1(&[0.5, 1.0]).view()),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        tree.fit(x.view(), arr1(&[-1.0, 1.0]).view()),
        Err(ModelError::InputValidationError(_))
    ));
}

// Test error paths before fit and on dimension mismatch
#[test]
fn test_predict_errors() {
    let tree = DecisionTree::default();
    assert!(matches!(
        tree.predict_one(&[1.0]),
        Err(ModelError::NotFitted)
    ));
    assert!(matches!(
        tree.predict(arr2(&[[1.0]]).view()),
        Err(ModelError::NotFitted)
    ));
    assert!(matches!(
        tree.get_raw_variable_importance(),
        Err(ModelError::NotFitted)
    ));

    let (x, y) = classification_data();
    let mut fitted = DecisionTree::new(true, None).unwrap();
    fitted.fit(x.view(), y.view()).unwrap();
    assert!(matches!(
        fitted.predict_one(&[1.0, 2.0, 3.0]),
        Err(ModelError::TreeError(_))
    ));
}

// Test that probability queries on a regression tree fail
#[test]
fn test_predict_proba_regression_error() {
    let x = arr2(&[[1.0], [2.0], [3.0], [4.0]]);
    let y = arr1(&[1.0, 2.0, 3.0, 4.0]);

    let mut tree = DecisionTree::new(false, None).unwrap();
    tree.fit(x.view(), y.view()).unwrap();

    assert!(matches!(
        tree.predict_proba(x.view()),
        Err(ModelError::TreeError(_))
    ));
}

// Test that variable importance accumulates only on informative features
#[test]
fn test_variable_importance() {
    // Feature 0 determines the target, feature 1 is constant.
    let x = arr2(&[
        [1.0, 5.0],
        [2.0, 5.0],
        [3.0, 5.0],
        [10.0, 5.0],
        [11.0, 5.0],
        [12.0, 5.0],
    ]);
    let y = arr1(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

    let mut tree = DecisionTree::new(true, None).unwrap();
    tree.fit(x.view(), y.view()).unwrap();

    let importance = tree.get_raw_variable_importance().unwrap();
    assert_eq!(importance.len(), 2);
    assert!(importance[0] > 0.0);
    assert_abs_diff_eq!(importance[1], 0.0, epsilon = 1e-12);
}

// Test that identical random states grow identical trees under feature subsetting
#[test]
fn test_random_state_reproducible() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = Array2::from_shape_fn((40, 4), |_| rng.random_range(0.0..10.0));
    let y = Array1::from_shape_fn(40, |i| x[[i, 0]] - x[[i, 2]]);

    let params = DecisionTreeParams {
        features_per_split: Some(2),
        random_state: Some(7),
        ..Default::default()
    };

    let mut first = DecisionTree::new(false, Some(params.clone())).unwrap();
    first.fit(x.view(), y.view()).unwrap();
    let mut second = DecisionTree::new(false, Some(params)).unwrap();
    second.fit(x.view(), y.view()).unwrap();

    assert_eq!(first.get_tree(), second.get_tree());
}

// Test the formatted tree dump
#[test]
fn test_generate_tree_structure() {
    let (x, y) = classification_data();

    let mut tree = DecisionTree::new(true, None).unwrap();
    assert!(matches!(
        tree.generate_tree_structure(),
        Err(ModelError::NotFitted)
    ));

    tree.fit(x.view(), y.view()).unwrap();
    let structure = tree.generate_tree_structure().unwrap();
    assert!(structure.contains("Split"));
    assert!(structure.contains("Leaf"));
}

// Test fit_predict round trip
#[test]
fn test_fit_predict() {
    let (x, y) = classification_data();
    let x_test = arr2(&[[1.0, 2.0], [8.0, 9.0]]);

    let mut tree = DecisionTree::new(true, None).unwrap();
    let predictions = tree.fit_predict(x.view(), y.view(), x_test.view()).unwrap();
    assert_eq!(predictions, arr1(&[0.0, 1.0]));
}
