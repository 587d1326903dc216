use super::*;
use crate::metric::{accuracy, r2_score};
use approx::assert_abs_diff_eq;

// Test basic constructor functionality
#[test]
fn test_new() {
    let params = ForestParams {
        n_estimators: 25,
        max_depth: Some(6),
        sub_sample_ratio: 0.8,
        random_state: Some(42),
        ..Default::default()
    };
    let forest = RandomForest::new(true, Some(params)).unwrap();

    assert!(forest.get_is_classifier());
    assert_eq!(forest.get_parameters().n_estimators, 25);
    assert_eq!(forest.get_parameters().max_depth, Some(6));
    assert_eq!(forest.get_parameters().random_state, Some(42));
    assert!(forest.get_trees().is_none());
    assert_eq!(forest.get_n_features(), 0);
}

// Test default constructor
#[test]
fn test_default() {
    let forest = RandomForest::default();
    assert!(!forest.get_is_classifier());
    assert_eq!(forest.get_parameters().n_estimators, 100);
    assert_eq!(forest.get_parameters().max_depth, None);
    assert_eq!(forest.get_parameters().min_split_size, 1);
    assert_eq!(forest.get_parameters().sub_sample_ratio, 1.0);
    assert!(forest.get_parameters().run_parallel);
}

// Test hyperparameter validation at construction
#[test]
fn test_invalid_params() {
    let cases = [
        ForestParams {
            n_estimators: 0,
            ..Default::default()
        },
        ForestParams {
            min_split_size: 0,
            ..Default::default()
        },
        ForestParams {
            min_information_gain: 0.0,
            ..Default::default()
        },
        ForestParams {
            features_per_split: Some(0),
            ..Default::default()
        },
        ForestParams {
            sub_sample_ratio: 0.0,
            ..Default::default()
        },
        ForestParams {
            sub_sample_ratio: 1.5,
            ..Default::default()
        },
    ];

    for params in cases {
        assert!(matches!(
            RandomForest::new(false, Some(params)),
            Err(ModelError::InputValidationError(_))
        ));
    }
}

// Test classification on well-separated clusters
#[test]
fn test_fit_predict_classification() {
    let (x, y) = cluster_data(30, 1);

    let params = ForestParams {
        n_estimators: 25,
        random_state: Some(42),
        ..Default::default()
    };
    let mut forest = RandomForest::new(true, Some(params)).unwrap();
    forest.fit(x.view(), y.view()).unwrap();

    assert_eq!(forest.get_n_classes(), Some(2));
    assert_eq!(forest.get_trees().unwrap().len(), 25);

    let predictions = forest.predict(x.view()).unwrap();
    assert_abs_diff_eq!(accuracy(&y, &predictions), 1.0, epsilon = 1e-12);

    let probabilities = forest.predict_proba(x.view()).unwrap();
    assert_eq!(probabilities.shape(), &[60, 2]);
    for row in probabilities.outer_iter() {
        assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
    }
}

// Test regression quality on a noise-free surface
#[test]
fn test_fit_predict_regression() {
    let (x, y) = regression_data(150, 2);

    let params = ForestParams {
        n_estimators: 50,
        random_state: Some(7),
        ..Default::default()
    };
    let mut forest = RandomForest::new(false, Some(params)).unwrap();
    let predictions = forest.fit_predict(x.view(), y.view(), x.view()).unwrap();

    assert!(r2_score(&y, &predictions) > 0.8);
}

// Test that parallel and sequential construction produce bit-identical forests
#[test]
fn test_parallel_matches_sequential() {
    let (x, y) = regression_data(80, 3);

    let build = |run_parallel: bool| {
        let params = ForestParams {
            n_estimators: 20,
            sub_sample_ratio: 0.7,
            random_state: Some(99),
            run_parallel,
            ..Default::default()
        };
        let mut forest = RandomForest::new(false, Some(params)).unwrap();
        forest.fit(x.view(), y.view()).unwrap();
        forest
    };

    let parallel = build(true);
    let sequential = build(false);

    assert_eq!(parallel.get_trees(), sequential.get_trees());
    assert_eq!(
        parallel.predict(x.view()).unwrap(),
        sequential.predict(x.view()).unwrap()
    );
}

// Test that ensemble importance is the sum of the member trees' importance
#[test]
fn test_variable_importance_aggregation() {
    let (x, y) = regression_data(60, 4);

    let params = ForestParams {
        n_estimators: 10,
        random_state: Some(5),
        ..Default::default()
    };
    let mut forest = RandomForest::new(false, Some(params)).unwrap();
    forest.fit(x.view(), y.view()).unwrap();

    let mut expected = Array1::zeros(x.ncols());
    for tree in forest.get_trees().unwrap() {
        expected += tree.get_raw_variable_importance();
    }

    let importance = forest.get_raw_variable_importance().unwrap();
    for (&total, &member_sum) in importance.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(total, member_sum, epsilon = 1e-9);
    }

    // The dominant linear term should carry the most importance.
    let strongest = (0..importance.len())
        .max_by(|&a, &b| importance[a].partial_cmp(&importance[b]).unwrap())
        .unwrap();
    assert_eq!(strongest, 0);
}

// Test error paths before fit and on dimension mismatch
#[test]
fn test_predict_errors() {
    let forest = RandomForest::default();
    assert!(matches!(
        forest.predict_one(&[1.0]),
        Err(ModelError::NotFitted)
    ));
    assert!(matches!(
        forest.get_raw_variable_importance(),
        Err(ModelError::NotFitted)
    ));

    let (x, y) = cluster_data(10, 6);
    let params = ForestParams {
        n_estimators: 5,
        random_state: Some(1),
        ..Default::default()
    };
    let mut fitted = RandomForest::new(true, Some(params)).unwrap();
    fitted.fit(x.view(), y.view()).unwrap();

    assert!(matches!(
        fitted.predict_one(&[1.0, 2.0, 3.0]),
        Err(ModelError::TreeError(_))
    ));
}

// Test that probability queries on a regression forest fail
#[test]
fn test_predict_proba_regression_error() {
    let (x, y) = regression_data(30, 8);
    let params = ForestParams {
        n_estimators: 5,
        random_state: Some(1),
        ..Default::default()
    };
    let mut forest = RandomForest::new(false, Some(params)).unwrap();
    forest.fit(x.view(), y.view()).unwrap();

    assert!(matches!(
        forest.predict_proba(x.view()),
        Err(ModelError::TreeError(_))
    ));
}
