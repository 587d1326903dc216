use super::*;
use approx::assert_abs_diff_eq;

// Test regression impurity against hand-computed variance
#[test]
fn test_regression_known_values() {
    let targets = [1.0, 2.0, 3.0, 4.0];
    let mut calculator = RegressionImpurityCalculator::new();
    calculator.init(&targets, Interval::new(0, 4).unwrap());

    // Population variance of [1, 2, 3, 4] is 1.25
    assert_abs_diff_eq!(calculator.node_impurity(), 1.25, epsilon = 1e-12);
    assert_abs_diff_eq!(calculator.leaf_value(), 2.5, epsilon = 1e-12);
    assert!(calculator.leaf_probabilities().is_none());

    calculator.update_split_index(2);
    assert_eq!(calculator.left_count(), 2);
    assert_eq!(calculator.right_count(), 2);

    let children = calculator.child_impurities();
    assert_abs_diff_eq!(children.left, 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(children.right, 0.25, epsilon = 1e-12);

    // 1.25 - (0.5 * 0.25 + 0.5 * 0.25) = 1.0
    assert_abs_diff_eq!(calculator.impurity_improvement(1.25), 1.0, epsilon = 1e-12);
}

// Variance from scratch for comparison against the incremental path
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

// Test that the incremental sweep matches recomputing each side from scratch
#[test]
fn test_regression_incremental_matches_recomputed() {
    let mut rng = StdRng::seed_from_u64(7);
    let targets: Vec<f64> = (0..40).map(|_| rng.random_range(-10.0..10.0)).collect();

    let mut calculator = RegressionImpurityCalculator::new();
    calculator.init(&targets, Interval::new(0, targets.len()).unwrap());

    for index in 1..targets.len() {
        calculator.update_split_index(index);
        let children = calculator.child_impurities();
        assert_abs_diff_eq!(children.left, variance(&targets[..index]), epsilon = 1e-9);
        assert_abs_diff_eq!(children.right, variance(&targets[index..]), epsilon = 1e-9);
    }
}

// Test Gini impurity against hand-computed values
#[test]
fn test_gini_known_values() {
    let targets = [0.0, 0.0, 0.0, 1.0];
    let mut calculator = GiniImpurityCalculator::new(2);
    calculator.init(&targets, Interval::new(0, 4).unwrap());

    // 1 - (0.75^2 + 0.25^2) = 0.375
    assert_abs_diff_eq!(calculator.node_impurity(), 0.375, epsilon = 1e-12);
    assert_eq!(calculator.leaf_value(), 0.0);

    let probabilities = calculator.leaf_probabilities().unwrap();
    assert_abs_diff_eq!(probabilities[0], 0.75, epsilon = 1e-12);
    assert_abs_diff_eq!(probabilities[1], 0.25, epsilon = 1e-12);

    // Left [0, 0, 0] is pure, right [1] is pure
    calculator.update_split_index(3);
    let children = calculator.child_impurities();
    assert_abs_diff_eq!(children.left, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(children.right, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(calculator.impurity_improvement(0.375), 0.375, epsilon = 1e-12);
}

// Test that a perfectly balanced split of [0, 0, 1, 1] gains nothing at index 2
#[test]
fn test_gini_uninformative_split() {
    let targets = [0.0, 1.0, 0.0, 1.0];
    let mut calculator = GiniImpurityCalculator::new(2);
    calculator.init(&targets, Interval::new(0, 4).unwrap());
    let total = calculator.node_impurity();

    calculator.update_split_index(2);
    assert_abs_diff_eq!(calculator.impurity_improvement(total), 0.0, epsilon = 1e-12);
}

// Test the relative tolerance comparison on child impurity pairs
#[test]
fn test_child_impurities_approx_eq() {
    let reference = ChildImpurities::new(1.0, 2.0);
    assert!(reference.approx_eq(&ChildImpurities::new(1.0 + 5e-6, 2.0)));
    assert!(reference.approx_eq(&ChildImpurities::new(1.0, 2.0 - 1e-5)));
    assert!(!reference.approx_eq(&ChildImpurities::new(1.0 + 1e-4, 2.0)));
    assert!(!reference.approx_eq(&ChildImpurities::new(1.0, 2.1)));
}

// Test behavior before any boundary movement: the left side is empty
#[test]
fn test_initial_position_empty_left() {
    let targets = [3.0, 5.0, 7.0];
    let mut calculator = RegressionImpurityCalculator::new();
    calculator.init(&targets, Interval::new(0, 3).unwrap());

    assert_eq!(calculator.left_count(), 0);
    assert_eq!(calculator.right_count(), 3);

    // An empty left side contributes nothing, so no improvement
    let total = calculator.node_impurity();
    assert_abs_diff_eq!(calculator.impurity_improvement(total), 0.0, epsilon = 1e-12);
}

// Test the classifier getter and re-initialization over a sub-interval
#[test]
fn test_gini_sub_interval() {
    let targets = [1.0, 0.0, 0.0, 1.0, 1.0, 2.0];
    let mut calculator = GiniImpurityCalculator::new(3);
    assert_eq!(calculator.get_n_classes(), 3);

    calculator.init(&targets, Interval::new(1, 4).unwrap());
    // Covers [0, 0, 1]: 1 - ((2/3)^2 + (1/3)^2) = 4/9
    assert_abs_diff_eq!(calculator.node_impurity(), 4.0 / 9.0, epsilon = 1e-12);
    assert_eq!(calculator.leaf_value(), 0.0);
}
