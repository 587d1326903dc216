pub(crate) use crate::error::ModelError;
pub(crate) use crate::tree::builder::DepthFirstTreeBuilder;
pub(crate) use crate::tree::helper_functions::{
    ordered_feature_indices, preliminary_check, verify_class_labels,
};
pub(crate) use crate::tree::impurity::{GiniImpurityCalculator, RegressionImpurityCalculator};
pub(crate) use crate::tree::model::Tree;
pub(crate) use crate::tree::split::{ExhaustiveSplitSearcher, RandomSplitSearcher};
pub(crate) use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
pub(crate) use rand::prelude::*;
pub(crate) use rayon::prelude::*;

/// Extremely randomized trees learner
pub mod extra_trees;
/// Gradient boosting regression learner
pub mod gradient_boosting;
/// Random forest learner
pub mod random_forest;

pub use extra_trees::*;
pub use gradient_boosting::*;
pub use random_forest::*;

/// Shared hyperparameters for the bagged forest learners (`RandomForest`, `ExtraTrees`).
///
/// # Fields
///
/// - `n_estimators` - Number of trees in the ensemble. Must be at least 1.
/// - `max_depth` - Maximum depth of each tree; `None` grows until the other stopping rules fire.
/// - `min_split_size` - Minimum number of samples required on each side of a split. Must be at least 1.
/// - `min_information_gain` - Minimum information gain required for a split. Must be positive.
/// - `features_per_split` - Number of random features examined per split. If `None`, defaults to `sqrt(n_features)` for classification and `n_features / 3` for regression (at least 1).
/// - `sub_sample_ratio` - Fraction of rows bootstrap-sampled (with replacement) per tree, in `(0, 1]`.
/// - `random_state` - Seed for the master random generator. If `None`, a non-deterministic seed is used.
/// - `run_parallel` - Build trees on the rayon thread pool. Has no effect on the result: per-tree generators are derived before dispatch.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_split_size: usize,
    pub min_information_gain: f64,
    pub features_per_split: Option<usize>,
    pub sub_sample_ratio: f64,
    pub random_state: Option<u64>,
    pub run_parallel: bool,
}

/// Default forest hyperparameters: 100 trees, no depth limit, minimum split
/// side of 1, information gain threshold 1e-6, task-dependent feature subset
/// size, full bootstrap ratio, non-deterministic seed, parallel construction.
impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_split_size: 1,
            min_information_gain: 1e-6,
            features_per_split: None,
            sub_sample_ratio: 1.0,
            random_state: None,
            run_parallel: true,
        }
    }
}

impl AsRef<ForestParams> for ForestParams {
    fn as_ref(&self) -> &ForestParams {
        self
    }
}

/// Validates forest hyperparameters eagerly at learner construction.
pub(crate) fn validate_forest_params(params: &ForestParams) -> Result<(), ModelError> {
    if params.n_estimators < 1 {
        return Err(ModelError::InputValidationError(
            "n_estimators must be at least 1".to_string(),
        ));
    }

    if params.min_split_size < 1 {
        return Err(ModelError::InputValidationError(
            "min_split_size must be at least 1".to_string(),
        ));
    }

    if params.min_information_gain <= 0.0 {
        return Err(ModelError::InputValidationError(
            "min_information_gain must be larger than 0".to_string(),
        ));
    }

    if params.features_per_split == Some(0) {
        return Err(ModelError::InputValidationError(
            "features_per_split must be at least 1".to_string(),
        ));
    }

    if params.sub_sample_ratio <= 0.0 || params.sub_sample_ratio > 1.0 {
        return Err(ModelError::InputValidationError(
            "sub_sample_ratio must be larger than 0.0 and at most 1.0".to_string(),
        ));
    }

    Ok(())
}

/// Task-dependent default for the per-split feature subset size:
/// `sqrt(n_features)` for classification, `n_features / 3` for regression,
/// at least 1 in both cases.
pub(crate) fn default_features_per_split(n_features: usize, is_classifier: bool) -> usize {
    let count = if is_classifier {
        (n_features as f64).sqrt() as usize
    } else {
        n_features / 3
    };
    count.max(1)
}

/// Derives one `(tree index, seed)` pair per ensemble member from the master
/// generator, in a fixed index-ordered single-threaded pass.
///
/// This mapping is computed before any parallel dispatch, so enabling or
/// disabling parallel execution never changes which random stream feeds which
/// tree index.
pub(crate) fn tree_seeds(master: &mut StdRng, n_trees: usize) -> Vec<(usize, u64)> {
    (0..n_trees).map(|index| (index, master.random::<u64>())).collect()
}

/// Draws `sample_size` row indices with replacement (a bootstrap sample).
pub(crate) fn bootstrap_sample(n_rows: usize, sample_size: usize, rng: &mut StdRng) -> Vec<usize> {
    (0..sample_size)
        .map(|_| rng.random_range(0..n_rows))
        .collect()
}

/// Sums the member trees' raw variable importance vectors elementwise.
pub(crate) fn aggregate_variable_importance(trees: &[Tree], n_features: usize) -> Array1<f64> {
    let mut importance = Array1::zeros(n_features);
    for tree in trees {
        importance += tree.get_raw_variable_importance();
    }
    importance
}
