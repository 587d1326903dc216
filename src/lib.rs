/// Error types shared by every learner in the crate.
pub mod error;

pub use error::ModelError;

/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value
/// of the specified field. The generated method includes appropriate documentation
/// describing the field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_n_estimators)
/// - `$field_name` - The name of the field to access (e.g., n_estimators)
/// - `$return_type` - The return type of the getter method
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// A macro that generates a public getter method returning a reference to a field.
///
/// This macro creates a method that provides immutable reference access to a private field
/// in a struct, following the Rust convention of getter methods.
///
/// # Parameters
///
/// - `$method_name` - The identifier for the generated getter method name
/// - `$field_name` - The identifier of the struct field to access
/// - `$return_type` - The type expression for the return value (typically a reference type like `&Type`)
macro_rules! get_field_as_ref {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field as a reference")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name.as_ref()
        }
    };
}

/// Module `tree` contains the decision tree subsystem: impurity calculators,
/// split searchers, the depth-first tree builder and the public `DecisionTree` learner.
///
/// # Core Components
///
/// - `Interval` - Immutable half-open index range used to address slices of
///   ordered feature indices during split search
/// - `ImpurityCalculator` - Trait with `RegressionImpurityCalculator` (variance
///   reduction) and `GiniImpurityCalculator` (class counts) variants, updated
///   incrementally while a split candidate sweeps left to right
/// - `SplitSearcher` - Trait with `ExhaustiveSplitSearcher` (every distinct value
///   boundary) and `RandomSplitSearcher` (one uniform random threshold, used by
///   extremely randomized trees) variants
/// - `DepthFirstTreeBuilder` - Grows one tree depth-first into a flat node arena,
///   accumulating per-feature variable importance as splits are accepted
/// - `DecisionTree` - Public learner for classification and regression; computes
///   per-feature ordered row indices once per fit and supports learning against
///   an arbitrary row-index subset (with repeats) for bootstrap callers
///
/// # Example
/// ```rust
/// use grove::tree::{DecisionTree, DecisionTreeParams};
/// use ndarray::array;
///
/// let x = array![[1.0, 2.0], [2.0, 3.0], [3.0, 1.0], [4.0, 4.0]];
/// let y = array![0.0, 0.0, 1.0, 1.0];
///
/// let mut tree = DecisionTree::new(true, Some(DecisionTreeParams::default())).unwrap();
/// tree.fit(x.view(), y.view()).unwrap();
/// let predictions = tree.predict(x.view()).unwrap();
/// ```
pub mod tree;

/// Module `ensemble` provides tree ensemble learners built on top of the `tree` module.
///
/// # Learners
///
/// - `RandomForest` - Bootstrap-sampled trees with random feature subsets per split,
///   averaged (regression) or majority-voted via averaged class distributions
///   (classification)
/// - `ExtraTrees` - As `RandomForest`, but split thresholds are drawn uniformly at
///   random within each feature's observed range (extremely randomized trees)
/// - `GradientBoosting` - Sequential additive regression ensemble fitted stage-wise
///   on the negative gradient of a configurable loss function
///
/// # Reproducibility
///
/// Every ensemble derives one dedicated random generator per tree from a master
/// generator in a fixed, index-ordered pass before any parallel dispatch, so a
/// fixed `random_state` produces bit-identical ensembles whether trees are built
/// sequentially or in parallel.
///
/// # Example
/// ```rust
/// use grove::ensemble::{RandomForest, ForestParams};
/// use ndarray::array;
///
/// let x = array![[1.0, 2.0], [2.0, 3.0], [8.0, 9.0], [9.0, 8.0]];
/// let y = array![0.0, 0.0, 1.0, 1.0];
///
/// let params = ForestParams {
///     n_estimators: 20,
///     random_state: Some(42),
///     ..Default::default()
/// };
/// let mut forest = RandomForest::new(true, Some(params)).unwrap();
/// forest.fit(x.view(), y.view()).unwrap();
/// let predictions = forest.predict(x.view()).unwrap();
/// ```
pub mod ensemble;

/// Evaluation metrics used by the crate's tests and downstream consumers.
///
/// # Functions
///
/// - `mean_squared_error` - Average of squared differences between predicted and actual values
/// - `root_mean_squared_error` - Square root of MSE, providing error in original data units
/// - `mean_absolute_error` - Average magnitude of prediction errors
/// - `r2_score` - Coefficient of determination measuring explained variance
/// - `accuracy` - Fraction of predicted labels matching the ground truth
pub mod metric;

/// A convenience module that re-exports the most commonly used types from this crate.
///
/// # Example
/// ```rust
/// use grove::prelude::*;
/// ```
pub mod prelude;
