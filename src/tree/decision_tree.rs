use super::*;
use super::builder::DepthFirstTreeBuilder;
use super::helper_functions::{
    ordered_feature_indices, preliminary_check, verify_class_labels, verify_indices,
};
use super::impurity::{GiniImpurityCalculator, RegressionImpurityCalculator};
use super::model::{Node, Tree};
use super::split::ExhaustiveSplitSearcher;

/// Hyperparameters for controlling decision tree growth and complexity.
///
/// # Fields
///
/// - `max_depth` - Maximum depth of the tree. If `None`, nodes are expanded until the other stopping rules fire; `Some(0)` produces a single leaf.
/// - `min_split_size` - Minimum number of samples required on each side of a split. Must be at least 1.
/// - `min_information_gain` - Minimum information gain required for a split to be accepted. Must be positive.
/// - `features_per_split` - Number of features drawn without replacement per split. If `None`, all features are examined.
/// - `random_state` - Seed for the tree's random generator, used for feature subsets (and randomized thresholds in ensemble callers).
#[derive(Debug, Clone)]
pub struct DecisionTreeParams {
    pub max_depth: Option<usize>,
    pub min_split_size: usize,
    pub min_information_gain: f64,
    pub features_per_split: Option<usize>,
    pub random_state: Option<u64>,
}

/// Default hyperparameters for decision tree.
///
/// Provides sensible defaults: no depth limit (`max_depth = None`), minimum 1 sample per
/// split side (`min_split_size = 1`), a tiny positive gain requirement
/// (`min_information_gain = 1e-6`), all features examined per split
/// (`features_per_split = None`), and no random state (`random_state = None`).
impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_split_size: 1,
            min_information_gain: 1e-6,
            features_per_split: None,
            random_state: None,
        }
    }
}

impl AsRef<DecisionTreeParams> for DecisionTreeParams {
    fn as_ref(&self) -> &DecisionTreeParams {
        self
    }
}

/// Validates tree hyperparameters shared by the single-tree and ensemble learners.
pub(crate) fn validate_tree_params(params: &DecisionTreeParams) -> Result<(), ModelError> {
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

    Ok(())
}

/// Decision tree learner for classification and regression tasks.
///
/// Grows a single binary tree depth-first: per-feature ordered row indices are
/// computed once per fit, an exhaustive split searcher sweeps an incremental
/// impurity calculator (Gini for classification, variance for regression)
/// across every distinct value boundary, and the best split per node wins by
/// information gain with a first-wins tiebreak.
///
/// The fitted tree is an immutable node arena; prediction routes rows with
/// `value <= threshold` to the left child. Per-feature variable importance
/// (summed information gain) is accumulated during growth.
///
/// # Fields
///
/// - `params` - Hyperparameters controlling tree growth and complexity.
/// - `is_classifier` - Whether this tree performs classification (`true`) or regression (`false`).
/// - `tree` - The fitted tree model, or `None` if not yet fitted.
/// - `n_features` - Number of features in the training data.
/// - `n_classes` - For classification, the number of distinct classes. `None` for regression.
///
/// # Example
/// ```rust
/// use grove::tree::{DecisionTree, DecisionTreeParams};
/// use ndarray::array;
///
/// let x_train = array![
///     [5.1, 3.5, 1.4, 0.2],
///     [4.9, 3.0, 1.4, 0.2],
///     [6.2, 2.9, 4.3, 1.3],
///     [5.7, 2.8, 4.1, 1.3],
/// ];
/// let y_train = array![0.0, 0.0, 1.0, 1.0];
///
/// let params = DecisionTreeParams {
///     max_depth: Some(5),
///     ..Default::default()
/// };
///
/// let mut tree = DecisionTree::new(true, Some(params)).unwrap();
/// tree.fit(x_train.view(), y_train.view()).unwrap();
///
/// let x_test = array![[5.0, 3.2, 1.2, 0.2], [6.5, 3.0, 5.2, 2.0]];
/// let predictions = tree.predict(x_test.view()).unwrap();
/// let probabilities = tree.predict_proba(x_test.view()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DecisionTree {
    params: DecisionTreeParams,
    is_classifier: bool,
    tree: Option<Tree>,
    n_features: usize,
    n_classes: Option<usize>,
}

/// Default decision tree: regression task with default hyperparameters.
impl Default for DecisionTree {
    fn default() -> Self {
        Self {
            params: DecisionTreeParams::default(),
            is_classifier: false,
            tree: None,
            n_features: 0,
            n_classes: None,
        }
    }
}

impl DecisionTree {
    /// Creates a new decision tree learner.
    ///
    /// # Parameters
    ///
    /// - `is_classifier` - `true` for classification tasks, `false` for regression tasks.
    /// - `params` - Optional hyperparameters. If `None`, default parameters are used.
    ///
    /// # Returns
    ///
    /// * `Result<DecisionTree, ModelError>` - A new untrained instance, or an `InputValidationError` for malformed hyperparameters.
    pub fn new(is_classifier: bool, params: Option<DecisionTreeParams>) -> Result<Self, ModelError> {
        let params = params.unwrap_or_default();
        validate_tree_params(&params)?;

        Ok(Self {
            params,
            is_classifier,
            tree: None,
            n_features: 0,
            n_classes: None,
        })
    }

    // Getters
    get_field!(get_is_classifier, is_classifier, bool);
    get_field!(get_n_features, n_features, usize);
    get_field!(get_n_classes, n_classes, Option<usize>);
    get_field_as_ref!(get_parameters, params, &DecisionTreeParams);
    get_field_as_ref!(get_tree, tree, Option<&Tree>);

    /// Trains the decision tree on the provided training data.
    ///
    /// # Parameters
    ///
    /// - `x` - Training features as a 2D array with shape (n_samples, n_features).
    /// - `y` - Training targets as a 1D array with shape (n_samples,). For classification,
    ///   labels must be non-negative integers starting from 0.
    ///
    /// # Returns
    ///
    /// * `Result<&mut Self, ModelError>` - A mutable reference to `self` for method chaining, or a `ModelError` if training fails.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<&mut Self, ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.fit_with_indices(x, y, &indices)
    }

    /// Trains the decision tree on an arbitrary row-index subset of the data.
    ///
    /// Repeated indices are allowed, which is how bootstrap callers learn a
    /// tree against a sample drawn with replacement. The per-feature ordered
    /// indices are still computed against the full matrix; split search
    /// restricts attention to the subset via membership filtering rather than
    /// re-sorting.
    ///
    /// # Parameters
    ///
    /// - `x` - Training features as a 2D array with shape (n_samples, n_features).
    /// - `y` - Training targets aligned to the full matrix rows.
    /// - `indices` - Row indices to learn on, repeats allowed.
    ///
    /// # Returns
    ///
    /// * `Result<&mut Self, ModelError>` - A mutable reference to `self`, or a `ModelError` if training fails.
    pub fn fit_with_indices(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
    ) -> Result<&mut Self, ModelError> {
        preliminary_check(&x, Some(&y))?;
        verify_indices(indices, x.nrows())?;

        self.n_features = x.ncols();

        let rng = match self.params.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let ordered = ordered_feature_indices(&x);
        let searcher = ExhaustiveSplitSearcher::new(
            self.params.min_split_size,
            self.params.min_information_gain,
        );

        let tree = if self.is_classifier {
            let n_classes = verify_class_labels(y)?;
            self.n_classes = Some(n_classes);

            let mut builder = DepthFirstTreeBuilder::new(
                self.params.max_depth,
                self.params.features_per_split,
                searcher,
                GiniImpurityCalculator::new(n_classes),
                rng,
            );
            builder.build(x, y, indices, &ordered)?
        } else {
            let mut builder = DepthFirstTreeBuilder::new(
                self.params.max_depth,
                self.params.features_per_split,
                searcher,
                RegressionImpurityCalculator::new(),
                rng,
            );
            builder.build(x, y, indices, &ordered)?
        };

        self.tree = Some(tree);
        Ok(self)
    }

    /// Predicts the output for a single sample.
    ///
    /// # Parameters
    ///
    /// * `x` - Feature vector for a single sample as a slice of length `n_features`.
    ///
    /// # Returns
    ///
    /// * `Result<f64, ModelError>` - The predicted value (class label for classification, continuous value for regression), or a `ModelError` if prediction fails.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        let tree = self.tree.as_ref().ok_or(ModelError::NotFitted)?;

        if x.len() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        Ok(tree.predict_row(ArrayView1::from(x)))
    }

    /// Predicts outputs for multiple samples using parallel processing.
    ///
    /// # Parameters
    ///
    /// * `x` - Feature matrix as a 2D array with shape (n_samples, n_features).
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - A 1D array of predicted values with shape (n_samples,), or a `ModelError` if prediction fails.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let tree = self.tree.as_ref().ok_or(ModelError::NotFitted)?;

        if x.ncols() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let predictions: Vec<f64> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| tree.predict_row(row))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Trains the tree on training data and immediately makes predictions on test data.
    ///
    /// # Parameters
    ///
    /// - `x_train` - Training features as a 2D array with shape (n_train_samples, n_features).
    /// - `y_train` - Training targets as a 1D array with shape (n_train_samples,).
    /// - `x_test` - Test features as a 2D array with shape (n_test_samples, n_features).
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - A 1D array of predictions for the test data, or a `ModelError` if training or prediction fails.
    pub fn fit_predict(
        &mut self,
        x_train: ArrayView2<f64>,
        y_train: ArrayView1<f64>,
        x_test: ArrayView2<f64>,
    ) -> Result<Array1<f64>, ModelError> {
        self.fit(x_train, y_train)?;
        self.predict(x_test)
    }

    /// Predicts class probabilities for multiple samples using parallel processing (classification only).
    ///
    /// # Parameters
    ///
    /// * `x` - Feature matrix as a 2D array with shape (n_samples, n_features).
    ///
    /// # Returns
    ///
    /// * `Result<Array2<f64>, ModelError>` - A 2D array of class probabilities with shape (n_samples, n_classes), where each row sums to 1.0, or a `ModelError` if prediction fails.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        if !self.is_classifier {
            return Err(ModelError::TreeError(
                "predict_proba is only available for classification",
            ));
        }

        let tree = self.tree.as_ref().ok_or(ModelError::NotFitted)?;

        if x.ncols() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let n_classes = self.n_classes.ok_or(ModelError::NotFitted)?;

        let probabilities: Result<Vec<Vec<f64>>, ModelError> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| tree.predict_proba_row(row))
            .collect();
        let probabilities = probabilities?;

        let mut result = Array2::zeros((x.nrows(), n_classes));
        for (i, proba) in probabilities.iter().enumerate() {
            for (j, &p) in proba.iter().enumerate() {
                result[[i, j]] = p;
            }
        }

        Ok(result)
    }

    /// Predicts class probabilities for a single sample (classification only).
    ///
    /// # Parameters
    ///
    /// * `x` - Feature vector for a single sample as a slice of length `n_features`.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<f64>, ModelError>` - A vector of class probabilities of length `n_classes` that sums to 1.0, or a `ModelError` if prediction fails.
    pub fn predict_proba_one(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        if !self.is_classifier {
            return Err(ModelError::TreeError(
                "predict_proba is only available for classification",
            ));
        }

        let tree = self.tree.as_ref().ok_or(ModelError::NotFitted)?;

        if x.len() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        tree.predict_proba_row(ArrayView1::from(x))
    }

    /// Returns the per-feature raw variable importance of the fitted tree.
    ///
    /// Each entry is the sum of information gain attributable to that feature
    /// across all splits in the tree.
    ///
    /// # Returns
    ///
    /// * `Result<&Array1<f64>, ModelError>` - The importance vector, or `NotFitted` before training.
    pub fn get_raw_variable_importance(&self) -> Result<&Array1<f64>, ModelError> {
        self.tree
            .as_ref()
            .map(|tree| tree.get_raw_variable_importance())
            .ok_or(ModelError::NotFitted)
    }

    /// Generates a human-readable string representation of the decision tree structure.
    ///
    /// Internal nodes show their split condition, leaf nodes show their
    /// prediction, with ASCII branch characters for the hierarchy.
    ///
    /// # Returns
    ///
    /// * `Result<String, ModelError>` - A formatted string containing the tree structure, or a `ModelError::NotFitted` if the model hasn't been trained yet.
    pub fn generate_tree_structure(&self) -> Result<String, ModelError> {
        let tree = self.tree.as_ref().ok_or(ModelError::NotFitted)?;

        let mut output = String::new();
        output.push_str("Decision Tree Structure:\n");
        self.print_node(tree, 0, &mut output, "", true);
        Ok(output)
    }

    // Recursively print tree structure
    fn print_node(&self, tree: &Tree, index: usize, output: &mut String, prefix: &str, is_last: bool) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}", prefix, connector));

        match &tree.get_nodes()[index] {
            Node::Leaf {
                value,
                probabilities,
            } => {
                if self.is_classifier {
                    output.push_str(&format!("Leaf: class={}", *value as usize));
                    if let Some(probs) = probabilities {
                        output.push_str(&format!(" probs={:?}", probs));
                    }
                } else {
                    output.push_str(&format!("Leaf: value={:.4}", value));
                }
                output.push('\n');
            }
            Node::Split {
                feature_index,
                threshold,
                left,
                right,
            } => {
                output.push_str(&format!(
                    "Split: feature[{}] <= {:.4}\n",
                    feature_index, threshold
                ));

                let new_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                self.print_node(tree, *left, output, &new_prefix, false);
                self.print_node(tree, *right, output, &new_prefix, true);
            }
        }
    }
}
