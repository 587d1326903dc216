use super::*;
use super::random_forest::argmax;

/// Extremely randomized trees for classification and regression tasks.
///
/// Takes the randomization of a random forest one step further: besides
/// bootstrap row sampling and per-split random feature subsets, the split
/// threshold itself is drawn uniformly at random within each candidate
/// feature's observed value range instead of being searched exhaustively.
/// This trades per-split optimality for speed and ensemble diversity.
///
/// The reproducibility contract is identical to `RandomForest`: per-tree
/// generators are derived from the master generator in index order before any
/// parallel dispatch, so a fixed `random_state` produces bit-identical
/// ensembles with `run_parallel` on or off.
///
/// # Fields
///
/// - `params` - Shared forest hyperparameters.
/// - `is_classifier` - Whether this ensemble performs classification (`true`) or regression (`false`).
/// - `trees` - Fitted member trees, in tree-index order, or `None` if not yet fitted.
/// - `raw_variable_importance` - Elementwise sum of the member trees' importance vectors.
/// - `n_features` - Number of features in the training data.
/// - `n_classes` - For classification, the number of distinct classes. `None` for regression.
///
/// # Example
/// ```rust
/// use grove::ensemble::{ExtraTrees, ForestParams};
/// use ndarray::array;
///
/// let x = array![[1.0, 2.0], [1.2, 1.8], [8.0, 9.0], [8.2, 9.1]];
/// let y = array![1.5, 1.4, 9.1, 9.3];
///
/// let params = ForestParams {
///     n_estimators: 50,
///     random_state: Some(42),
///     ..Default::default()
/// };
/// let mut ensemble = ExtraTrees::new(false, Some(params)).unwrap();
/// ensemble.fit(x.view(), y.view()).unwrap();
/// let predictions = ensemble.predict(x.view()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ExtraTrees {
    params: ForestParams,
    is_classifier: bool,
    trees: Option<Vec<Tree>>,
    raw_variable_importance: Option<Array1<f64>>,
    n_features: usize,
    n_classes: Option<usize>,
}

/// Default extremely randomized trees: regression task with default forest hyperparameters.
impl Default for ExtraTrees {
    fn default() -> Self {
        Self {
            params: ForestParams::default(),
            is_classifier: false,
            trees: None,
            raw_variable_importance: None,
            n_features: 0,
            n_classes: None,
        }
    }
}

impl ExtraTrees {
    /// Creates a new extremely randomized trees learner.
    ///
    /// # Parameters
    ///
    /// - `is_classifier` - `true` for classification tasks, `false` for regression tasks.
    /// - `params` - Optional hyperparameters. If `None`, default parameters are used.
    ///
    /// # Returns
    ///
    /// * `Result<ExtraTrees, ModelError>` - A new unfitted instance, or an `InputValidationError` for malformed hyperparameters.
    pub fn new(is_classifier: bool, params: Option<ForestParams>) -> Result<Self, ModelError> {
        let params = params.unwrap_or_default();
        validate_forest_params(&params)?;

        Ok(Self {
            params,
            is_classifier,
            trees: None,
            raw_variable_importance: None,
            n_features: 0,
            n_classes: None,
        })
    }

    // Getters
    get_field!(get_is_classifier, is_classifier, bool);
    get_field!(get_n_features, n_features, usize);
    get_field!(get_n_classes, n_classes, Option<usize>);
    get_field_as_ref!(get_parameters, params, &ForestParams);
    get_field_as_ref!(get_trees, trees, Option<&Vec<Tree>>);

    /// Trains the ensemble on the provided training data.
    ///
    /// # Parameters
    ///
    /// - `x` - Training features as a 2D array with shape (n_samples, n_features).
    /// - `y` - Training targets as a 1D array with shape (n_samples,). For classification,
    ///   labels must be non-negative integers starting from 0.
    ///
    /// # Returns
    ///
    /// * `Result<&mut Self, ModelError>` - A mutable reference to `self` for method chaining, or a `ModelError` if training fails. A failure inside any tree's construction aborts the whole fit.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<&mut Self, ModelError> {
        preliminary_check(&x, Some(&y))?;

        self.n_features = x.ncols();
        let n_classes = if self.is_classifier {
            let n_classes = verify_class_labels(y)?;
            self.n_classes = Some(n_classes);
            Some(n_classes)
        } else {
            None
        };

        let ordered = ordered_feature_indices(&x);
        let ordered = &ordered;

        let features_per_split = self
            .params
            .features_per_split
            .unwrap_or_else(|| default_features_per_split(x.ncols(), self.is_classifier))
            .min(x.ncols());

        let sample_size = ((self.params.sub_sample_ratio * x.nrows() as f64).round() as usize).max(1);

        let mut master = match self.params.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let seeds = tree_seeds(&mut master, self.params.n_estimators);

        let build_tree = |&(index, seed): &(usize, u64)| -> Result<(usize, Tree), ModelError> {
            let mut rng = StdRng::seed_from_u64(seed);
            let tree_indices = bootstrap_sample(x.nrows(), sample_size, &mut rng);

            let searcher = RandomSplitSearcher::new(
                self.params.min_split_size,
                self.params.min_information_gain,
            );

            let tree = match n_classes {
                Some(n_classes) => DepthFirstTreeBuilder::new(
                    self.params.max_depth,
                    Some(features_per_split),
                    searcher,
                    GiniImpurityCalculator::new(n_classes),
                    rng,
                )
                .build(x, y, &tree_indices, ordered)?,
                None => DepthFirstTreeBuilder::new(
                    self.params.max_depth,
                    Some(features_per_split),
                    searcher,
                    RegressionImpurityCalculator::new(),
                    rng,
                )
                .build(x, y, &tree_indices, ordered)?,
            };

            Ok((index, tree))
        };

        let mut results: Vec<(usize, Tree)> = if self.params.run_parallel {
            seeds.par_iter().map(build_tree).collect::<Result<_, _>>()?
        } else {
            seeds.iter().map(build_tree).collect::<Result<_, _>>()?
        };

        results.sort_by_key(|&(index, _)| index);
        let trees: Vec<Tree> = results.into_iter().map(|(_, tree)| tree).collect();

        self.raw_variable_importance = Some(aggregate_variable_importance(&trees, x.ncols()));
        self.trees = Some(trees);
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
    /// * `Result<f64, ModelError>` - The predicted value (majority-vote class label for classification, averaged value for regression), or a `ModelError` if prediction fails.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        let trees = self.trees.as_ref().ok_or(ModelError::NotFitted)?;

        if x.len() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let row = ArrayView1::from(x);
        if self.is_classifier {
            let distribution = self.average_distribution(trees, row)?;
            Ok(argmax(&distribution) as f64)
        } else {
            let sum: f64 = trees.iter().map(|tree| tree.predict_row(row)).sum();
            Ok(sum / trees.len() as f64)
        }
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
        let trees = self.trees.as_ref().ok_or(ModelError::NotFitted)?;

        if x.ncols() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let predictions: Result<Vec<f64>, ModelError> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| {
                if self.is_classifier {
                    let distribution = self.average_distribution(trees, row)?;
                    Ok(argmax(&distribution) as f64)
                } else {
                    let sum: f64 = trees.iter().map(|tree| tree.predict_row(row)).sum();
                    Ok(sum / trees.len() as f64)
                }
            })
            .collect();

        Ok(Array1::from_vec(predictions?))
    }

    /// Trains the ensemble on training data and immediately makes predictions on test data.
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

    /// Predicts class probabilities for multiple samples (classification only).
    ///
    /// # Parameters
    ///
    /// * `x` - Feature matrix as a 2D array with shape (n_samples, n_features).
    ///
    /// # Returns
    ///
    /// * `Result<Array2<f64>, ModelError>` - A 2D array of class probabilities with shape (n_samples, n_classes), or a `ModelError` if prediction fails.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        if !self.is_classifier {
            return Err(ModelError::TreeError(
                "predict_proba is only available for classification",
            ));
        }

        let trees = self.trees.as_ref().ok_or(ModelError::NotFitted)?;

        if x.ncols() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let n_classes = self.n_classes.ok_or(ModelError::NotFitted)?;

        let distributions: Result<Vec<Vec<f64>>, ModelError> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| self.average_distribution(trees, row))
            .collect();
        let distributions = distributions?;

        let mut result = Array2::zeros((x.nrows(), n_classes));
        for (i, distribution) in distributions.iter().enumerate() {
            for (j, &p) in distribution.iter().enumerate() {
                result[[i, j]] = p;
            }
        }

        Ok(result)
    }

    /// Returns the ensemble's per-feature raw variable importance: the
    /// elementwise sum of the member trees' importance vectors.
    ///
    /// # Returns
    ///
    /// * `Result<&Array1<f64>, ModelError>` - The importance vector, or `NotFitted` before training.
    pub fn get_raw_variable_importance(&self) -> Result<&Array1<f64>, ModelError> {
        self.raw_variable_importance
            .as_ref()
            .ok_or(ModelError::NotFitted)
    }

    /// Averages the member trees' class distributions for one row.
    fn average_distribution(
        &self,
        trees: &[Tree],
        row: ArrayView1<f64>,
    ) -> Result<Vec<f64>, ModelError> {
        let n_classes = self.n_classes.ok_or(ModelError::NotFitted)?;
        let mut distribution = vec![0.0; n_classes];

        for tree in trees {
            let probabilities = tree.predict_proba_row(row)?;
            for (total, p) in distribution.iter_mut().zip(probabilities.iter()) {
                *total += p;
            }
        }

        let count = trees.len() as f64;
        distribution.iter_mut().for_each(|p| *p /= count);
        Ok(distribution)
    }
}
