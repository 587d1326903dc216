use super::*;

/// Loss function minimized by gradient boosting.
///
/// The loss determines both the constant baseline prediction and the
/// pseudo-residuals (negative gradients) each stage's tree is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    /// Squared error. Baseline is the target mean, residual is `target - prediction`.
    SquaredError,
    /// Absolute error. Baseline is the target median, residual is the sign of `target - prediction`.
    AbsoluteError,
}

impl Loss {
    /// Constant prediction minimizing this loss over the targets.
    pub(crate) fn initial_loss(&self, y: ArrayView1<f64>) -> f64 {
        match self {
            Loss::SquaredError => y.sum() / y.len() as f64,
            Loss::AbsoluteError => median(y),
        }
    }

    /// Negative gradient of the loss at one sample, given the current prediction.
    pub(crate) fn negative_gradient(&self, target: f64, prediction: f64) -> f64 {
        match self {
            Loss::SquaredError => target - prediction,
            Loss::AbsoluteError => {
                if target > prediction {
                    1.0
                } else if target < prediction {
                    -1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Median of a non-empty 1D array. Even lengths average the two middle values.
fn median(values: ArrayView1<f64>) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    }
}

/// Hyperparameters for the gradient boosting learner.
///
/// # Fields
///
/// - `iterations` - Number of boosting stages, each adding one tree. Must be at least 1.
/// - `learning_rate` - Shrinkage applied to every tree's contribution. Must be positive.
/// - `max_depth` - Maximum depth of each stage's tree; `None` grows until the other stopping rules fire.
/// - `min_split_size` - Minimum number of samples required on each side of a split. Must be at least 1.
/// - `min_information_gain` - Minimum information gain required for a split. Must be positive.
/// - `sub_sample_ratio` - Fraction of rows sampled (without replacement) per stage, in `(0, 1]`. Values below 1 give stochastic gradient boosting.
/// - `loss` - Loss function to minimize.
/// - `random_state` - Seed for the master random generator. If `None`, a non-deterministic seed is used.
/// - `run_parallel` - Use the rayon thread pool for the per-stage prediction update. The stages themselves are inherently sequential, so this has no effect on the result.
#[derive(Debug, Clone)]
pub struct GradientBoostingParams {
    pub iterations: usize,
    pub learning_rate: f64,
    pub max_depth: Option<usize>,
    pub min_split_size: usize,
    pub min_information_gain: f64,
    pub sub_sample_ratio: f64,
    pub loss: Loss,
    pub random_state: Option<u64>,
    pub run_parallel: bool,
}

/// Default boosting hyperparameters: 100 stages, learning rate 0.1, depth
/// limit 3, minimum split side of 1, information gain threshold 1e-6, no
/// subsampling, squared error loss, non-deterministic seed.
impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            learning_rate: 0.1,
            max_depth: Some(3),
            min_split_size: 1,
            min_information_gain: 1e-6,
            sub_sample_ratio: 1.0,
            loss: Loss::SquaredError,
            random_state: None,
            run_parallel: true,
        }
    }
}

impl AsRef<GradientBoostingParams> for GradientBoostingParams {
    fn as_ref(&self) -> &GradientBoostingParams {
        self
    }
}

/// Validates boosting hyperparameters, returning the first violation found.
fn validate_boosting_params(params: &GradientBoostingParams) -> Result<(), ModelError> {
    if params.iterations < 1 {
        return Err(ModelError::InputValidationError(format!(
            "iterations must be at least 1, got {}",
            params.iterations
        )));
    }

    if params.learning_rate <= 0.0 || !params.learning_rate.is_finite() {
        return Err(ModelError::InputValidationError(format!(
            "learning_rate must be positive, got {}",
            params.learning_rate
        )));
    }

    if params.min_split_size < 1 {
        return Err(ModelError::InputValidationError(format!(
            "min_split_size must be at least 1, got {}",
            params.min_split_size
        )));
    }

    if params.min_information_gain <= 0.0 || !params.min_information_gain.is_finite() {
        return Err(ModelError::InputValidationError(format!(
            "min_information_gain must be positive, got {}",
            params.min_information_gain
        )));
    }

    if params.sub_sample_ratio <= 0.0 || params.sub_sample_ratio > 1.0 {
        return Err(ModelError::InputValidationError(format!(
            "sub_sample_ratio must be in (0, 1], got {}",
            params.sub_sample_ratio
        )));
    }

    Ok(())
}

/// Gradient boosting machine for regression tasks.
///
/// Builds an additive model stage by stage. Each stage fits one regression
/// tree to the negative gradient of the loss at the current predictions, then
/// adds the tree's output, shrunk by the learning rate, to the running
/// predictions. The final model is the constant baseline plus the shrunk sum
/// of all stage trees.
///
/// With `sub_sample_ratio` below 1 each stage's tree is fitted on a random
/// subset of rows drawn without replacement, while the prediction update still
/// covers every row. Stages are sequential by nature; `run_parallel` only
/// parallelizes the per-stage prediction update, so results are identical
/// either way for a fixed `random_state`.
///
/// # Fields
///
/// - `params` - Boosting hyperparameters.
/// - `trees` - Fitted stage trees in stage order, or `None` if not yet fitted.
/// - `initial_loss` - Constant baseline prediction, or `None` if not yet fitted.
/// - `raw_variable_importance` - Elementwise sum of the stage trees' importance vectors.
/// - `n_features` - Number of features in the training data.
///
/// # Example
/// ```rust
/// use grove::ensemble::{GradientBoosting, GradientBoostingParams};
/// use ndarray::array;
///
/// let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
/// let y = array![1.1, 1.9, 3.2, 3.9, 5.1, 6.0];
///
/// let params = GradientBoostingParams {
///     iterations: 50,
///     random_state: Some(42),
///     ..Default::default()
/// };
/// let mut model = GradientBoosting::new(Some(params)).unwrap();
/// model.fit(x.view(), y.view()).unwrap();
/// let predictions = model.predict(x.view()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    params: GradientBoostingParams,
    trees: Option<Vec<Tree>>,
    initial_loss: Option<f64>,
    raw_variable_importance: Option<Array1<f64>>,
    n_features: usize,
}

/// Default gradient boosting machine with default hyperparameters.
impl Default for GradientBoosting {
    fn default() -> Self {
        Self {
            params: GradientBoostingParams::default(),
            trees: None,
            initial_loss: None,
            raw_variable_importance: None,
            n_features: 0,
        }
    }
}

impl GradientBoosting {
    /// Creates a new gradient boosting learner.
    ///
    /// # Parameters
    ///
    /// * `params` - Optional hyperparameters. If `None`, default parameters are used.
    ///
    /// # Returns
    ///
    /// * `Result<GradientBoosting, ModelError>` - A new unfitted instance, or an `InputValidationError` for malformed hyperparameters.
    pub fn new(params: Option<GradientBoostingParams>) -> Result<Self, ModelError> {
        let params = params.unwrap_or_default();
        validate_boosting_params(&params)?;

        Ok(Self {
            params,
            trees: None,
            initial_loss: None,
            raw_variable_importance: None,
            n_features: 0,
        })
    }

    // Getters
    get_field!(get_n_features, n_features, usize);
    get_field!(get_initial_loss, initial_loss, Option<f64>);
    get_field_as_ref!(get_parameters, params, &GradientBoostingParams);
    get_field_as_ref!(get_trees, trees, Option<&Vec<Tree>>);

    /// Returns the shrinkage applied to every stage tree's contribution.
    pub fn get_learning_rate(&self) -> f64 {
        self.params.learning_rate
    }

    /// Trains the model on the provided training data.
    ///
    /// # Parameters
    ///
    /// - `x` - Training features as a 2D array with shape (n_samples, n_features).
    /// - `y` - Training targets as a 1D array with shape (n_samples,).
    ///
    /// # Returns
    ///
    /// * `Result<&mut Self, ModelError>` - A mutable reference to `self` for method chaining, or a `ModelError` if training fails.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<&mut Self, ModelError> {
        preliminary_check(&x, Some(&y))?;

        self.n_features = x.ncols();
        let n_rows = x.nrows();

        let ordered = ordered_feature_indices(&x);

        let mut master = match self.params.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let sample_size = ((self.params.sub_sample_ratio * n_rows as f64).round() as usize).max(1);
        let subsample = sample_size < n_rows;

        let initial_loss = self.params.loss.initial_loss(y);
        let mut predictions = Array1::from_elem(n_rows, initial_loss);
        let mut residuals = Array1::zeros(n_rows);
        let mut all_rows: Vec<usize> = (0..n_rows).collect();

        let mut trees = Vec::with_capacity(self.params.iterations);
        for _ in 0..self.params.iterations {
            for i in 0..n_rows {
                residuals[i] = self.params.loss.negative_gradient(y[i], predictions[i]);
            }

            let rows: &[usize] = if subsample {
                all_rows.shuffle(&mut master);
                all_rows[..sample_size].sort_unstable();
                &all_rows[..sample_size]
            } else {
                &all_rows
            };

            let tree_rng = StdRng::seed_from_u64(master.random::<u64>());
            let tree = DepthFirstTreeBuilder::new(
                self.params.max_depth,
                None,
                ExhaustiveSplitSearcher::new(
                    self.params.min_split_size,
                    self.params.min_information_gain,
                ),
                RegressionImpurityCalculator::new(),
                tree_rng,
            )
            .build(x, residuals.view(), rows, &ordered)?;

            // Every row's running prediction moves, including rows the
            // subsample left out of this stage's tree.
            let learning_rate = self.params.learning_rate;
            if self.params.run_parallel {
                let updates: Vec<f64> = x
                    .axis_iter(Axis(0))
                    .into_par_iter()
                    .map(|row| tree.predict_row(row))
                    .collect();
                for (prediction, update) in predictions.iter_mut().zip(updates) {
                    *prediction += learning_rate * update;
                }
            } else {
                for (prediction, row) in predictions.iter_mut().zip(x.axis_iter(Axis(0))) {
                    *prediction += learning_rate * tree.predict_row(row);
                }
            }

            trees.push(tree);

            if subsample {
                all_rows.sort_unstable();
            }
        }

        self.raw_variable_importance = Some(aggregate_variable_importance(&trees, x.ncols()));
        self.initial_loss = Some(initial_loss);
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
    /// * `Result<f64, ModelError>` - The predicted value, or a `ModelError` if prediction fails.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        let trees = self.trees.as_ref().ok_or(ModelError::NotFitted)?;
        let initial_loss = self.initial_loss.ok_or(ModelError::NotFitted)?;

        if x.len() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let row = ArrayView1::from(x);
        let boosted: f64 = trees.iter().map(|tree| tree.predict_row(row)).sum();
        Ok(initial_loss + self.params.learning_rate * boosted)
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
        let initial_loss = self.initial_loss.ok_or(ModelError::NotFitted)?;

        if x.ncols() != self.n_features {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let predictions: Vec<f64> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| {
                let boosted: f64 = trees.iter().map(|tree| tree.predict_row(row)).sum();
                initial_loss + self.params.learning_rate * boosted
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Trains the model on training data and immediately makes predictions on test data.
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

    /// Returns the model's per-feature raw variable importance: the
    /// elementwise sum of the stage trees' importance vectors.
    ///
    /// # Returns
    ///
    /// * `Result<&Array1<f64>, ModelError>` - The importance vector, or `NotFitted` before training.
    pub fn get_raw_variable_importance(&self) -> Result<&Array1<f64>, ModelError> {
        self.raw_variable_importance
            .as_ref()
            .ok_or(ModelError::NotFitted)
    }
}
