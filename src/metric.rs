use ndarray::Data;
use ndarray::prelude::*;

/// Calculates the Mean Squared Error between predicted and actual values.
///
/// Mean Squared Error measures the average of the squared differences between predicted values and ground truth values.
///
/// # Parameters
///
/// - `y_true` - Ground-truth values for each sample
/// - `y_pred` - Predicted values for each sample
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use grove::metric::mean_squared_error;
///
/// let actual = array![3.0, -0.5, 2.0, 7.0];
/// let predicted = array![2.5, 0.0, 2.1, 7.8];
/// let mse = mean_squared_error(&actual, &predicted);
/// // MSE = ((3.0 - 2.5)^2 + (-0.5 - 0.0)^2 + (2.0 - 2.1)^2 + (7.0 - 7.8)^2) / 4
/// //     = (0.25 + 0.25 + 0.01 + 0.64) / 4 = 0.2875
/// assert!((mse - 0.2875).abs() < 1e-10);
/// ```
///
/// # Returns
///
/// - `f64` - Mean squared error (returns 0.0 when the input arrays are empty)
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn mean_squared_error<S>(y_true: &ArrayBase<S, Ix1>, y_pred: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    if y_true.len() != y_pred.len() {
        panic!(
            "Input arrays must have the same length. Predicted: {}, Actual: {}",
            y_true.len(),
            y_pred.len()
        );
    }

    let n = y_true.len();

    // Handle edge case
    if n == 0 {
        return 0.0;
    }

    let sum_squared_diff = y_true
        .iter()
        .zip(y_pred.iter())
        .fold(0.0, |acc, (&actual, &pred)| {
            let error = actual - pred;
            acc + error * error
        });

    sum_squared_diff / (n as f64)
}

/// Calculates the Root Mean Squared Error (RMSE) between predicted and actual values.
///
/// RMSE is the square root of the Mean Squared Error, giving a metric in the same units as the original data.
///
/// # Parameters
///
/// - `y_true` - Ground-truth values for each sample
/// - `y_pred` - Predicted values for each sample
///
/// # Examples
/// ```rust
/// use grove::metric::root_mean_squared_error;
/// use ndarray::array;
///
/// let actual = array![1.0, 2.0, 3.0];
/// let predicted = array![2.0, 3.0, 4.0];
/// let rmse = root_mean_squared_error(&actual, &predicted);
/// // RMSE = sqrt(((2 - 1)^2 + (3 - 2)^2 + (4 - 3)^2) / 3) = sqrt(3/3) = 1.0
/// assert!((rmse - 1.0).abs() < 1e-6);
/// ```
///
/// # Returns
///
/// - `f64` - Root mean squared error (returns 0.0 when the input arrays are empty)
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn root_mean_squared_error<S>(y_true: &ArrayBase<S, Ix1>, y_pred: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    mean_squared_error(y_true, y_pred).sqrt()
}

/// Calculates the Mean Absolute Error between predicted and actual values.
///
/// # Parameters
///
/// - `y_true` - Ground-truth values for each sample
/// - `y_pred` - Predicted values for each sample
///
/// # Examples
/// ```rust
/// use grove::metric::mean_absolute_error;
/// use ndarray::array;
///
/// let actual = array![3.0, -0.5, 2.0, 7.0];
/// let predicted = array![2.5, 0.0, 2.0, 8.0];
/// let mae = mean_absolute_error(&actual, &predicted);
/// // MAE = (0.5 + 0.5 + 0.0 + 1.0) / 4 = 0.5
/// assert!((mae - 0.5).abs() < 1e-10);
/// ```
///
/// # Returns
///
/// - `f64` - Mean absolute error (returns 0.0 when the input arrays are empty)
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn mean_absolute_error<S>(y_true: &ArrayBase<S, Ix1>, y_pred: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    if y_true.len() != y_pred.len() {
        panic!(
            "Input arrays must have the same length. Predicted: {}, Actual: {}",
            y_true.len(),
            y_pred.len()
        );
    }

    let n = y_true.len();

    if n == 0 {
        return 0.0;
    }

    let sum_abs_diff = y_true
        .iter()
        .zip(y_pred.iter())
        .fold(0.0, |acc, (&actual, &pred)| acc + (actual - pred).abs());

    sum_abs_diff / (n as f64)
}

/// Calculates the coefficient of determination (R²) between predicted and actual values.
///
/// R² measures the proportion of variance in the targets explained by the
/// predictions. A perfect fit scores 1.0, predicting the target mean scores
/// 0.0, and worse-than-mean predictions score below 0.0.
///
/// # Parameters
///
/// - `y_true` - Ground-truth values for each sample
/// - `y_pred` - Predicted values for each sample
///
/// # Examples
/// ```rust
/// use grove::metric::r2_score;
/// use ndarray::array;
///
/// let actual = array![3.0, -0.5, 2.0, 7.0];
/// let predicted = array![2.5, 0.0, 2.0, 8.0];
/// let r2 = r2_score(&actual, &predicted);
/// assert!(r2 > 0.9);
/// ```
///
/// # Returns
///
/// - `f64` - R² score. Returns 0.0 when the input arrays are empty or the targets are constant.
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn r2_score<S>(y_true: &ArrayBase<S, Ix1>, y_pred: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    if y_true.len() != y_pred.len() {
        panic!(
            "Input arrays must have the same length. Predicted: {}, Actual: {}",
            y_true.len(),
            y_pred.len()
        );
    }

    let n = y_true.len();

    if n == 0 {
        return 0.0;
    }

    let mean = y_true.iter().sum::<f64>() / n as f64;

    let (ss_res, ss_tot) = y_true.iter().zip(y_pred.iter()).fold(
        (0.0, 0.0),
        |(res, tot), (&actual, &pred)| {
            let residual = actual - pred;
            let deviation = actual - mean;
            (res + residual * residual, tot + deviation * deviation)
        },
    );

    // Constant targets leave nothing to explain
    if ss_tot == 0.0 {
        return 0.0;
    }

    1.0 - ss_res / ss_tot
}

/// Calculates the fraction of predictions matching the ground-truth labels.
///
/// Predicted and actual labels are compared exactly, so this is intended for
/// classifier outputs holding integer class labels as `f64`.
///
/// # Parameters
///
/// - `y_true` - Ground-truth labels for each sample
/// - `y_pred` - Predicted labels for each sample
///
/// # Examples
/// ```rust
/// use grove::metric::accuracy;
/// use ndarray::array;
///
/// let actual = array![0.0, 1.0, 1.0, 0.0];
/// let predicted = array![0.0, 1.0, 0.0, 0.0];
/// assert!((accuracy(&actual, &predicted) - 0.75).abs() < 1e-10);
/// ```
///
/// # Returns
///
/// - `f64` - Accuracy in `[0, 1]` (returns 0.0 when the input arrays are empty)
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn accuracy<S>(y_true: &ArrayBase<S, Ix1>, y_pred: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    if y_true.len() != y_pred.len() {
        panic!(
            "Input arrays must have the same length. Predicted: {}, Actual: {}",
            y_true.len(),
            y_pred.len()
        );
    }

    let n = y_true.len();

    if n == 0 {
        return 0.0;
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|&(&actual, &pred)| actual == pred)
        .count();

    correct as f64 / n as f64
}
