use super::*;
use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// Performs validation checks on the input data matrices.
///
/// This function validates that:
/// - The input data matrix is not empty
/// - The input data does not contain NaN or infinite values
/// - When a target vector is provided:
///   - The target vector is not empty
///   - The target vector length matches the number of rows in the input data
///
/// # Parameters
///
/// - `x` - A 2D array of feature values where rows represent samples and columns represent features
/// - `y` - An optional 1D array representing the target variables or labels corresponding to each sample
///
/// # Returns
///
/// - `Ok(())` - If all validation checks pass
/// - `Err(ModelError::InputValidationError)` - If any validation check fails, with an informative error message
pub(crate) fn preliminary_check<S, T>(
    x: &ArrayBase<S, Ix2>,
    y: Option<&ArrayBase<T, Ix1>>,
) -> Result<(), ModelError>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(ModelError::InputValidationError(
            "Input data is empty".to_string(),
        ));
    }

    for (i, row) in x.outer_iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            if val.is_nan() || val.is_infinite() {
                return Err(ModelError::InputValidationError(format!(
                    "Input data contains NaN or infinite value at position [{}][{}]",
                    i, j
                )));
            }
        }
    }

    if let Some(y) = y {
        if y.len() == 0 {
            return Err(ModelError::InputValidationError(
                "Target vector is empty".to_string(),
            ));
        }

        if y.len() != x.nrows() {
            return Err(ModelError::InputValidationError(format!(
                "Input data and target vector have different lengths, x rows: {}, y length: {}",
                x.nrows(),
                y.len()
            )));
        }

        if let Some(bad) = y.iter().find(|v| v.is_nan() || v.is_infinite()) {
            return Err(ModelError::InputValidationError(format!(
                "Target vector contains NaN or infinite value: {}",
                bad
            )));
        }
    }

    Ok(())
}

/// Validates a row-index subset against the matrix it addresses.
///
/// Repeated indices are allowed (bootstrap samples), out-of-range indices are not.
pub(crate) fn verify_indices(indices: &[usize], n_rows: usize) -> Result<(), ModelError> {
    if indices.is_empty() {
        return Err(ModelError::InputValidationError(
            "Row index subset cannot be empty".to_string(),
        ));
    }

    if let Some(&bad) = indices.iter().find(|&&i| i >= n_rows) {
        return Err(ModelError::InputValidationError(format!(
            "Row index {} is out of range for a matrix with {} rows",
            bad, n_rows
        )));
    }

    Ok(())
}

/// Validates classification targets: non-negative integers encoded as `f64`.
///
/// # Returns
///
/// - `Ok(usize)` - The number of classes (max label + 1)
/// - `Err(ModelError::InputValidationError)` - If a label is negative or fractional
pub(crate) fn verify_class_labels(y: ArrayView1<f64>) -> Result<usize, ModelError> {
    let mut max_class = 0.0_f64;
    for &label in y.iter() {
        if label < 0.0 || label.fract() != 0.0 {
            return Err(ModelError::InputValidationError(format!(
                "Class labels must be non-negative integers, got {}",
                label
            )));
        }
        max_class = max_class.max(label);
    }

    Ok(max_class as usize + 1)
}

/// Computes the per-feature ordered row indices: for each column, a
/// permutation of `[0, n_rows)` sorted ascending by that column's value.
///
/// Computed once per learner invocation and shared read-only by every tree
/// grown against the same matrix.
pub(crate) fn ordered_feature_indices(x: &ArrayView2<f64>) -> Vec<Vec<usize>> {
    (0..x.ncols())
        .map(|feature| {
            let mut indices: Vec<usize> = (0..x.nrows()).collect();
            // Stable sort keeps ties in row order, NaN is rejected upstream.
            indices.sort_by(|&a, &b| x[[a, feature]].partial_cmp(&x[[b, feature]]).unwrap());
            indices
        })
        .collect()
}
