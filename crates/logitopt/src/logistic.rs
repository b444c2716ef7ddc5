//! Warm starts for logistic models.
//!
//! The routines here fit an auxiliary L2-regularised logistic regression and
//! return its parameters, to be used as the starting point of a downstream
//! optimiser. The numerical kernels the downstream objective needs are
//! re-exported from `logitopt-core`.

use logitopt_core::{
    compute::one_hot::assemble_sparse_matrix,
    core::{
        error::{ModelError, OptimizerResult, Result},
        types::{DMatrix, DVector, Scalar},
    },
};
use logitopt_optim::{LinearClassifier, LogisticRegression};

pub use logitopt_core::compute::one_hot::category_offsets;
pub use logitopt_core::core::labels::{preprocess, LabelInfo};
pub use logitopt_core::numerical::logistic::{
    binary_logistic_loss, binary_logistic_loss_grad, log1pexp, multinomial_loss, sigmoid,
};

/// Fits a default [`LogisticRegression`] on `(x, y)` and returns
/// `(coefficients, intercept)`.
///
/// `y` may hold any two distinct values; the larger one is the positive
/// class. The intercept is zero when `fit_intercept` is false.
///
/// # Example
///
/// ```rust
/// use logitopt::logistic::linear_init;
/// use logitopt::prelude::*;
///
/// let x = DMatrix::from_row_slice(4, 1, &[-2.0, -1.0, 1.0, 2.0]);
/// let y = DVector::from_vec(vec![-1.0, -1.0, 1.0, 1.0]);
/// let (coefficients, intercept): (DVector<f64>, f64) = linear_init(&x, &y, true)?;
/// assert!(coefficients[0] > 0.0);
/// assert!(intercept.abs() < 1e-6);
/// # Ok::<(), OptimizerError>(())
/// ```
pub fn linear_init<T: Scalar>(
    x: &DMatrix<T>,
    y: &DVector<T>,
    fit_intercept: bool,
) -> OptimizerResult<(DVector<T>, T)> {
    linear_init_with(&LogisticRegression::default(), x, y, fit_intercept)
}

/// [`linear_init`] with a caller-supplied classifier.
pub fn linear_init_with<T, M>(
    classifier: &M,
    x: &DMatrix<T>,
    y: &DVector<T>,
    fit_intercept: bool,
) -> OptimizerResult<(DVector<T>, T)>
where
    T: Scalar,
    M: LinearClassifier<T>,
{
    let model = classifier.fit(x, y, fit_intercept)?;
    let intercept = if fit_intercept {
        model.intercept
    } else {
        T::zero()
    };
    Ok((model.coefficients, intercept))
}

/// Fits a default [`LogisticRegression`] on one-hot encoded categorical
/// features and returns one coefficient block per feature plus the
/// intercept.
///
/// `x` holds 1-based category codes: column `j` takes values in
/// `1..=n_values[j]`. Block `j` of the result has length `n_values[j]`.
///
/// # Errors
///
/// - [`ModelError::DimensionMismatch`] if `n_values` does not have one entry
///   per column of `x`
/// - [`ModelError::InvalidCategoryCode`] if a code is below 1 or above its
///   feature's cardinality; checked before any fitting
/// - the label errors of [`linear_init`]
pub fn categorical_linear_init<T: Scalar>(
    x: &DMatrix<i64>,
    y: &DVector<T>,
    n_values: &[usize],
    fit_intercept: bool,
) -> OptimizerResult<(Vec<DVector<T>>, T)> {
    categorical_linear_init_with(&LogisticRegression::default(), x, y, n_values, fit_intercept)
}

/// [`categorical_linear_init`] with a caller-supplied classifier.
///
/// Fails with [`ModelError::DimensionMismatch`] when the classifier returns
/// a coefficient count other than `sum(n_values)`.
pub fn categorical_linear_init_with<T, M>(
    classifier: &M,
    x: &DMatrix<i64>,
    y: &DVector<T>,
    n_values: &[usize],
    fit_intercept: bool,
) -> OptimizerResult<(Vec<DVector<T>>, T)>
where
    T: Scalar,
    M: LinearClassifier<T>,
{
    let codes = zero_based_codes(x, n_values)?;
    let design = assemble_sparse_matrix::<T>(&codes, n_values)?;

    let model = classifier.fit(&design, y, fit_intercept)?;
    if model.coefficients.len() != design.ncols() {
        return Err(ModelError::dimension_mismatch(
            format!("{} coefficients", design.ncols()),
            format!("{} coefficients", model.coefficients.len()),
        )
        .into());
    }
    let intercept = if fit_intercept {
        model.intercept
    } else {
        T::zero()
    };

    let blocks = category_offsets(n_values)
        .into_iter()
        .zip(n_values)
        .map(|(start, &width)| model.coefficients.rows(start, width).into_owned())
        .collect();
    Ok((blocks, intercept))
}

/// Validates 1-based codes and shifts them to 0-based.
fn zero_based_codes(x: &DMatrix<i64>, n_values: &[usize]) -> Result<DMatrix<usize>> {
    if n_values.len() != x.ncols() {
        return Err(ModelError::dimension_mismatch(
            format!("{} category counts", x.ncols()),
            format!("{} category counts", n_values.len()),
        ));
    }

    if let Some(code) = x.iter().copied().find(|&code| code < 1) {
        return Err(ModelError::invalid_category_code(format!(
            "categorical values must be >= 1, found {code}"
        )));
    }

    let mut codes = DMatrix::zeros(x.nrows(), x.ncols());
    for (j, &cardinality) in n_values.iter().enumerate() {
        for i in 0..x.nrows() {
            let code = x[(i, j)];
            let zero_based = usize::try_from(code - 1).unwrap_or(usize::MAX);
            if zero_based >= cardinality {
                return Err(ModelError::invalid_category_code(format!(
                    "value {code} of feature {j} exceeds its {cardinality} categories"
                )));
            }
            codes[(i, j)] = zero_based;
        }
    }
    Ok(codes)
}
