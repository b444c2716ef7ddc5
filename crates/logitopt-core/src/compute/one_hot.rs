//! One-hot encoding of categorical features.
//!
//! Feature `j` with cardinality `K_j` owns the column block
//! `[offset_j, offset_j + K_j)` of the encoded matrix, where the offsets are
//! the exclusive cumulative sum of the cardinalities. A sample with code `c`
//! (0-based) for feature `j` has a single 1 in column `offset_j + c`.

use crate::{
    compute::sparse::CsrMatrix,
    core::{
        error::{ModelError, Result},
        types::{DMatrix, Scalar},
    },
};

/// Start column of every feature block: `[0, K_0, K_0 + K_1, ...]`.
pub fn category_offsets(n_values: &[usize]) -> Vec<usize> {
    n_values
        .iter()
        .scan(0, |acc, &k| {
            let start = *acc;
            *acc += k;
            Some(start)
        })
        .collect()
}

/// Builds the sparse one-hot design matrix of 0-based categorical codes.
///
/// The result has shape `(x.nrows(), sum(n_values))` and exactly one stored
/// 1 per feature block per row.
///
/// # Errors
///
/// - [`ModelError::DimensionMismatch`] if `n_values` does not have one entry
///   per column of `x`
/// - [`ModelError::InvalidCategoryCode`] if a code is not below its
///   feature's cardinality
pub fn assemble_sparse_matrix<T: Scalar>(
    x: &DMatrix<usize>,
    n_values: &[usize],
) -> Result<CsrMatrix<T>> {
    let (n_samples, n_features) = x.shape();
    if n_values.len() != n_features {
        return Err(ModelError::dimension_mismatch(
            format!("{n_features} category counts"),
            format!("{} category counts", n_values.len()),
        ));
    }

    let offsets = category_offsets(n_values);
    let n_columns: usize = n_values.iter().sum();

    let mut rows = Vec::with_capacity(n_samples * n_features);
    let mut cols = Vec::with_capacity(n_samples * n_features);
    for i in 0..n_samples {
        for j in 0..n_features {
            let code = x[(i, j)];
            if code >= n_values[j] {
                return Err(ModelError::invalid_category_code(format!(
                    "code {code} at row {i}, feature {j} is outside 0..{}",
                    n_values[j]
                )));
            }
            rows.push(i);
            cols.push(offsets[j] + code);
        }
    }
    let data = vec![T::one(); rows.len()];

    CsrMatrix::from_triplets(n_samples, n_columns, &rows, &cols, &data)
}
