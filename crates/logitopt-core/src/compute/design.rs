//! Design matrix abstraction.
//!
//! Solvers only need the two matrix-vector products of a linear model, so
//! dense and sparse feature matrices are used through the same trait.

use crate::{
    compute::sparse::CsrMatrix,
    core::{
        error::{ModelError, Result},
        types::{DMatrix, DVector, Scalar},
    },
};
use std::fmt::Debug;

/// A feature matrix with `nrows` samples and `ncols` features.
pub trait DesignMatrix<T: Scalar>: Debug {
    /// Number of samples.
    fn nrows(&self) -> usize;

    /// Number of features.
    fn ncols(&self) -> usize;

    /// Computes `X w`.
    fn mul_vec(&self, w: &DVector<T>) -> Result<DVector<T>>;

    /// Computes `Xᵀ r`.
    fn tr_mul_vec(&self, r: &DVector<T>) -> Result<DVector<T>>;
}

impl<T: Scalar> DesignMatrix<T> for DMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }

    fn ncols(&self) -> usize {
        self.ncols()
    }

    fn mul_vec(&self, w: &DVector<T>) -> Result<DVector<T>> {
        if w.len() != self.ncols() {
            return Err(ModelError::dimension_mismatch(
                format!("vector length {}", self.ncols()),
                format!("vector length {}", w.len()),
            ));
        }
        Ok(self * w)
    }

    fn tr_mul_vec(&self, r: &DVector<T>) -> Result<DVector<T>> {
        if r.len() != self.nrows() {
            return Err(ModelError::dimension_mismatch(
                format!("vector length {}", self.nrows()),
                format!("vector length {}", r.len()),
            ));
        }
        Ok(self.tr_mul(r))
    }
}

impl<T: Scalar> DesignMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }

    fn ncols(&self) -> usize {
        self.ncols()
    }

    fn mul_vec(&self, w: &DVector<T>) -> Result<DVector<T>> {
        let mut out = DVector::zeros(self.nrows());
        self.spmv(w, &mut out)?;
        Ok(out)
    }

    fn tr_mul_vec(&self, r: &DVector<T>) -> Result<DVector<T>> {
        let mut out = DVector::zeros(self.ncols());
        self.spmv_transpose(r, &mut out)?;
        Ok(out)
    }
}
