//! Binary logistic loss and its derivative.
//!
//! For labels `y_i ∈ {-1, +1}` and linear outputs `o_i = <w, x_i> + b` the
//! logistic loss of a sample is
//!
//! ```text
//! ℓ(o_i, y_i) = log(1 + exp(-y_i o_i))
//! ```
//!
//! The kernels below return the loss of every sample divided by the sample
//! count `n`, so that summing the output yields the mean loss, and the
//! derivative of that normalised loss with respect to each `o_i`:
//!
//! ```text
//! ∂/∂o_i [ℓ(o_i, y_i) / n] = -y_i / ((1 + exp(y_i o_i)) n)
//! ```
//!
//! Inputs are flattened in storage order, so a column vector, a row vector
//! and an `n × 1` matrix are interchangeable.

use crate::{
    core::{
        error::{ModelError, Result},
        types::{DVector, Scalar},
    },
    numerical::stability::{log1pexp_scalar, sigmoid_scalar},
};
use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, Matrix, OMatrix, RawStorage};
use num_traits::Float;

/// Element-wise `log(1 + e^x)`.
///
/// The output has the shape of the input; every entry is `>= 0`.
pub fn log1pexp<T, R, C, S>(x: &Matrix<T, R, C, S>) -> OMatrix<T, R, C>
where
    T: Scalar,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
    DefaultAllocator: Allocator<R, C>,
{
    x.map(log1pexp_scalar::<T>)
}

/// Element-wise logistic function `1 / (1 + e^{-x})`.
pub fn sigmoid<T, R, C, S>(x: &Matrix<T, R, C, S>) -> OMatrix<T, R, C>
where
    T: Scalar,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
    DefaultAllocator: Allocator<R, C>,
{
    x.map(sigmoid_scalar::<T>)
}

fn flat_len(linear_len: usize, labels_len: usize) -> Result<usize> {
    if linear_len != labels_len {
        return Err(ModelError::dimension_mismatch(
            format!("{linear_len} labels, one per linear output"),
            format!("{labels_len} labels"),
        ));
    }
    Ok(linear_len)
}

/// Per-sample logistic losses, each divided by the number of samples.
///
/// Summing the result gives the mean logistic loss of the linear outputs.
///
/// # Errors
///
/// Returns [`ModelError::DimensionMismatch`] when `linear_o` and `y` do not
/// hold the same number of entries.
pub fn binary_logistic_loss<T, R1, C1, S1, R2, C2, S2>(
    linear_o: &Matrix<T, R1, C1, S1>,
    y: &Matrix<T, R2, C2, S2>,
) -> Result<DVector<T>>
where
    T: Scalar,
    R1: Dim,
    C1: Dim,
    S1: RawStorage<T, R1, C1>,
    R2: Dim,
    C2: Dim,
    S2: RawStorage<T, R2, C2>,
{
    let n = flat_len(linear_o.len(), y.len())?;
    if n == 0 {
        return Ok(DVector::zeros(0));
    }
    let n_samples = <T as Scalar>::from_usize(n);
    Ok(DVector::from_iterator(
        n,
        linear_o
            .iter()
            .zip(y.iter())
            .map(|(&o, &label)| log1pexp_scalar(-label * o) / n_samples),
    ))
}

/// Derivative of [`binary_logistic_loss`] with respect to each linear output.
///
/// For extreme margins `exp(y_i o_i)` overflows to infinity and the entry
/// becomes zero, which is the correct limit.
///
/// # Errors
///
/// Returns [`ModelError::DimensionMismatch`] when `linear_o` and `y` do not
/// hold the same number of entries.
pub fn binary_logistic_loss_grad<T, R1, C1, S1, R2, C2, S2>(
    linear_o: &Matrix<T, R1, C1, S1>,
    y: &Matrix<T, R2, C2, S2>,
) -> Result<DVector<T>>
where
    T: Scalar,
    R1: Dim,
    C1: Dim,
    S1: RawStorage<T, R1, C1>,
    R2: Dim,
    C2: Dim,
    S2: RawStorage<T, R2, C2>,
{
    let n = flat_len(linear_o.len(), y.len())?;
    if n == 0 {
        return Ok(DVector::zeros(0));
    }
    let n_samples = <T as Scalar>::from_usize(n);
    Ok(DVector::from_iterator(
        n,
        linear_o.iter().zip(y.iter()).map(|(&o, &label)| {
            let denom = T::one() + Float::exp(label * o);
            -label / (denom * n_samples)
        }),
    ))
}

/// Multinomial logistic loss.
///
/// Reserved for multiclass support; always returns
/// [`ModelError::UnsupportedMulticlass`].
pub fn multinomial_loss<T, R1, C1, S1, R2, C2, S2>(
    _linear_o: &Matrix<T, R1, C1, S1>,
    _y: &Matrix<T, R2, C2, S2>,
) -> Result<DVector<T>>
where
    T: Scalar,
    R1: Dim,
    C1: Dim,
    S1: RawStorage<T, R1, C1>,
    R2: Dim,
    C2: Dim,
    S2: RawStorage<T, R2, C2>,
{
    Err(ModelError::unsupported_multiclass(
        "the multinomial logistic loss is not implemented",
    ))
}
