//! Numerically stable scalar kernels.
//!
//! The logistic loss is built from `log(1 + e^x)`, which overflows for large
//! positive `x` when evaluated literally and loses all precision for large
//! negative `x`. The kernels here use the `logaddexp` formulation instead.

use crate::core::types::{DVector, Scalar};
use num_traits::Float;

/// `log(e^a + e^b)` without overflow.
///
/// Computed as `max(a, b) + ln_1p(exp(-|a - b|))`. Two infinities of the same
/// sign return that infinity.
pub fn logaddexp<T: Scalar>(a: T, b: T) -> T {
    if a == b {
        // Covers a == b == ±inf, where a - b would be NaN.
        return a + <T as Scalar>::from_f64(std::f64::consts::LN_2);
    }
    let max = Float::max(a, b);
    let diff = Float::abs(a - b);
    max + Float::ln_1p(Float::exp(-diff))
}

/// `log(1 + e^x)`, i.e. `logaddexp(0, x)`.
///
/// Always finite and non-negative for finite `x`; `≈ x` for large positive
/// `x` and `≈ e^x` (hence `≈ 0`) for large negative `x`.
#[inline]
pub fn log1pexp_scalar<T: Scalar>(x: T) -> T {
    logaddexp(T::zero(), x)
}

/// The logistic function `1 / (1 + e^{-x})`.
///
/// The exponential is always taken of a non-positive argument so that
/// neither tail overflows; `sigmoid(0)` is exactly `0.5`.
#[inline]
pub fn sigmoid_scalar<T: Scalar>(x: T) -> T {
    if x >= T::zero() {
        T::one() / (T::one() + Float::exp(-x))
    } else {
        let e = Float::exp(x);
        e / (T::one() + e)
    }
}

/// Check if a vector is finite (no NaN or Inf values)
pub fn is_finite_vector<T: Scalar>(v: &DVector<T>) -> bool {
    v.iter().all(|x| Float::is_finite(*x))
}

/// Infinity norm `max_i |v_i|`, zero for an empty vector.
pub fn inf_norm<T: Scalar>(v: &DVector<T>) -> T {
    v.iter()
        .map(|x| Float::abs(*x))
        .fold(T::zero(), |acc, x| Float::max(acc, x))
}
