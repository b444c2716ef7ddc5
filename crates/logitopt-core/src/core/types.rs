//! Type definitions and aliases for logistic regression numerics.
//!
//! This module provides the scalar trait shared by every kernel in the
//! workspace and the dense matrix aliases.

use nalgebra::{OMatrix, OVector, Dyn, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used by the loss kernels and solvers (f32 or f64).
///
/// This trait combines the nalgebra and num-traits bounds needed to run
/// dense and sparse linear algebra and the transcendental functions used
/// by the logistic loss.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Minimum value for line search step size.
    const MIN_STEP_SIZE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Convert from usize (sample counts, iteration counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const MIN_STEP_SIZE: Self = 1e-10;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const MIN_STEP_SIZE: Self = 1e-16;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;
