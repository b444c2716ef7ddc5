//! Cost function interface for optimization algorithms.
//!
//! This module provides the trait that solvers use to evaluate an objective
//! and its gradient over a flat parameter vector. Implementations should
//! override [`CostFunction::cost_and_gradient`] with an analytical gradient;
//! the default falls back to central finite differences, which is also what
//! the tests use to validate analytical gradients.

use crate::core::{
    error::{ModelError, Result},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

/// Trait for smooth objectives `f: ℝⁿ → ℝ`.
pub trait CostFunction<T: Scalar>: Debug {
    /// Number of parameters the objective expects.
    fn dimension(&self) -> usize;

    /// Evaluates the cost function at a point.
    fn cost(&self, point: &DVector<T>) -> Result<T>;

    /// Evaluates the cost and gradient at a point.
    ///
    /// # Default Implementation
    ///
    /// Uses finite differences to approximate the gradient if not overridden.
    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let cost = self.cost(point)?;
        let gradient = self.gradient_fd(point)?;
        Ok((cost, gradient))
    }

    /// Computes only the gradient at a point.
    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.cost_and_gradient(point).map(|(_, grad)| grad)
    }

    /// Computes the gradient using central finite differences.
    fn gradient_fd(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let n = point.len();
        if n != self.dimension() {
            return Err(ModelError::dimension_mismatch(
                format!("point of dimension {}", self.dimension()),
                format!("point of dimension {n}"),
            ));
        }

        let h = Float::sqrt(T::EPSILON);
        let two = <T as Scalar>::from_f64(2.0);
        let mut gradient = DVector::zeros(n);
        let mut shifted = point.clone();

        for i in 0..n {
            let original = shifted[i];
            // Scale the step with the coordinate so large parameters keep precision.
            let step = h * Float::max(T::one(), Float::abs(original));

            shifted[i] = original + step;
            let f_plus = self.cost(&shifted)?;
            shifted[i] = original - step;
            let f_minus = self.cost(&shifted)?;
            shifted[i] = original;

            gradient[i] = (f_plus - f_minus) / (two * step);
        }

        Ok(gradient)
    }
}

/// Convex quadratic `f(x) = ½ (x - c)ᵀ diag(d) (x - c)`.
///
/// Used to exercise solvers on a problem with a known minimiser `c`.
#[derive(Debug, Clone)]
pub struct QuadraticCost<T: Scalar> {
    /// Minimiser
    pub center: DVector<T>,
    /// Positive diagonal of the Hessian
    pub diagonal: DVector<T>,
}

impl<T: Scalar> QuadraticCost<T> {
    /// Creates a quadratic with the given minimiser and Hessian diagonal.
    pub fn new(center: DVector<T>, diagonal: DVector<T>) -> Result<Self> {
        if center.len() != diagonal.len() {
            return Err(ModelError::dimension_mismatch(
                format!("diagonal of length {}", center.len()),
                format!("diagonal of length {}", diagonal.len()),
            ));
        }
        if diagonal.iter().any(|d| *d <= T::zero()) {
            return Err(ModelError::invalid_parameter(
                "quadratic diagonal must be strictly positive",
            ));
        }
        Ok(Self { center, diagonal })
    }
}

impl<T: Scalar> CostFunction<T> for QuadraticCost<T> {
    fn dimension(&self) -> usize {
        self.center.len()
    }

    fn cost(&self, point: &DVector<T>) -> Result<T> {
        let diff = point - &self.center;
        Ok(<T as Scalar>::from_f64(0.5) * diff.component_mul(&self.diagonal).dot(&diff))
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let diff = point - &self.center;
        let gradient = diff.component_mul(&self.diagonal);
        let cost = <T as Scalar>::from_f64(0.5) * gradient.dot(&diff);
        Ok((cost, gradient))
    }
}
