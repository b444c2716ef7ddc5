//! Line search algorithms for step size selection.
//!
//! Given a point x, a descent direction p and the directional derivative
//! ∇f(x)ᵀp < 0, a line search picks a step α > 0 such that
//! the Armijo sufficient decrease condition holds:
//!
//! ```text
//! f(x + αp) ≤ f(x) + c₁ α ∇f(x)ᵀp
//! ```
//!
//! The backtracking variant starts from `initial_step_size` and shrinks the
//! step by `rho` until the condition is met or the iteration budget runs out.

use crate::core::{
    cost_function::CostFunction,
    error::{ModelError, OptimizerError, OptimizerResult, Result},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

/// Outcome of a line search.
#[derive(Debug, Clone)]
pub struct LineSearchResult<T>
where
    T: Scalar,
{
    /// The accepted step size α
    pub step_size: T,

    /// The new point x + αp
    pub new_point: DVector<T>,

    /// The objective value at the new point
    pub new_value: T,

    /// The gradient at the new point
    pub new_gradient: DVector<T>,

    /// Objective evaluations performed
    pub function_evals: usize,

    /// Gradient evaluations performed
    pub gradient_evals: usize,

    /// True if the sufficient decrease condition was met
    pub success: bool,
}

/// Tuning parameters for line search algorithms.
#[derive(Debug, Clone)]
pub struct LineSearchParams<T>
where
    T: Scalar,
{
    /// Initial step size α₀
    pub initial_step_size: T,

    /// Minimum step size before declaring failure
    pub min_step_size: T,

    /// Maximum number of trial steps
    pub max_iterations: usize,

    /// Armijo parameter c₁ ∈ (0,1)
    pub c1: T,

    /// Backtracking reduction factor ρ ∈ (0,1)
    pub rho: T,
}

impl<T> Default for LineSearchParams<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            initial_step_size: T::one(),
            min_step_size: T::MIN_STEP_SIZE,
            max_iterations: 50,
            c1: <T as Scalar>::from_f64(1e-4),
            rho: <T as Scalar>::from_f64(0.5),
        }
    }
}

impl<T> LineSearchParams<T>
where
    T: Scalar,
{
    /// Parameters for backtracking in quasi-Newton methods.
    ///
    /// Unit initial step with c₁ = 10⁻⁴ and halving on failure.
    pub fn backtracking() -> Self {
        Self::default()
    }

    /// Validates line search parameters.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` if a step size is not
    /// positive, if c₁ or ρ lies outside (0, 1), or if no trial step is
    /// allowed.
    pub fn validate(&self) -> Result<()> {
        if self.initial_step_size <= T::zero() {
            return Err(ModelError::invalid_parameter(
                "Initial step size must be positive",
            ));
        }

        if self.min_step_size <= T::zero() || self.min_step_size > self.initial_step_size {
            return Err(ModelError::invalid_parameter(
                "Minimum step size must be positive and at most the initial step size",
            ));
        }

        if self.c1 <= T::zero() || self.c1 >= T::one() {
            return Err(ModelError::invalid_parameter(
                "Armijo constant c1 must be in (0, 1)",
            ));
        }

        if self.rho <= T::zero() || self.rho >= T::one() {
            return Err(ModelError::invalid_parameter(
                "Backtracking factor rho must be in (0, 1)",
            ));
        }

        if self.max_iterations == 0 {
            return Err(ModelError::invalid_parameter(
                "Maximum iterations must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Trait for line search algorithms.
pub trait LineSearch<T: Scalar>: Debug {
    /// Searches along `direction` from `point`.
    ///
    /// `value` and `gradient` are the objective value and gradient at
    /// `point`.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::InvalidSearchDirection`] if `direction` is
    /// not a descent direction, and propagates evaluation errors of the
    /// cost function.
    fn search<C>(
        &mut self,
        cost_fn: &C,
        point: &DVector<T>,
        value: T,
        gradient: &DVector<T>,
        direction: &DVector<T>,
        params: &LineSearchParams<T>,
    ) -> OptimizerResult<LineSearchResult<T>>
    where
        C: CostFunction<T>;

    /// Returns the name of this line search method.
    fn name(&self) -> &str;
}

/// Backtracking line search enforcing the Armijo condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackingLineSearch;

impl BacktrackingLineSearch {
    /// Creates a new backtracking line search.
    pub fn new() -> Self {
        Self
    }
}

impl<T> LineSearch<T> for BacktrackingLineSearch
where
    T: Scalar,
{
    fn search<C>(
        &mut self,
        cost_fn: &C,
        point: &DVector<T>,
        value: T,
        gradient: &DVector<T>,
        direction: &DVector<T>,
        params: &LineSearchParams<T>,
    ) -> OptimizerResult<LineSearchResult<T>>
    where
        C: CostFunction<T>,
    {
        params.validate()?;

        let directional_deriv = gradient.dot(direction);
        if !(directional_deriv < T::zero()) {
            return Err(OptimizerError::InvalidSearchDirection);
        }

        let mut step_size = params.initial_step_size;
        let mut function_evals = 0;
        let mut last = None;

        for _ in 0..params.max_iterations {
            let trial = point + direction * step_size;
            let (trial_value, trial_gradient) = cost_fn.cost_and_gradient(&trial)?;
            function_evals += 1;

            let bound = value + params.c1 * step_size * directional_deriv;
            if Float::is_finite(trial_value) && trial_value <= bound {
                return Ok(LineSearchResult {
                    step_size,
                    new_point: trial,
                    new_value: trial_value,
                    new_gradient: trial_gradient,
                    function_evals,
                    gradient_evals: function_evals,
                    success: true,
                });
            }
            last = Some((step_size, trial, trial_value, trial_gradient));

            let next = step_size * params.rho;
            if next < params.min_step_size {
                break;
            }
            step_size = next;
        }

        log::debug!(
            "Backtracking line search failed after {function_evals} evaluations (last step {step_size})"
        );

        let (step_size, new_point, new_value, new_gradient) = match last {
            Some(last) => last,
            None => (T::zero(), point.clone(), value, gradient.clone()),
        };
        Ok(LineSearchResult {
            step_size,
            new_point,
            new_value,
            new_gradient,
            function_evals,
            gradient_evals: function_evals,
            success: false,
        })
    }

    fn name(&self) -> &str {
        "Backtracking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cost_function::QuadraticCost;
    use approx::assert_relative_eq;

    fn quadratic() -> QuadraticCost<f64> {
        QuadraticCost::new(
            DVector::from_vec(vec![1.0, -1.0]),
            DVector::from_vec(vec![1.0, 1.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_newton_step_accepted() {
        let cost = quadratic();
        let x = DVector::zeros(2);
        let (value, gradient) = cost.cost_and_gradient(&x).unwrap();
        let direction = -&gradient;

        let result = BacktrackingLineSearch::new()
            .search(&cost, &x, value, &gradient, &direction, &LineSearchParams::default())
            .unwrap();

        assert!(result.success);
        assert_relative_eq!(result.step_size, 1.0);
        assert_relative_eq!(result.new_value, 0.0, epsilon = 1e-14);
        assert_eq!(result.function_evals, 1);
    }

    #[test]
    fn test_long_step_is_shortened() {
        let cost = quadratic();
        let x = DVector::zeros(2);
        let (value, gradient) = cost.cost_and_gradient(&x).unwrap();
        let direction = -&gradient * 10.0;

        let result = BacktrackingLineSearch::new()
            .search(&cost, &x, value, &gradient, &direction, &LineSearchParams::default())
            .unwrap();

        assert!(result.success);
        assert!(result.step_size < 1.0);
        assert!(result.new_value < value);
        assert!(result.function_evals > 1);
    }

    #[test]
    fn test_ascent_direction_rejected() {
        let cost = quadratic();
        let x = DVector::zeros(2);
        let (value, gradient) = cost.cost_and_gradient(&x).unwrap();

        let err = BacktrackingLineSearch::new()
            .search(&cost, &x, value, &gradient, &gradient, &LineSearchParams::default())
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidSearchDirection));
    }

    #[test]
    fn test_exhausted_budget_reports_failure() {
        let cost = quadratic();
        let x = DVector::zeros(2);
        let (value, gradient) = cost.cost_and_gradient(&x).unwrap();
        let direction = -&gradient * 1e6;
        let params = LineSearchParams {
            max_iterations: 3,
            ..LineSearchParams::default()
        };

        let result = BacktrackingLineSearch::new()
            .search(&cost, &x, value, &gradient, &direction, &params)
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.function_evals, 3);
    }

    #[test]
    fn test_params_validation() {
        assert!(LineSearchParams::<f64>::backtracking().validate().is_ok());

        let params = LineSearchParams {
            rho: 1.5,
            ..LineSearchParams::<f64>::default()
        };
        assert!(params.validate().is_err());

        let params = LineSearchParams {
            c1: 0.0,
            ..LineSearchParams::<f64>::default()
        };
        assert!(params.validate().is_err());

        let params = LineSearchParams {
            max_iterations: 0,
            ..LineSearchParams::<f64>::default()
        };
        assert!(params.validate().is_err());
    }
}
