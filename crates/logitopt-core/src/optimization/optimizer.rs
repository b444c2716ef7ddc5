//! Core optimizer traits and types.
//!
//! This module provides the abstractions shared by the solvers that fit the
//! auxiliary logistic regression models: the [`Optimizer`] trait, the
//! [`StoppingCriterion`] that decides when to stop, and the
//! [`OptimizationResult`] returned at the end of a run.
//!
//! # Stopping Rules
//!
//! - **Gradient norm**: ‖∇f(xₖ)‖∞ ≤ ε_grad (first-order optimality)
//! - **Function change**: (f(xₖ₋₁) - f(xₖ)) / max(|f(xₖ₋₁)|, |f(xₖ)|, 1) ≤ ε_f
//! - **Point change**: ‖xₖ - xₖ₋₁‖∞ ≤ ε_x
//! - **Budgets**: iterations, function evaluations, wall-clock time
//!
//! # Example
//!
//! ```rust
//! use logitopt_core::optimization::optimizer::StoppingCriterion;
//! use std::time::Duration;
//!
//! let criterion = StoppingCriterion::<f64>::new()
//!     .with_gradient_tolerance(1e-6)
//!     .with_max_iterations(200)
//!     .with_max_time(Duration::from_secs(5));
//! assert!(criterion.validate().is_ok());
//! ```

use crate::core::{
    cost_function::CostFunction,
    error::{OptimizerError, OptimizerResult},
    types::{DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use num_traits::Float;
use std::fmt::Debug;
use std::time::Duration;

/// Result of an optimization run.
///
/// # Computational Diagnostics
///
/// - **Function evaluations**: Total calls to f(x)
/// - **Gradient evaluations**: Total gradient computations
/// - **Duration**: Wall-clock time for the optimization process
/// - **Iterations**: Number of accepted steps
#[derive(Debug, Clone)]
pub struct OptimizationResult<T>
where
    T: Scalar,
{
    /// The final iterate
    pub point: DVector<T>,

    /// The objective function value at the final point
    pub value: T,

    /// Infinity norm of the gradient at the final point (if computed)
    pub gradient_norm: Option<T>,

    /// Total number of accepted iterations
    pub iterations: usize,

    /// Total number of objective function evaluations
    pub function_evaluations: usize,

    /// Total number of gradient evaluations
    pub gradient_evaluations: usize,

    /// Wall-clock time elapsed during optimization
    pub duration: Duration,

    /// Reason for termination
    pub termination_reason: TerminationReason,

    /// True if a convergence test was satisfied
    pub converged: bool,
}

impl<T> OptimizationResult<T>
where
    T: Scalar,
{
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        value: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            point,
            value,
            gradient_norm: None,
            iterations,
            function_evaluations: 0,
            gradient_evaluations: 0,
            duration,
            termination_reason,
            converged: termination_reason.is_convergence(),
        }
    }

    /// Sets the gradient norm at the final point.
    pub fn with_gradient_norm(mut self, norm: T) -> Self {
        self.gradient_norm = Some(norm);
        self
    }

    /// Sets the function evaluation count.
    pub fn with_function_evaluations(mut self, count: usize) -> Self {
        self.function_evaluations = count;
        self
    }

    /// Sets the gradient evaluation count.
    pub fn with_gradient_evaluations(mut self, count: usize) -> Self {
        self.gradient_evaluations = count;
        self
    }
}

/// Reasons for optimization termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationReason {
    /// Gradient infinity norm below tolerance
    Converged,
    /// Relative decrease of the objective below tolerance
    FunctionToleranceReached,
    /// Step length below tolerance
    PointToleranceReached,
    /// Objective function value reached user-specified target
    TargetReached,
    /// Maximum iteration count exhausted without convergence
    MaxIterations,
    /// Wall-clock time limit exceeded
    MaxTime,
    /// Function evaluation budget exhausted
    MaxFunctionEvaluations,
    /// Line search failed to find a step satisfying the Armijo condition
    LineSearchFailed,
    /// NaN or infinity in the objective or gradient
    NumericalError,
}

impl TerminationReason {
    /// Whether this reason counts as a successful, converged run.
    pub fn is_convergence(self) -> bool {
        matches!(
            self,
            Self::Converged
                | Self::FunctionToleranceReached
                | Self::PointToleranceReached
                | Self::TargetReached
        )
    }
}

/// Snapshot of an optimizer's progress, checked against a [`StoppingCriterion`].
#[derive(Debug, Clone)]
pub struct IterationState<T: Scalar> {
    /// Number of accepted iterations so far
    pub iteration: usize,
    /// Current objective value
    pub value: T,
    /// Objective value before the last accepted step
    pub previous_value: Option<T>,
    /// Infinity norm of the current gradient
    pub gradient_norm: T,
    /// Infinity norm of the last accepted step
    pub step_norm: Option<T>,
    /// Objective evaluations so far
    pub function_evaluations: usize,
    /// Time spent so far
    pub elapsed: Duration,
}

/// Stopping criteria for optimization algorithms.
///
/// Every criterion is optional; a run stops at the first one satisfied.
/// Convergence tests are checked before budgets so that a run converging on
/// its last allowed iteration is reported as converged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoppingCriterion<T>
where
    T: Scalar,
{
    /// Maximum number of iterations
    pub max_iterations: Option<usize>,

    /// Maximum wall-clock time for optimization process
    pub max_time: Option<Duration>,

    /// Maximum number of objective function evaluations
    pub max_function_evaluations: Option<usize>,

    /// Tolerance on the gradient infinity norm
    pub gradient_tolerance: Option<T>,

    /// Tolerance on the relative decrease of the objective
    pub function_tolerance: Option<T>,

    /// Tolerance on the infinity norm of the step
    pub point_tolerance: Option<T>,

    /// Target objective value: stop when f(x) ≤ f_target
    pub target_value: Option<T>,
}

impl<T> Default for StoppingCriterion<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            max_iterations: Some(1000),
            max_time: None,
            max_function_evaluations: None,
            gradient_tolerance: Some(<T as Scalar>::from_f64(1e-6)),
            function_tolerance: Some(<T as Scalar>::from_f64(1e-9)),
            point_tolerance: None,
            target_value: None,
        }
    }
}

impl<T> StoppingCriterion<T>
where
    T: Scalar,
{
    /// Creates a new stopping criterion with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }

    /// Sets the maximum optimization time.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Sets the maximum number of function evaluations.
    pub fn with_max_function_evaluations(mut self, max_evals: usize) -> Self {
        self.max_function_evaluations = Some(max_evals);
        self
    }

    /// Sets the gradient tolerance.
    pub fn with_gradient_tolerance(mut self, tol: T) -> Self {
        self.gradient_tolerance = Some(tol);
        self
    }

    /// Sets the function value change tolerance.
    pub fn with_function_tolerance(mut self, tol: T) -> Self {
        self.function_tolerance = Some(tol);
        self
    }

    /// Sets the point change tolerance.
    pub fn with_point_tolerance(mut self, tol: T) -> Self {
        self.point_tolerance = Some(tol);
        self
    }

    /// Sets the target objective value.
    pub fn with_target_value(mut self, target: T) -> Self {
        self.target_value = Some(target);
        self
    }

    /// Checks that every tolerance is finite and non-negative.
    pub fn validate(&self) -> OptimizerResult<()> {
        let tolerances = [
            ("gradient_tolerance", self.gradient_tolerance),
            ("function_tolerance", self.function_tolerance),
            ("point_tolerance", self.point_tolerance),
        ];
        for (name, tol) in tolerances {
            if let Some(tol) = tol {
                if !Float::is_finite(tol) || tol < T::zero() {
                    return Err(OptimizerError::invalid_configuration(
                        "tolerance must be finite and non-negative",
                        name,
                        tol.to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns the reason to stop, if any criterion is met.
    pub fn check(&self, state: &IterationState<T>) -> Option<TerminationReason> {
        if !Float::is_finite(state.value) || !Float::is_finite(state.gradient_norm) {
            return Some(TerminationReason::NumericalError);
        }

        if let Some(tol) = self.gradient_tolerance {
            if state.gradient_norm <= tol {
                return Some(TerminationReason::Converged);
            }
        }

        if let Some(target) = self.target_value {
            if state.value <= target {
                return Some(TerminationReason::TargetReached);
            }
        }

        if let (Some(tol), Some(previous)) = (self.function_tolerance, state.previous_value) {
            let scale = Float::max(
                Float::max(Float::abs(previous), Float::abs(state.value)),
                T::one(),
            );
            if (previous - state.value) / scale <= tol {
                return Some(TerminationReason::FunctionToleranceReached);
            }
        }

        if let (Some(tol), Some(step)) = (self.point_tolerance, state.step_norm) {
            if step <= tol {
                return Some(TerminationReason::PointToleranceReached);
            }
        }

        if let Some(max_iter) = self.max_iterations {
            if state.iteration >= max_iter {
                return Some(TerminationReason::MaxIterations);
            }
        }

        if let Some(max_evals) = self.max_function_evaluations {
            if state.function_evaluations >= max_evals {
                return Some(TerminationReason::MaxFunctionEvaluations);
            }
        }

        if let Some(max_time) = self.max_time {
            if state.elapsed >= max_time {
                return Some(TerminationReason::MaxTime);
            }
        }

        None
    }
}

/// Interface shared by the solvers of this workspace.
pub trait Optimizer<T: Scalar>: Debug {
    /// Returns the optimizer's name.
    fn name(&self) -> &str;

    /// Minimizes `cost_fn` starting from `initial_point`.
    fn optimize<C>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        C: CostFunction<T>;
}
