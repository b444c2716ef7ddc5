//! L-BFGS optimizer.
//!
//! L-BFGS (Limited-memory Broyden-Fletcher-Goldfarb-Shanno) is a quasi-Newton
//! algorithm that approximates the inverse Hessian from a short history of
//! position and gradient differences. It is the default solver for smooth
//! regularised linear models because each iteration only costs a few
//! matrix-vector products.
//!
//! ## Two-Loop Recursion Algorithm
//!
//! ```text
//! q = ∇f(x_k)
//! for i = k-1, k-2, ..., k-m:
//!     α_i = ρ_i * <s_i, q>
//!     q = q - α_i * y_i
//!
//! r = γ_k * q          // γ_k = <s_{k-1}, y_{k-1}> / <y_{k-1}, y_{k-1}>
//!
//! for i = k-m, k-m+1, ..., k-1:
//!     β = ρ_i * <y_i, r>
//!     r = r + (α_i - β) * s_i
//!
//! return -r            // Search direction
//! ```
//!
//! # Key Features
//!
//! - **Limited memory**: Only stores m vector pairs (typically 5-20)
//! - **Automatic scaling**: Initial inverse Hessian γ_k I from the latest pair
//! - **Cautious updates**: Pairs with insufficient curvature are skipped
//! - **Restarts**: The memory is cleared whenever the recursion stops
//!   producing a descent direction
//!
//! # References
//!
//! - Nocedal & Wright, "Numerical Optimization" (2006), Algorithm 7.4
//! - Li & Fukushima, "On the global convergence of the BFGS method for
//!   nonconvex unconstrained optimization problems" (2001)

use logitopt_core::{
    core::{
        cost_function::CostFunction,
        error::{ModelError, OptimizerError, OptimizerResult},
        types::{DVector, Scalar},
    },
    numerical::stability::inf_norm,
    optimization::{
        line_search::{BacktrackingLineSearch, LineSearch, LineSearchParams},
        optimizer::{
            IterationState, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
        },
    },
};
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

/// Curvature history of an L-BFGS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LBFGSState<T>
where
    T: Scalar,
{
    /// Memory size (number of vector pairs to store)
    pub memory_size: usize,

    /// Stored position differences (s_k = x_{k+1} - x_k)
    pub s_history: VecDeque<DVector<T>>,

    /// Stored gradient differences (y_k = g_{k+1} - g_k)
    pub y_history: VecDeque<DVector<T>>,

    /// Inner products rho_k = 1 / (y_k^T s_k)
    pub rho_history: VecDeque<T>,
}

impl<T> LBFGSState<T>
where
    T: Scalar,
{
    /// Creates a new, empty L-BFGS state.
    pub fn new(memory_size: usize) -> Self {
        Self {
            memory_size,
            s_history: VecDeque::with_capacity(memory_size),
            y_history: VecDeque::with_capacity(memory_size),
            rho_history: VecDeque::with_capacity(memory_size),
        }
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.s_history.len()
    }

    /// True if no pair is stored.
    pub fn is_empty(&self) -> bool {
        self.s_history.is_empty()
    }

    /// Forgets every stored pair.
    pub fn reset(&mut self) {
        self.s_history.clear();
        self.y_history.clear();
        self.rho_history.clear();
    }

    /// Stores the pair `(s, y)`, evicting the oldest one when full.
    ///
    /// A pair is accepted only if `yᵀs > 0`; with `cautious` set it must also
    /// satisfy `yᵀs > ε ‖y‖²`. Returns whether the pair was stored.
    pub fn update_history(&mut self, s: DVector<T>, y: DVector<T>, cautious: bool) -> bool {
        if self.memory_size == 0 {
            return false;
        }

        let sy = s.dot(&y);
        let threshold = if cautious {
            T::EPSILON * y.norm_squared()
        } else {
            T::zero()
        };
        if !(sy > threshold) {
            log::debug!("L-BFGS skipped a curvature pair (s·y = {sy})");
            return false;
        }

        if self.s_history.len() >= self.memory_size {
            self.s_history.pop_front();
            self.y_history.pop_front();
            self.rho_history.pop_front();
        }
        self.s_history.push_back(s);
        self.y_history.push_back(y);
        self.rho_history.push_back(T::one() / sy);
        true
    }

    /// Applies the two-loop recursion and returns the search direction `-H_k g`.
    pub fn compute_direction(&self, gradient: &DVector<T>) -> DVector<T> {
        let m = self.len();
        if m == 0 {
            return -gradient;
        }

        let mut alpha = vec![T::zero(); m];
        let mut q = gradient.clone();

        for i in (0..m).rev() {
            alpha[i] = self.rho_history[i] * self.s_history[i].dot(&q);
            q.axpy(-alpha[i], &self.y_history[i], T::one());
        }

        let (s_last, y_last) = (&self.s_history[m - 1], &self.y_history[m - 1]);
        let gamma = s_last.dot(y_last) / y_last.norm_squared();
        let mut r = q * gamma;

        for i in 0..m {
            let beta = self.rho_history[i] * self.y_history[i].dot(&r);
            r.axpy(alpha[i] - beta, &self.s_history[i], T::one());
        }

        -r
    }
}

/// Configuration for the L-BFGS optimizer.
#[derive(Debug, Clone)]
pub struct LBFGSConfig<T: Scalar> {
    /// Number of vector pairs to store (typically 5-20)
    pub memory_size: usize,
    /// Backtracking parameters
    pub line_search: LineSearchParams<T>,
    /// Whether to use cautious updates (skip pairs with weak curvature)
    pub use_cautious_updates: bool,
}

impl<T: Scalar> Default for LBFGSConfig<T> {
    fn default() -> Self {
        Self {
            memory_size: 10,
            line_search: LineSearchParams::backtracking(),
            use_cautious_updates: true,
        }
    }
}

impl<T: Scalar> LBFGSConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the memory size (number of vector pairs to store).
    pub fn with_memory_size(mut self, size: usize) -> Self {
        self.memory_size = size;
        self
    }

    /// Sets the line search parameters.
    pub fn with_line_search(mut self, params: LineSearchParams<T>) -> Self {
        self.line_search = params;
        self
    }

    /// Sets the initial step size for line search.
    pub fn with_initial_step_size(mut self, step_size: T) -> Self {
        self.line_search.initial_step_size = step_size;
        self
    }

    /// Enables or disables cautious updates.
    pub fn with_cautious_updates(mut self, cautious: bool) -> Self {
        self.use_cautious_updates = cautious;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.memory_size == 0 {
            return Err(OptimizerError::invalid_configuration(
                "memory size must be at least 1",
                "memory_size",
                "0",
            ));
        }
        self.line_search.validate()?;
        Ok(())
    }
}

/// L-BFGS optimizer over flat parameter vectors.
///
/// # Examples
///
/// ```rust
/// use logitopt_core::prelude::*;
/// use logitopt_optim::{LBFGS, LBFGSConfig};
///
/// let cost = QuadraticCost::new(
///     DVector::from_vec(vec![1.0_f64, -2.0]),
///     DVector::from_vec(vec![1.0, 100.0]),
/// )?;
/// let mut lbfgs = LBFGS::new(LBFGSConfig::new().with_memory_size(5));
/// let result = lbfgs.optimize(
///     &cost,
///     &DVector::zeros(2),
///     &StoppingCriterion::new().with_gradient_tolerance(1e-8),
/// )?;
/// assert!(result.converged);
/// assert!((result.point[1] + 2.0).abs() < 1e-6);
/// # Ok::<(), OptimizerError>(())
/// ```
#[derive(Debug)]
pub struct LBFGS<T: Scalar> {
    config: LBFGSConfig<T>,
    state: LBFGSState<T>,
    line_search: BacktrackingLineSearch,
}

impl<T: Scalar> LBFGS<T> {
    /// Creates a new L-BFGS optimizer with given configuration.
    pub fn new(config: LBFGSConfig<T>) -> Self {
        let state = LBFGSState::new(config.memory_size);
        Self {
            config,
            state,
            line_search: BacktrackingLineSearch::new(),
        }
    }

    /// Creates a new L-BFGS optimizer with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(LBFGSConfig::default())
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &LBFGSConfig<T> {
        &self.config
    }

    /// Returns the curvature history left by the last run.
    pub fn state(&self) -> &LBFGSState<T> {
        &self.state
    }
}

impl<T: Scalar> Optimizer<T> for LBFGS<T> {
    fn name(&self) -> &str {
        "L-BFGS"
    }

    fn optimize<C>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        C: CostFunction<T>,
    {
        self.config.validate()?;
        stopping_criterion.validate()?;
        if initial_point.len() != cost_fn.dimension() {
            return Err(ModelError::dimension_mismatch(
                format!("initial point of dimension {}", cost_fn.dimension()),
                format!("initial point of dimension {}", initial_point.len()),
            )
            .into());
        }

        let start_time = Instant::now();
        self.state = LBFGSState::new(self.config.memory_size);

        let mut point = initial_point.clone();
        let (mut value, mut gradient) = cost_fn.cost_and_gradient(&point)?;
        let mut function_evaluations = 1;
        let mut gradient_evaluations = 1;
        let mut iteration = 0;
        let mut previous_value = None;
        let mut step_norm = None;

        loop {
            let gradient_norm = inf_norm(&gradient);
            let progress = IterationState {
                iteration,
                value,
                previous_value,
                gradient_norm,
                step_norm,
                function_evaluations,
                elapsed: start_time.elapsed(),
            };

            let reason = match stopping_criterion.check(&progress) {
                Some(reason) => Some(reason),
                None => {
                    let mut direction = self.state.compute_direction(&gradient);
                    if !(gradient.dot(&direction) < T::zero()) {
                        log::debug!("L-BFGS direction is not a descent direction; resetting memory");
                        self.state.reset();
                        direction = -&gradient;
                    }

                    if !(gradient.dot(&direction) < T::zero()) {
                        // The gradient vanished exactly.
                        Some(TerminationReason::Converged)
                    } else {
                        let mut params = self.config.line_search.clone();
                        if self.state.is_empty() {
                            // Without curvature information, keep the first trial step short.
                            let scaled = T::one() / gradient.norm();
                            params.initial_step_size = Float::max(
                                Float::min(params.initial_step_size, scaled),
                                params.min_step_size,
                            );
                        }

                        let step = self.line_search.search(
                            cost_fn, &point, value, &gradient, &direction, &params,
                        )?;
                        function_evaluations += step.function_evals;
                        gradient_evaluations += step.gradient_evals;

                        if step.success {
                            let s = &step.new_point - &point;
                            let y = &step.new_gradient - &gradient;
                            step_norm = Some(inf_norm(&s));
                            self.state
                                .update_history(s, y, self.config.use_cautious_updates);

                            previous_value = Some(value);
                            point = step.new_point;
                            value = step.new_value;
                            gradient = step.new_gradient;
                            iteration += 1;
                            log::debug!(
                                "L-BFGS iteration {iteration}: f = {value}, step = {}",
                                step.step_size
                            );
                            None
                        } else {
                            Some(TerminationReason::LineSearchFailed)
                        }
                    }
                }
            };

            if let Some(reason) = reason {
                if reason == TerminationReason::LineSearchFailed {
                    log::warn!(
                        "L-BFGS line search failed at iteration {iteration} (f = {value}, ‖g‖∞ = {gradient_norm})"
                    );
                } else {
                    log::debug!("L-BFGS stopped after {iteration} iterations: {reason:?}");
                }
                return Ok(OptimizationResult::new(
                    point,
                    value,
                    iteration,
                    start_time.elapsed(),
                    reason,
                )
                .with_gradient_norm(inf_norm(&gradient))
                .with_function_evaluations(function_evaluations)
                .with_gradient_evaluations(gradient_evaluations));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use logitopt_core::core::cost_function::QuadraticCost;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Rosenbrock;

    impl CostFunction<f64> for Rosenbrock {
        fn dimension(&self) -> usize {
            2
        }

        fn cost(&self, p: &DVector<f64>) -> logitopt_core::Result<f64> {
            Ok((1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2))
        }

        fn cost_and_gradient(&self, p: &DVector<f64>) -> logitopt_core::Result<(f64, DVector<f64>)> {
            let (x, y) = (p[0], p[1]);
            let grad = DVector::from_vec(vec![
                -2.0 * (1.0 - x) - 400.0 * x * (y - x * x),
                200.0 * (y - x * x),
            ]);
            Ok((self.cost(p)?, grad))
        }
    }

    #[test]
    fn test_lbfgs_config() {
        let config = LBFGSConfig::<f64>::new()
            .with_memory_size(20)
            .with_initial_step_size(0.5)
            .with_cautious_updates(false);

        assert_eq!(config.memory_size, 20);
        assert_eq!(config.line_search.initial_step_size, 0.5);
        assert!(!config.use_cautious_updates);
        assert!(config.validate().is_ok());

        let err = LBFGSConfig::<f64>::new().with_memory_size(0).validate().unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_state_evicts_oldest_pair() {
        let mut state = LBFGSState::<f64>::new(2);
        for k in 1..=3 {
            let s = DVector::from_vec(vec![k as f64, 0.0]);
            let y = DVector::from_vec(vec![1.0, 0.0]);
            assert!(state.update_history(s, y, true));
        }
        assert_eq!(state.len(), 2);
        assert_eq!(state.s_history[0][0], 2.0);
        assert_relative_eq!(state.rho_history[1], 1.0 / 3.0);

        // Negative curvature is rejected.
        let rejected = state.update_history(
            DVector::from_vec(vec![1.0, 0.0]),
            DVector::from_vec(vec![-1.0, 0.0]),
            false,
        );
        assert!(!rejected);
        assert_eq!(state.len(), 2);

        state.reset();
        assert!(state.is_empty());
    }

    #[test]
    fn test_direction_matches_inverse_hessian_on_quadratic() {
        // For f = ½ xᵀ diag(2, 8) x, a pair along each axis recovers H⁻¹ exactly.
        let mut state = LBFGSState::<f64>::new(5);
        state.update_history(
            DVector::from_vec(vec![1.0, 0.0]),
            DVector::from_vec(vec![2.0, 0.0]),
            true,
        );
        state.update_history(
            DVector::from_vec(vec![0.0, 1.0]),
            DVector::from_vec(vec![0.0, 8.0]),
            true,
        );

        let g = DVector::from_vec(vec![4.0, 4.0]);
        let d = state.compute_direction(&g);
        assert_relative_eq!(d[0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(d[1], -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_state_gives_steepest_descent() {
        let state = LBFGSState::<f64>::new(3);
        let g = DVector::from_vec(vec![1.0, -2.0]);
        assert_eq!(state.compute_direction(&g), DVector::from_vec(vec![-1.0, 2.0]));
    }

    #[test]
    fn test_quadratic_convergence() {
        let cost = QuadraticCost::new(
            DVector::from_vec(vec![3.0, -1.0, 0.5]),
            DVector::from_vec(vec![1.0, 10.0, 100.0]),
        )
        .unwrap();
        let mut lbfgs = LBFGS::with_default_config();
        let result = lbfgs
            .optimize(
                &cost,
                &DVector::zeros(3),
                &StoppingCriterion::new()
                    .with_gradient_tolerance(1e-10)
                    .with_function_tolerance(0.0),
            )
            .unwrap();

        assert!(result.converged);
        assert_eq!(result.termination_reason, TerminationReason::Converged);
        assert_relative_eq!(result.point[0], 3.0, epsilon = 1e-8);
        assert_relative_eq!(result.point[1], -1.0, epsilon = 1e-8);
        assert_relative_eq!(result.point[2], 0.5, epsilon = 1e-8);
        assert!(result.iterations < 50);
    }

    #[test]
    fn test_stops_at_target_value() {
        let cost = QuadraticCost::new(
            DVector::from_vec(vec![3.0, -1.0, 0.5]),
            DVector::from_vec(vec![1.0, 10.0, 100.0]),
        )
        .unwrap();
        let mut lbfgs = LBFGS::with_default_config();
        let result = lbfgs
            .optimize(
                &cost,
                &DVector::zeros(3),
                &StoppingCriterion::new()
                    .with_gradient_tolerance(1e-12)
                    .with_function_tolerance(0.0)
                    .with_target_value(1.0),
            )
            .unwrap();

        assert_eq!(result.termination_reason, TerminationReason::TargetReached);
        assert!(result.converged);
        assert!(result.value <= 1.0);
    }

    #[test]
    fn test_rosenbrock() {
        let mut lbfgs = LBFGS::new(LBFGSConfig::new().with_memory_size(7));
        let result = lbfgs
            .optimize(
                &Rosenbrock,
                &DVector::from_vec(vec![-1.2, 1.0]),
                &StoppingCriterion::new()
                    .with_max_iterations(1000)
                    .with_gradient_tolerance(1e-6)
                    .with_function_tolerance(0.0),
            )
            .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(result.point[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_max_iterations_is_not_an_error() {
        let mut lbfgs = LBFGS::with_default_config();
        let result = lbfgs
            .optimize(
                &Rosenbrock,
                &DVector::from_vec(vec![-1.2, 1.0]),
                &StoppingCriterion::new()
                    .with_max_iterations(2)
                    .with_gradient_tolerance(1e-12),
            )
            .unwrap();

        assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut lbfgs = LBFGS::with_default_config();
        let err = lbfgs
            .optimize(&Rosenbrock, &DVector::zeros(3), &StoppingCriterion::new())
            .unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Model(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_start_at_minimum() {
        let cost = QuadraticCost::new(DVector::from_vec(vec![1.0]), DVector::from_vec(vec![2.0]))
            .unwrap();
        let mut lbfgs = LBFGS::with_default_config();
        let result = lbfgs
            .optimize(&cost, &DVector::from_vec(vec![1.0]), &StoppingCriterion::new())
            .unwrap();
        assert_eq!(result.iterations, 0);
        assert!(result.converged);
        assert_eq!(lbfgs.name(), "L-BFGS");
    }
}
