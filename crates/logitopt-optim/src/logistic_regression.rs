//! Binary logistic regression fitted with L-BFGS.
//!
//! [`LogisticRegression`] minimises [`LogisticObjective`] starting from the
//! zero vector. Labels may be any two distinct values; the larger one is
//! treated as the positive class.
//!
//! # Example
//!
//! ```rust
//! use logitopt_core::prelude::*;
//! use logitopt_optim::{LinearClassifier, LogisticRegression};
//!
//! let x = DMatrix::from_row_slice(4, 1, &[-2.0, -1.0, 1.0, 2.0]);
//! let y = DVector::from_vec(vec![0.0, 1.0, 0.0, 1.0]);
//!
//! let model = LogisticRegression::<f64>::default().fit(&x, &y, true)?;
//! assert_eq!(model.coefficients.len(), 1);
//! assert!(model.converged);
//! # Ok::<(), OptimizerError>(())
//! ```

use crate::{
    lbfgs::{LBFGSConfig, LBFGS},
    objective::LogisticObjective,
};
use logitopt_core::{
    compute::design::DesignMatrix,
    core::{
        cost_function::CostFunction,
        error::{ModelError, OptimizerError, OptimizerResult, Result},
        labels::LabelInfo,
        types::{DVector, Scalar},
    },
    numerical::logistic::sigmoid,
    optimization::optimizer::{Optimizer, StoppingCriterion, TerminationReason},
};
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hyper-parameters of [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogisticRegressionConfig<T: Scalar> {
    /// Inverse of the L2 regularisation strength; must be positive
    pub c: T,
    /// Whether [`LogisticRegression::fit_model`] fits an unpenalised
    /// intercept. [`LinearClassifier::fit`] takes this as an argument
    /// instead and ignores the field.
    pub fit_intercept: bool,
    /// Maximum number of L-BFGS iterations
    pub max_iterations: usize,
    /// Tolerance on the infinity norm of the gradient
    pub tolerance: T,
    /// Number of curvature pairs kept by L-BFGS
    pub memory_size: usize,
}

impl<T: Scalar> Default for LogisticRegressionConfig<T> {
    fn default() -> Self {
        Self {
            c: T::one(),
            fit_intercept: true,
            max_iterations: 100,
            tolerance: <T as Scalar>::from_f64(1e-4),
            memory_size: 10,
        }
    }
}

impl<T: Scalar> LogisticRegressionConfig<T> {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inverse regularisation strength.
    pub fn with_c(mut self, c: T) -> Self {
        self.c = c;
        self
    }

    /// Enables or disables the intercept.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the gradient tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the L-BFGS memory size.
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if !(self.c > T::zero()) || !Float::is_finite(self.c) {
            return Err(OptimizerError::invalid_configuration(
                "C must be positive and finite",
                "c",
                self.c.to_string(),
            ));
        }
        if !(self.tolerance >= T::zero()) {
            return Err(OptimizerError::invalid_configuration(
                "tolerance must be non-negative",
                "tolerance",
                self.tolerance.to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(OptimizerError::invalid_configuration(
                "at least one iteration is required",
                "max_iterations",
                "0",
            ));
        }
        if self.memory_size == 0 {
            return Err(OptimizerError::invalid_configuration(
                "memory size must be at least 1",
                "memory_size",
                "0",
            ));
        }
        Ok(())
    }
}

/// Parameters of a fitted linear model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FittedLinearModel<T: Scalar> {
    /// One weight per feature
    pub coefficients: DVector<T>,
    /// Intercept, zero when not fitted
    pub intercept: T,
    /// Iterations used by the solver
    pub iterations: usize,
    /// Whether the solver met its convergence tolerance
    pub converged: bool,
}

impl<T: Scalar> FittedLinearModel<T> {
    /// Linear outputs `X w + b`.
    pub fn decision_function<X: DesignMatrix<T>>(&self, x: &X) -> Result<DVector<T>> {
        let mut o = x.mul_vec(&self.coefficients)?;
        o.add_scalar_mut(self.intercept);
        Ok(o)
    }

    /// Probability of the positive class for every sample.
    pub fn predict_proba<X: DesignMatrix<T>>(&self, x: &X) -> Result<DVector<T>> {
        Ok(sigmoid(&self.decision_function(x)?))
    }
}

/// A linear binary classifier that can be fitted on a design matrix.
pub trait LinearClassifier<T: Scalar> {
    /// Fits the model on features `x` and two-class labels `y`.
    ///
    /// `fit_intercept` overrides any intercept setting held by the
    /// classifier's own configuration.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` when `x` and `y` disagree on the sample count
    /// - `InsufficientClasses` / `UnsupportedMulticlass` unless `y` holds
    ///   exactly two distinct values
    fn fit<X: DesignMatrix<T>>(
        &self,
        x: &X,
        y: &DVector<T>,
        fit_intercept: bool,
    ) -> OptimizerResult<FittedLinearModel<T>>;
}

/// L2-regularised binary logistic regression.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression<T: Scalar> {
    config: LogisticRegressionConfig<T>,
}

impl<T: Scalar> LogisticRegression<T> {
    /// Creates a classifier with the given configuration.
    pub fn new(config: LogisticRegressionConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LogisticRegressionConfig<T> {
        &self.config
    }

    /// Fits the model using the configured `fit_intercept`.
    pub fn fit_model<X: DesignMatrix<T>>(
        &self,
        x: &X,
        y: &DVector<T>,
    ) -> OptimizerResult<FittedLinearModel<T>> {
        self.fit(x, y, self.config.fit_intercept)
    }
}

impl<T: Scalar> LinearClassifier<T> for LogisticRegression<T> {
    fn fit<X: DesignMatrix<T>>(
        &self,
        x: &X,
        y: &DVector<T>,
        fit_intercept: bool,
    ) -> OptimizerResult<FittedLinearModel<T>> {
        self.config.validate()?;
        if x.nrows() != y.len() {
            return Err(ModelError::dimension_mismatch(
                format!("{} labels", x.nrows()),
                format!("{} labels", y.len()),
            )
            .into());
        }

        let info = LabelInfo::from_labels(y.as_slice())?;
        let signs = info.binarize::<T>(y.as_slice())?;
        let objective = LogisticObjective::new(x, &signs, self.config.c, fit_intercept)?;

        let criterion = StoppingCriterion::new()
            .with_max_iterations(self.config.max_iterations)
            .with_gradient_tolerance(self.config.tolerance)
            .with_function_tolerance(<T as Scalar>::from_f64(64.0) * T::EPSILON);
        let mut solver = LBFGS::new(LBFGSConfig::new().with_memory_size(self.config.memory_size));

        log::debug!(
            "Fitting logistic regression on {} samples x {} features (C = {}, intercept = {fit_intercept})",
            x.nrows(),
            x.ncols(),
            self.config.c
        );
        let initial = DVector::zeros(objective.dimension());
        let result = solver.optimize(&objective, &initial, &criterion)?;

        match result.termination_reason {
            TerminationReason::NumericalError => {
                return Err(ModelError::numerical_error(format!(
                    "logistic loss became non-finite after {} iterations",
                    result.iterations
                ))
                .into());
            }
            TerminationReason::MaxIterations => log::warn!(
                "L-BFGS failed to converge in {} iterations (‖g‖∞ = {}); increase max_iterations",
                result.iterations,
                result.gradient_norm.unwrap_or_else(T::zero)
            ),
            reason if !reason.is_convergence() => log::warn!(
                "L-BFGS stopped early after {} iterations: {reason:?}",
                result.iterations
            ),
            _ => {}
        }

        let (coefficients, intercept) = objective.split(&result.point);
        log::debug!(
            "Logistic regression fitted in {} iterations (loss = {}, converged = {})",
            result.iterations,
            result.value,
            result.converged
        );

        Ok(FittedLinearModel {
            coefficients,
            intercept,
            iterations: result.iterations,
            converged: result.converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use logitopt_core::core::types::DMatrix;

    fn separable_with_noise() -> (DMatrix<f64>, DVector<f64>) {
        let x = DMatrix::from_row_slice(6, 2, &[
            2.0, 1.0,
            1.5, -0.5,
            0.2, 0.3,
            -0.4, 0.1,
            -1.0, -1.2,
            -2.0, 0.4,
        ]);
        let y = DVector::from_vec(vec![1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        (x, y)
    }

    #[test]
    fn test_config_validation() {
        assert!(LogisticRegressionConfig::<f64>::default().validate().is_ok());
        for config in [
            LogisticRegressionConfig::<f64>::new().with_c(0.0),
            LogisticRegressionConfig::new().with_c(f64::INFINITY),
            LogisticRegressionConfig::new().with_tolerance(-1.0),
            LogisticRegressionConfig::new().with_max_iterations(0),
            LogisticRegressionConfig::new().with_memory_size(0),
        ] {
            assert!(matches!(
                config.validate(),
                Err(OptimizerError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_fit_reaches_stationary_point() {
        let (x, y) = separable_with_noise();
        let model = LogisticRegression::new(LogisticRegressionConfig::new().with_tolerance(1e-10))
            .fit(&x, &y, true)
            .unwrap();
        assert!(model.converged);

        // The gradient of the objective vanishes at the returned parameters.
        let signs = y.map(|v| if v > 0.5 { 1.0 } else { -1.0 });
        let objective = LogisticObjective::new(&x, &signs, 1.0, true).unwrap();
        let params = model.coefficients.clone().insert_row(2, model.intercept);
        let grad = objective.gradient(&params).unwrap();
        assert!(grad.amax() < 1e-6);

        assert!(model.coefficients[0] > 0.0);
    }

    #[test]
    fn test_no_intercept() {
        let (x, y) = separable_with_noise();
        let model = LogisticRegression::default().fit(&x, &y, false).unwrap();
        assert_eq!(model.intercept, 0.0);
        assert_eq!(model.coefficients.len(), 2);
    }

    #[test]
    fn test_fit_argument_overrides_configured_intercept() {
        let (x, y) = separable_with_noise();
        let classifier =
            LogisticRegression::new(LogisticRegressionConfig::new().with_fit_intercept(false));

        let configured = classifier.fit_model(&x, &y).unwrap();
        let without = classifier.fit(&x, &y, false).unwrap();
        assert_eq!(configured.intercept, 0.0);
        assert_relative_eq!(configured.coefficients, without.coefficients, epsilon = 1e-15);

        let with = classifier.fit(&x, &y, true).unwrap();
        let default_with = LogisticRegression::default().fit_model(&x, &y).unwrap();
        assert_relative_eq!(with.coefficients, default_with.coefficients, epsilon = 1e-15);
        assert_relative_eq!(with.intercept, default_with.intercept, epsilon = 1e-15);
    }

    #[test]
    fn test_larger_label_is_positive() {
        let (x, y) = separable_with_noise();
        let shifted = y.map(|v| v * 5.0 + 3.0);
        let a = LogisticRegression::default().fit(&x, &y, true).unwrap();
        let b = LogisticRegression::default().fit(&x, &shifted, true).unwrap();
        assert_relative_eq!(a.coefficients, b.coefficients, epsilon = 1e-12);
        assert_relative_eq!(a.intercept, b.intercept, epsilon = 1e-12);
    }

    #[test]
    fn test_label_errors() {
        let (x, _) = separable_with_noise();
        let single = DVector::from_element(6, 1.0);
        let err = LogisticRegression::default().fit(&x, &single, true).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Model(ModelError::InsufficientClasses { .. })
        ));

        let three = DVector::from_vec(vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        let err = LogisticRegression::default().fit(&x, &three, true).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Model(ModelError::UnsupportedMulticlass { .. })
        ));

        let short = DVector::from_vec(vec![0.0, 1.0]);
        let err = LogisticRegression::default().fit(&x, &short, true).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Model(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_max_iterations_returns_unconverged_model() {
        let (x, y) = separable_with_noise();
        let model = LogisticRegression::new(
            LogisticRegressionConfig::new()
                .with_max_iterations(1)
                .with_tolerance(0.0),
        )
        .fit_model(&x, &y)
        .unwrap();
        assert!(!model.converged);
        assert_eq!(model.iterations, 1);
    }

    #[test]
    fn test_predict_proba() {
        let model = FittedLinearModel {
            coefficients: DVector::from_vec(vec![1.0, -1.0]),
            intercept: 0.5,
            iterations: 0,
            converged: true,
        };
        let x = DMatrix::from_row_slice(2, 2, &[0.0, 0.5, 2.0, 0.0]);
        let o = model.decision_function(&x).unwrap();
        assert_relative_eq!(o[0], 0.0);
        assert_relative_eq!(o[1], 2.5);

        let p = model.predict_proba(&x).unwrap();
        assert_relative_eq!(p[0], 0.5);
        assert_relative_eq!(p[1], 1.0 / (1.0 + (-2.5_f64).exp()), epsilon = 1e-15);
    }
}
