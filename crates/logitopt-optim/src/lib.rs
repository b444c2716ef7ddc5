//! LogitOpt Optimization - solvers for regularised linear classifiers.
//!
//! This crate provides the solver used to fit the warm-start logistic
//! regression models: an L-BFGS optimizer over flat parameter vectors and
//! the L2-regularised binary logistic objective it minimises.
//!
//! # Available Components
//!
//! - **L-BFGS**: Limited memory Broyden-Fletcher-Goldfarb-Shanno with
//!   backtracking line search
//! - **LogisticObjective**: Mean logistic loss plus L2 penalty, over dense or
//!   sparse design matrices
//! - **LogisticRegression**: Binary classifier behind the [`LinearClassifier`]
//!   trait
//!
//! # Examples
//!
//! ```rust
//! use logitopt_core::prelude::*;
//! use logitopt_optim::{LinearClassifier, LogisticRegression, LogisticRegressionConfig};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.8, 0.3, -1.0, 0.2, -0.7, -0.4]);
//! let y = DVector::from_vec(vec![1.0, 1.0, -1.0, -1.0]);
//!
//! let classifier = LogisticRegression::new(
//!     LogisticRegressionConfig::new()
//!         .with_c(10.0)
//!         .with_max_iterations(200),
//! );
//! let model = classifier.fit(&x, &y, true)?;
//! assert!(model.coefficients[0] > 0.0);
//! # Ok::<(), OptimizerError>(())
//! ```

pub mod lbfgs;
pub mod logistic_regression;
pub mod objective;

// Re-export main components for convenience
pub use lbfgs::{LBFGSConfig, LBFGSState, LBFGS};
pub use logistic_regression::{
    FittedLinearModel, LinearClassifier, LogisticRegression, LogisticRegressionConfig,
};
pub use objective::LogisticObjective;

// Re-export commonly used items from core
pub use logitopt_core::optimization::optimizer::{
    OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports() {
        let _config = LBFGSConfig::<f64>::new();
        let _classifier = LogisticRegression::new(LogisticRegressionConfig::<f64>::new());
        let _criterion = StoppingCriterion::<f64>::new();
    }
}
