//! # LogitOpt
//!
//! Numerical helpers for binary logistic regression: stable logistic
//! kernels, label preprocessing, and warm-start initialisers that fit an
//! auxiliary L2-regularised logistic regression on continuous or one-hot
//! encoded categorical features.
//!
//! ## Features
//!
//! - **Stable kernels**: `log(1 + eˣ)`, the sigmoid, and the mean-normalised
//!   logistic loss with its gradient, finite for any finite input
//! - **Labels**: any two-class label vector mapped onto `{-1, +1}`
//! - **One-hot encoding**: categorical codes assembled into a CSR design matrix
//! - **Warm starts**: coefficients and intercept from an L-BFGS fit
//!
//! ## Quick Start
//!
//! ```rust
//! use logitopt::prelude::*;
//!
//! // Three categorical features with 2, 3 and 2 levels, 1-based codes.
//! let x = DMatrix::from_row_slice(6, 3, &[
//!     1_i64, 1, 2,
//!     2, 3, 1,
//!     1, 2, 2,
//!     2, 1, 1,
//!     1, 3, 2,
//!     2, 2, 1,
//! ]);
//! let y = DVector::from_vec(vec![1.0_f64, 0.0, 1.0, 0.0, 1.0, 0.0]);
//!
//! let (blocks, _intercept) = categorical_linear_init(&x, &y, &[2, 3, 2], true)?;
//! assert_eq!(blocks.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![2, 3, 2]);
//! # Ok::<(), OptimizerError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`logistic`]: Initialisers and re-exported kernels
//! - [`logitopt_core`]: Types, errors, kernels and sparse storage
//! - [`logitopt_optim`]: L-BFGS and logistic regression

pub mod logistic;

pub use logitopt_core;
pub use logitopt_optim;

// Re-export key dependencies
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::logistic::{
        categorical_linear_init, categorical_linear_init_with, linear_init, linear_init_with,
    };
    pub use logitopt_core::prelude::*;
    pub use logitopt_optim::{
        FittedLinearModel, LinearClassifier, LogisticRegression, LogisticRegressionConfig,
    };
}
