//! Core numerical kernels and types for logistic regression warm starts.
//!
//! This crate provides the building blocks shared by the solver and facade
//! crates: numerically stable logistic kernels, binary label preprocessing,
//! sparse one-hot encoding of categorical features, and the optimization
//! framework the solvers plug into.
//!
//! # Key Concepts
//!
//! - **Logistic kernels**: `log(1 + eˣ)`, the sigmoid and the binary logistic
//!   loss with its gradient, evaluated without overflow for any finite input
//! - **Labels**: mapping an arbitrary two-class label vector onto ±1
//! - **Design matrices**: dense and CSR feature matrices behind a common trait
//! - **Cost functions**: smooth objectives over a flat parameter vector
//!
//! # Modules
//!
//! - [`core`]: Errors, scalar types, labels and the cost function trait
//! - [`compute`]: Sparse storage, design matrices and one-hot assembly
//! - [`numerical`]: Stable logistic kernels
//! - [`optimization`]: Stopping criteria, results and line search
//!
//! # Example
//!
//! ```rust
//! use logitopt_core::prelude::*;
//!
//! let margins = DVector::from_vec(vec![-800.0_f64, 0.0, 800.0]);
//! let probabilities = sigmoid(&margins);
//! assert_eq!(probabilities[1], 0.5);
//! assert!(probabilities.iter().all(|p| f64::is_finite(*p)));
//! ```

pub mod compute;
pub mod core;
pub mod numerical;
pub mod optimization;

// Re-export commonly used modules at the crate root
pub use crate::core::{cost_function, error, labels, types};
pub use crate::optimization::{line_search, optimizer};

pub use crate::core::error::{ModelError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use logitopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compute::design::DesignMatrix;
    pub use crate::compute::one_hot::{assemble_sparse_matrix, category_offsets};
    pub use crate::compute::sparse::CsrMatrix;
    pub use crate::core::cost_function::{CostFunction, QuadraticCost};
    pub use crate::core::error::{ModelError, OptimizerError, OptimizerResult, Result};
    pub use crate::core::labels::{preprocess, LabelInfo};
    pub use crate::core::types::{DMatrix, DVector, Scalar};
    pub use crate::numerical::logistic::{
        binary_logistic_loss, binary_logistic_loss_grad, log1pexp, multinomial_loss, sigmoid,
    };
    pub use crate::optimization::line_search::{
        BacktrackingLineSearch, LineSearch, LineSearchParams, LineSearchResult,
    };
    pub use crate::optimization::optimizer::{
        IterationState, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
    };
}
