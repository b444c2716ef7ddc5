//! Error types for logistic regression numerics.
//!
//! This module defines the error types raised by the loss kernels, the label
//! preprocessing step, the categorical encoders and the solvers.

use thiserror::Error;

/// Errors raised by data validation and model-level operations.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Fewer than two distinct labels were found.
    ///
    /// A binary classifier cannot be trained on a single class.
    #[error("Insufficient classes: {reason}")]
    InsufficientClasses {
        /// Description of the classes that were found
        reason: String,
    },

    /// More than two distinct labels were found, or a multiclass operation
    /// was requested.
    #[error("Multiclass is not supported: {reason}")]
    UnsupportedMulticlass {
        /// Description of the unsupported request
        reason: String,
    },

    /// A categorical feature value lies outside its category range.
    #[error("Invalid category code: {reason}")]
    InvalidCategoryCode {
        /// Description of the offending code and its position
        reason: String,
    },

    /// Dimension mismatch between arrays.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Numerical instability detected.
    ///
    /// This error occurs when a cost or gradient evaluation produces NaN.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Invalid parameter passed to a constructor or kernel.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid
        reason: String,
    },
}

impl ModelError {
    /// Create an InsufficientClasses error with a custom reason.
    pub fn insufficient_classes<S: Into<String>>(reason: S) -> Self {
        Self::InsufficientClasses {
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedMulticlass error with a custom reason.
    pub fn unsupported_multiclass<S: Into<String>>(reason: S) -> Self {
        Self::UnsupportedMulticlass {
            reason: reason.into(),
        }
    }

    /// Create an InvalidCategoryCode error with a custom reason.
    pub fn invalid_category_code<S: Into<String>>(reason: S) -> Self {
        Self::InvalidCategoryCode {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error with a custom reason.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while configuring or running an optimizer.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when the optimizer is configured with invalid
    /// parameters (e.g., non-positive regularization strength, zero memory).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Invalid search direction.
    ///
    /// This error occurs when the search direction is not a descent direction.
    #[error("Invalid search direction: not a descent direction")]
    InvalidSearchDirection,

    /// Propagated model error.
    #[error("Model operation failed: {0}")]
    Model(#[from] ModelError),
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for operations that can produce ModelError.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
