//! Core traits and types for logistic regression numerics.

pub mod cost_function;
pub mod error;
pub mod labels;
pub mod types;

// Re-export core types
pub use cost_function::*;
pub use error::*;
pub use labels::*;
pub use types::*;
