//! Numerically stable logistic kernels.

pub mod logistic;
pub mod stability;

// Re-export numerical utilities
pub use logistic::*;
pub use stability::*;
