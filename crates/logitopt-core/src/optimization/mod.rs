//! Optimization framework shared by the solvers.

pub mod line_search;
pub mod optimizer;

// Re-export optimization components
pub use line_search::*;
pub use optimizer::*;
