//! Design matrix storage and encoders.

pub mod design;
pub mod one_hot;
pub mod sparse;

pub use design::*;
pub use one_hot::*;
pub use sparse::*;
