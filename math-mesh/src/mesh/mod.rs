//! Mesh types and generators
//!
//! This module provides the tensor mesh, grid-location tags and the
//! interpolation trait receivers build their projections from.

mod generators;
mod tensor;
mod types;

pub use generators::*;
pub use tensor::*;
pub use types::*;
