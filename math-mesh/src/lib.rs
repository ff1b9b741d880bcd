//! Rectilinear tensor meshes for geophysical simulations
//!
//! This crate provides the mesh side of receiver projections: where each
//! kind of field value lives on a staggered grid, and how to interpolate
//! from those grid values to arbitrary measurement locations.
//!
//! # Features
//!
//! - **Tensor meshes**: 1D, 2D and 3D rectilinear meshes with variable cell widths
//! - **Staggered grids**: cell centres, nodes, faces and edges with per-axis components
//! - **Interpolation**: sparse multilinear interpolation matrices
//! - **Generators**: uniform meshes and geometrically padded meshes, JSON configuration
//!
//! # Example
//!
//! ```
//! use math_geo_mesh::{GridLocation, InterpolationMesh, TensorMesh};
//! use ndarray::array;
//!
//! let mesh = TensorMesh::uniform(&[4, 4], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
//! let locations = array![[0.5, 2.0]];
//! let p = mesh
//!     .interpolation_matrix(locations.view(), GridLocation::NODES)
//!     .unwrap();
//! assert_eq!(p.shape(), (1, mesh.n_nodes()));
//! ```

pub mod error;
pub mod mesh;

pub use error::{MeshError, Result};
pub use mesh::*;

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
