//! Sparse linear operators for geophysical projections
//!
//! This crate provides the sparse matrix representation used to map field
//! values living on a simulation mesh to data predicted at receivers.
//!
//! # Features
//!
//! - **Sparse Matrices**: CSR format with forward and transpose products
//! - **Assembly**: COO triplets (duplicates summed) and row-by-row builder
//! - **Arithmetic**: shape-checked differences, length-checked products
//! - **Parallelism**: optional `rayon` feature for large mat-vecs
//!
//! # Example
//!
//! ```
//! use math_geo_sparse::CsrMatrix;
//! use ndarray::array;
//!
//! let p = CsrMatrix::from_triplets(1, 3, vec![(0, 0, 0.25), (0, 1, 0.75)]);
//! let d = p.checked_matvec(&array![4.0, 8.0, 1.0]).unwrap();
//! assert_eq!(d[0], 7.0);
//! ```

pub mod error;
pub mod sparse;

pub use error::{Result, SparseError};
pub use sparse::{CsrBuilder, CsrMatrix};
