//! Sparse matrix structures (CSR format)
//!
//! Projection operators are short and wide: one row per datum, a handful of
//! non-zeros per row, one column per mesh degree of freedom. CSR stores them
//! in O(nnz) and applies them (or their transpose) in O(nnz).

mod csr;

pub use csr::{CsrBuilder, CsrMatrix};
