//! Error types for sparse matrix operations.

use thiserror::Error;

/// Errors that can occur when combining or applying sparse matrices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SparseError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {op}: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        /// Name of the operation that failed
        op: &'static str,
        /// Shape (rows, cols) of the left operand
        left: (usize, usize),
        /// Shape (rows, cols) of the right operand
        right: (usize, usize),
    },

    /// A vector has the wrong length for a matrix-vector product.
    #[error("vector length mismatch: expected {expected}, got {got}")]
    VectorLength {
        /// Length required by the operator
        expected: usize,
        /// Length of the supplied vector
        got: usize,
    },
}

/// A specialized `Result` type for sparse operations.
pub type Result<T> = std::result::Result<T, SparseError>;

impl SparseError {
    /// Returns `true` if this is a shape-related error.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            SparseError::DimensionMismatch { .. } | SparseError::VectorLength { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SparseError::DimensionMismatch {
            op: "sub",
            left: (2, 3),
            right: (3, 3),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch in sub: left is (2, 3), right is (3, 3)"
        );
    }

    #[test]
    fn test_vector_length_display() {
        let err = SparseError::VectorLength {
            expected: 4,
            got: 5,
        };
        assert!(err.to_string().contains('4'));
        assert!(err.is_shape_error());
    }
}
