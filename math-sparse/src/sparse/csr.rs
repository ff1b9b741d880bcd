//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts

use crate::error::{Result, SparseError};
use ndarray::Array1;
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Row count from which `matvec` is split across threads
#[cfg(feature = "rayon")]
const PARALLEL_ROWS: usize = 256;

/// Compressed Sparse Row (CSR) matrix of real values
///
/// Column indices within a row are kept sorted and unique.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Non-zero values in row-major order
    pub values: Vec<f64>,
    /// Column indices for each value
    pub col_indices: Vec<usize>,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of non-zeros)
    pub row_ptrs: Vec<usize>,
}

impl CsrMatrix {
    /// Create a new empty CSR matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
        }
    }

    /// Create a CSR matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed, so an
    /// interpolation stencil touching the same column twice collapses into
    /// a single stored value.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, f64)>,
    ) -> Self {
        if triplets.is_empty() {
            return Self::new(num_rows, num_cols);
        }

        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut col_indices = Vec::with_capacity(triplets.len());
        let mut row_counts = vec![0usize; num_rows];

        let mut prev: Option<(usize, usize)> = None;
        for (row, col, val) in triplets {
            if prev == Some((row, col)) {
                if let Some(last) = values.last_mut() {
                    *last += val;
                }
                continue;
            }
            values.push(val);
            col_indices.push(col);
            row_counts[row] += 1;
            prev = Some((row, col));
        }

        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        for count in row_counts {
            let last = row_ptrs[row_ptrs.len() - 1];
            row_ptrs.push(last + count);
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let range = self.row_range(i);
        match self.col_indices[range.clone()].binary_search(&j) {
            Ok(offset) => self.values[range.start + offset],
            Err(_) => 0.0,
        }
    }

    /// Sum of each row
    pub fn row_sums(&self) -> Array1<f64> {
        (0..self.num_rows)
            .map(|i| self.row_entries(i).map(|(_, v)| v).sum::<f64>())
            .collect()
    }

    fn row_dot(&self, row: usize, x: &Array1<f64>) -> f64 {
        self.row_entries(row).map(|(j, v)| v * x[j]).sum()
    }

    /// Matrix-vector product: y = A * x
    ///
    /// Uses parallel processing when the `rayon` feature is enabled and the
    /// matrix is large enough to benefit from parallelization.
    pub fn matvec(&self, x: &Array1<f64>) -> Array1<f64> {
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");

        #[cfg(feature = "rayon")]
        {
            if self.num_rows >= PARALLEL_ROWS {
                return self.matvec_parallel(x);
            }
        }

        (0..self.num_rows).map(|i| self.row_dot(i, x)).collect()
    }

    #[cfg(feature = "rayon")]
    fn matvec_parallel(&self, x: &Array1<f64>) -> Array1<f64> {
        let results: Vec<f64> = (0..self.num_rows)
            .into_par_iter()
            .map(|i| self.row_dot(i, x))
            .collect();

        Array1::from_vec(results)
    }

    /// Transpose matrix-vector product: y = A^T * x
    pub fn matvec_transpose(&self, x: &Array1<f64>) -> Array1<f64> {
        assert_eq!(x.len(), self.num_rows, "Input vector size mismatch");

        let mut y = Array1::zeros(self.num_cols);
        for i in 0..self.num_rows {
            for (j, v) in self.row_entries(i) {
                y[j] += v * x[i];
            }
        }
        y
    }

    /// Matrix-vector product that reports a length mismatch instead of panicking
    pub fn checked_matvec(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.num_cols {
            return Err(SparseError::VectorLength {
                expected: self.num_cols,
                got: x.len(),
            });
        }
        Ok(self.matvec(x))
    }

    /// Transpose product that reports a length mismatch instead of panicking
    pub fn checked_matvec_transpose(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.num_rows {
            return Err(SparseError::VectorLength {
                expected: self.num_rows,
                got: x.len(),
            });
        }
        Ok(self.matvec_transpose(x))
    }

    /// Element-wise difference A - B
    ///
    /// Entries that cancel exactly are not stored.
    pub fn try_sub(&self, other: &CsrMatrix) -> Result<CsrMatrix> {
        if self.shape() != other.shape() {
            return Err(SparseError::DimensionMismatch {
                op: "sub",
                left: self.shape(),
                right: other.shape(),
            });
        }

        let mut builder =
            CsrBuilder::with_capacity(self.num_rows, self.num_cols, self.nnz() + other.nnz());

        for i in 0..self.num_rows {
            let mut merged: Vec<(usize, f64)> = Vec::new();
            let mut a = self.row_entries(i).peekable();
            let mut b = other.row_entries(i).peekable();

            loop {
                match (a.peek().copied(), b.peek().copied()) {
                    (Some((ja, va)), Some((jb, vb))) => {
                        if ja == jb {
                            merged.push((ja, va - vb));
                            a.next();
                            b.next();
                        } else if ja < jb {
                            merged.push((ja, va));
                            a.next();
                        } else {
                            merged.push((jb, -vb));
                            b.next();
                        }
                    }
                    (Some((ja, va)), None) => {
                        merged.push((ja, va));
                        a.next();
                    }
                    (None, Some((jb, vb))) => {
                        merged.push((jb, -vb));
                        b.next();
                    }
                    (None, None) => break,
                }
            }

            builder.add_row_entries(merged.into_iter());
        }

        Ok(builder.finish())
    }
}

/// Builder for constructing CSR matrices row by row
pub struct CsrBuilder {
    num_rows: usize,
    num_cols: usize,
    values: Vec<f64>,
    col_indices: Vec<usize>,
    row_ptrs: Vec<usize>,
    current_row: usize,
}

impl CsrBuilder {
    /// Create a new CSR builder with estimated non-zeros
    pub fn with_capacity(num_rows: usize, num_cols: usize, nnz_estimate: usize) -> Self {
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        Self {
            num_rows,
            num_cols,
            values: Vec::with_capacity(nnz_estimate),
            col_indices: Vec::with_capacity(nnz_estimate),
            row_ptrs,
            current_row: 0,
        }
    }

    /// Add entries for the current row (must be added in column order)
    ///
    /// Exact zeros are skipped.
    pub fn add_row_entries(&mut self, entries: impl Iterator<Item = (usize, f64)>) {
        for (col, val) in entries {
            if val != 0.0 {
                self.values.push(val);
                self.col_indices.push(col);
            }
        }
        self.row_ptrs.push(self.values.len());
        self.current_row += 1;
    }

    /// Finish building and return the CSR matrix
    pub fn finish(mut self) -> CsrMatrix {
        while self.current_row < self.num_rows {
            self.row_ptrs.push(self.values.len());
            self.current_row += 1;
        }

        CsrMatrix {
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            values: self.values,
            col_indices: self.col_indices,
            row_ptrs: self.row_ptrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample() -> CsrMatrix {
        // [1 0 2]
        // [0 3 0]
        CsrMatrix::from_triplets(2, 3, vec![(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)])
    }

    #[test]
    fn test_csr_triplets_duplicate() {
        let triplets = vec![(1, 1, 3.0), (0, 0, 1.0), (0, 0, 2.0)];

        let csr = CsrMatrix::from_triplets(3, 2, triplets);

        assert_eq!(csr.nnz(), 2);
        assert_relative_eq!(csr.get(0, 0), 3.0);
        assert_relative_eq!(csr.get(1, 1), 3.0);
        assert_relative_eq!(csr.get(1, 0), 0.0);
        // Trailing empty row
        assert_eq!(csr.row_range(2).len(), 0);
    }

    #[test]
    fn test_csr_matvec_and_transpose() {
        let csr = sample();

        let y = csr.matvec(&array![1.0, 2.0, 3.0]);
        assert_relative_eq!(y[0], 7.0);
        assert_relative_eq!(y[1], 6.0);

        let z = csr.matvec_transpose(&array![1.0, 2.0]);
        assert_eq!(z.len(), 3);
        assert_relative_eq!(z[0], 1.0);
        assert_relative_eq!(z[1], 6.0);
        assert_relative_eq!(z[2], 2.0);
    }

    #[test]
    fn test_large_matvec_matches_row_sums() {
        // Tall enough to take the parallel path with the rayon feature
        let n = 1000;
        let triplets = (0..n)
            .flat_map(|i| [(i, i % 7, 0.5), (i, 7 + i % 3, 0.25)])
            .collect();
        let csr = CsrMatrix::from_triplets(n, 10, triplets);

        let y = csr.matvec(&Array1::ones(10));

        assert_eq!(y.len(), n);
        assert_eq!(y, csr.row_sums());
        assert_relative_eq!(y[999], 0.75);
    }

    #[test]
    fn test_try_sub_cancels_shared_entries() {
        let a = CsrMatrix::from_triplets(1, 3, vec![(0, 0, 0.5), (0, 1, 0.5)]);
        let b = CsrMatrix::from_triplets(1, 3, vec![(0, 1, 0.5), (0, 2, 0.5)]);

        let d = a.try_sub(&b).unwrap();

        assert_eq!(d.nnz(), 2);
        assert_relative_eq!(d.get(0, 0), 0.5);
        assert_relative_eq!(d.get(0, 1), 0.0);
        assert_relative_eq!(d.get(0, 2), -0.5);
        assert_relative_eq!(d.row_sums()[0], 0.0);
    }

    #[test]
    fn test_try_sub_shape_mismatch() {
        let a = CsrMatrix::new(2, 3);
        let b = CsrMatrix::new(3, 3);

        let err = a.try_sub(&b).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_checked_matvec_reports_length() {
        let csr = sample();
        assert!(csr.checked_matvec(&array![1.0, 2.0]).is_err());
        assert!(csr.checked_matvec_transpose(&array![1.0, 2.0, 3.0]).is_err());
        assert!(csr.checked_matvec_transpose(&array![1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_csr_builder_skips_zeros() {
        let mut builder = CsrBuilder::with_capacity(3, 3, 4);

        builder.add_row_entries([(0, 1.0), (1, 0.0), (2, 2.0)].into_iter());
        builder.add_row_entries([(1, 3.0), (2, -0.0)].into_iter());

        let csr = builder.finish();

        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.row_ptrs, vec![0, 2, 3, 3]);
        assert_eq!(csr.col_indices, vec![0, 2, 1]);
        assert_relative_eq!(csr.get(1, 1), 3.0);
    }
}
