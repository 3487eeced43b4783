//! Compressed Sparse Row (CSR) matrix storage
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts
//!
//! The representation is kept canonical at all times: column indices within
//! a row are strictly increasing and zero-valued entries are never stored.
//! Canonical form is what makes structural comparison of two matrices
//! equivalent to semantic equality, independent of the insertion order used
//! to build each side.

use crate::error::{Result, SparseMatrixError};
use crate::traits::Scalar;
use ndarray::Array1;
use num_traits::One;
use std::fmt;
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Row count above which the matrix-vector product switches to the
/// data-parallel path.
#[cfg(feature = "rayon")]
const PARALLEL_ROW_THRESHOLD: usize = 512;

/// Sparse matrix in Compressed Sparse Row (CSR) format.
///
/// Memory-efficient storage for matrices dominated by zero: O(nnz + nrows)
/// space instead of O(nrows * ncols). Matrix-vector products are O(nnz).
///
/// Mutation goes through [`set`](SparseMatrix::set), which maintains sorted,
/// duplicate-free column indices per row and evicts entries that become
/// zero. Bulk construction should prefer [`SparseMatrix::from_triplets`] or
/// [`SparseMatrixBuilder`], which avoid the per-entry row-pointer shift.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T: Scalar> {
    nrows: usize,
    ncols: usize,
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_ptrs: Vec<usize>,
}

impl<T: Scalar> SparseMatrix<T> {
    /// Create a new empty matrix with the given dimensions.
    ///
    /// Every entry of the new matrix reads as zero.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::EmptyDimension`] if either dimension is 0.
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        Self::check_shape(nrows, ncols)?;
        Ok(Self {
            nrows,
            ncols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; nrows + 1],
        })
    }

    /// Create a new empty square matrix with `n` rows and columns.
    pub fn square(n: usize) -> Result<Self> {
        Self::new(n, n)
    }

    /// Create a new empty matrix with pre-allocated capacity for
    /// `nnz_estimate` non-zero entries.
    pub fn with_capacity(nrows: usize, ncols: usize, nnz_estimate: usize) -> Result<Self> {
        Self::check_shape(nrows, ncols)?;
        Ok(Self {
            nrows,
            ncols,
            values: Vec::with_capacity(nnz_estimate),
            col_indices: Vec::with_capacity(nnz_estimate),
            row_ptrs: vec![0; nrows + 1],
        })
    }

    /// Create the `n` by `n` identity matrix.
    pub fn identity(n: usize) -> Result<Self>
    where
        T: One,
    {
        Self::check_shape(n, n)?;
        Ok(Self {
            nrows: n,
            ncols: n,
            values: vec![T::one(); n],
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        })
    }

    /// Create a matrix from COO (coordinate) format triplets.
    ///
    /// Triplets are `(row, col, value)` in any order. Duplicate coordinates
    /// are summed; entries that are zero (or sum to zero) are not stored.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::EmptyDimension`] if either dimension is 0,
    /// or [`SparseMatrixError::OutOfRange`] if any triplet coordinate falls
    /// outside the matrix. No partial matrix is built in the error case.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        Self::check_shape(nrows, ncols)?;
        for &(row, col, _) in &triplets {
            if row >= nrows || col >= ncols {
                return Err(SparseMatrixError::OutOfRange {
                    row,
                    col,
                    nrows,
                    ncols,
                });
            }
        }

        // Sort by row, then by column
        triplets.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut values = Vec::with_capacity(triplets.len());
        let mut col_indices = Vec::with_capacity(triplets.len());
        let mut row_counts = vec![0usize; nrows + 1];

        let mut iter = triplets.into_iter();
        if let Some((first_row, first_col, first_val)) = iter.next() {
            let mut cur_row = first_row;
            let mut cur_col = first_col;
            let mut acc = first_val;

            let mut flush = |row: usize, col: usize, val: T| {
                if val != T::zero() {
                    values.push(val);
                    col_indices.push(col);
                    row_counts[row + 1] += 1;
                }
            };

            for (row, col, val) in iter {
                if row == cur_row && col == cur_col {
                    acc += val;
                } else {
                    flush(cur_row, cur_col, acc);
                    cur_row = row;
                    cur_col = col;
                    acc = val;
                }
            }
            flush(cur_row, cur_col, acc);
        }

        // Prefix-sum the per-row counts into row pointers
        for row in 0..nrows {
            row_counts[row + 1] += row_counts[row];
        }

        Ok(Self {
            nrows,
            ncols,
            values,
            col_indices,
            row_ptrs: row_counts,
        })
    }

    fn check_shape(nrows: usize, ncols: usize) -> Result<()> {
        if nrows == 0 || ncols == 0 {
            return Err(SparseMatrixError::EmptyDimension { nrows, ncols });
        }
        Ok(())
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Matrix shape as `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no entries are stored (every position reads zero).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of stored entries in a single row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= nrows` (only in debug mode).
    pub fn row_nnz(&self, row: usize) -> usize {
        debug_assert!(row < self.nrows);
        self.row_ptrs[row + 1] - self.row_ptrs[row]
    }

    /// Fraction of positions holding a stored entry.
    pub fn sparsity(&self) -> f64 {
        self.nnz() as f64 / (self.nrows * self.ncols) as f64
    }

    /// Stored values, ordered by (row, column).
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Column index of each stored value.
    #[inline]
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Row pointers: `row_ptrs[r]` is the offset in values/col_indices where
    /// row `r` begins; `row_ptrs[nrows]` equals [`nnz`](SparseMatrix::nnz).
    #[inline]
    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    #[inline]
    fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    fn validate_coordinates(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.nrows || col >= self.ncols {
            return Err(SparseMatrixError::OutOfRange {
                row,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        Ok(())
    }

    /// Locate `col` within a row's sorted column slice.
    ///
    /// `Ok(idx)` is the absolute index of a stored entry, `Err(idx)` the
    /// absolute index at which a new entry would be inserted.
    fn search_row(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let range = self.row_range(row);
        let start = range.start;
        match self.col_indices[range].binary_search(&col) {
            Ok(pos) => Ok(start + pos),
            Err(pos) => Err(start + pos),
        }
    }

    /// Get the element at `(row, col)`.
    ///
    /// Returns the stored value, or zero if the position holds no entry.
    /// O(log k) for k entries in the row.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::OutOfRange`] if the coordinates fall
    /// outside the matrix. Coordinates are never clamped.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.validate_coordinates(row, col)?;
        match self.search_row(row, col) {
            Ok(idx) => Ok(self.values[idx]),
            Err(_) => Ok(T::zero()),
        }
    }

    /// Set the element at `(row, col)` to `value`.
    ///
    /// Setting a non-zero value overwrites or inserts the entry at its sorted
    /// position; setting zero removes any stored entry so that zeros are
    /// never materialized. Returns `&mut self` for fluent chaining:
    ///
    /// ```
    /// # use sparse_matrix::SparseMatrix;
    /// # fn main() -> sparse_matrix::Result<()> {
    /// let mut m = SparseMatrix::<f64>::square(3)?;
    /// m.set(1.0, 0, 0)?.set(2.0, 1, 1)?.set(3.0, 2, 2)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Structural changes shift the row pointers of every later row, so a
    /// single call is O(k + nrows) in the worst case.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::OutOfRange`] if the coordinates fall
    /// outside the matrix; the matrix is not modified in that case.
    pub fn set(&mut self, value: T, row: usize, col: usize) -> Result<&mut Self> {
        self.validate_coordinates(row, col)?;
        match self.search_row(row, col) {
            Ok(idx) => {
                if value != T::zero() {
                    self.values[idx] = value;
                } else {
                    self.remove_entry(idx, row);
                }
            }
            Err(idx) => {
                if value != T::zero() {
                    self.insert_entry(idx, row, col, value);
                }
            }
        }
        Ok(self)
    }

    fn insert_entry(&mut self, idx: usize, row: usize, col: usize, value: T) {
        self.values.insert(idx, value);
        self.col_indices.insert(idx, col);
        for ptr in &mut self.row_ptrs[row + 1..] {
            *ptr += 1;
        }
    }

    fn remove_entry(&mut self, idx: usize, row: usize) {
        self.values.remove(idx);
        self.col_indices.remove(idx);
        for ptr in &mut self.row_ptrs[row + 1..] {
            *ptr -= 1;
        }
    }

    /// Get the `(col, value)` pairs of a row, in ascending column order.
    ///
    /// # Panics
    ///
    /// Panics if `row >= nrows` (only in debug mode).
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        debug_assert!(row < self.nrows);
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Iterate over all stored entries as `(row, col, value)` triplets, in
    /// (row, column) order.
    ///
    /// The iterator is finite and restartable; call again for a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.nrows).flat_map(move |row| {
            self.row_entries(row)
                .map(move |(col, value)| (row, col, value))
        })
    }

    /// Matrix-vector product: y = A * x.
    ///
    /// O(nnz). With the `rayon` feature enabled, rows are computed in
    /// parallel once the matrix is large enough to benefit; results are
    /// identical either way.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::DimensionMismatch`] if `x.len() != ncols`.
    pub fn multiply_vector(&self, x: &Array1<T>) -> Result<Array1<T>> {
        if x.len() != self.ncols {
            return Err(SparseMatrixError::DimensionMismatch {
                expected: vec![self.ncols],
                got: vec![x.len()],
            });
        }

        #[cfg(feature = "rayon")]
        {
            if self.nrows >= PARALLEL_ROW_THRESHOLD {
                return Ok(self.matvec_parallel(x));
            }
        }

        Ok(self.matvec_sequential(x))
    }

    fn matvec_sequential(&self, x: &Array1<T>) -> Array1<T> {
        let mut y = Array1::from_elem(self.nrows, T::zero());

        for row in 0..self.nrows {
            let mut sum = T::zero();
            for idx in self.row_range(row) {
                sum += self.values[idx] * x[self.col_indices[idx]];
            }
            y[row] = sum;
        }

        y
    }

    #[cfg(feature = "rayon")]
    fn matvec_parallel(&self, x: &Array1<T>) -> Array1<T> {
        let x_slice = x.as_slice().expect("Array should be contiguous");

        let results: Vec<T> = (0..self.nrows)
            .into_par_iter()
            .map(|row| {
                let mut sum = T::zero();
                for idx in self.row_range(row) {
                    sum += self.values[idx] * x_slice[self.col_indices[idx]];
                }
                sum
            })
            .collect();

        Array1::from_vec(results)
    }

    /// Matrix-matrix product: C = A * B.
    ///
    /// Row-wise sparse accumulation: for each row of A, the scaled rows of B
    /// are expanded, sorted by destination column, and merge-summed. Sums
    /// that cancel to zero are dropped, so the result is canonical. Cost is
    /// proportional to the number of scalar products, not to the dense shape.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::DimensionMismatch`] if
    /// `self.ncols != other.nrows`. No partial result is constructed.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.ncols != other.nrows {
            return Err(SparseMatrixError::DimensionMismatch {
                expected: vec![self.ncols],
                got: vec![other.nrows],
            });
        }

        if self.is_empty() || other.is_empty() {
            return Self::new(self.nrows, other.ncols);
        }

        let mut result = Self::with_capacity(self.nrows, other.ncols, self.nnz())?;
        let mut row_data: Vec<(usize, T)> = Vec::new();

        for i in 0..self.nrows {
            row_data.clear();
            for (k, a_val) in self.row_entries(i) {
                for (j, b_val) in other.row_entries(k) {
                    row_data.push((j, a_val * b_val));
                }
            }

            if !row_data.is_empty() {
                row_data.sort_by_key(|&(j, _)| j);

                let mut cur_col = row_data[0].0;
                let mut acc = row_data[0].1;
                for &(j, val) in &row_data[1..] {
                    if j == cur_col {
                        acc += val;
                    } else {
                        if acc != T::zero() {
                            result.values.push(acc);
                            result.col_indices.push(cur_col);
                        }
                        cur_col = j;
                        acc = val;
                    }
                }
                if acc != T::zero() {
                    result.values.push(acc);
                    result.col_indices.push(cur_col);
                }
            }

            result.row_ptrs[i + 1] = result.values.len();
        }

        log::debug!(
            "sparse product {}x{} * {}x{}: {} stored entries in result",
            self.nrows,
            self.ncols,
            other.nrows,
            other.ncols,
            result.nnz()
        );

        Ok(result)
    }

    /// Matrix addition: C = A + B.
    ///
    /// Per-row merge of the operands' sorted column slices. Positions present
    /// in both operands are summed; sums that cancel to zero are not stored.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::DimensionMismatch`] if the shapes differ.
    /// No partial result is constructed.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.shape() != other.shape() {
            return Err(SparseMatrixError::DimensionMismatch {
                expected: vec![self.nrows, self.ncols],
                got: vec![other.nrows, other.ncols],
            });
        }

        let mut result = Self::with_capacity(self.nrows, self.ncols, self.nnz() + other.nnz())?;

        for row in 0..self.nrows {
            let mut lhs = self.row_entries(row).peekable();
            let mut rhs = other.row_entries(row).peekable();

            loop {
                let entry = match (lhs.peek().copied(), rhs.peek().copied()) {
                    (Some((lc, lv)), Some((rc, rv))) => {
                        if lc < rc {
                            lhs.next();
                            (lc, lv)
                        } else if rc < lc {
                            rhs.next();
                            (rc, rv)
                        } else {
                            lhs.next();
                            rhs.next();
                            (lc, lv + rv)
                        }
                    }
                    (Some((lc, lv)), None) => {
                        lhs.next();
                        (lc, lv)
                    }
                    (None, Some((rc, rv))) => {
                        rhs.next();
                        (rc, rv)
                    }
                    (None, None) => break,
                };

                let (col, sum) = entry;
                if sum != T::zero() {
                    result.values.push(sum);
                    result.col_indices.push(col);
                }
            }

            result.row_ptrs[row + 1] = result.values.len();
        }

        Ok(result)
    }
}

/// Prints the matrix as a dense grid: one line per row, entries separated by
/// single spaces, unstored positions rendered as zero. O(nrows * ncols);
/// intended for small or diagnostic matrices.
impl<T: Scalar> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.nrows {
            let mut entries = self.row_entries(row).peekable();
            for col in 0..self.ncols {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match entries.peek().copied() {
                    Some((c, v)) if c == col => {
                        entries.next();
                        write!(f, "{}", v)?;
                    }
                    _ => write!(f, "{}", T::zero())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builder for constructing sparse matrices row by row.
///
/// Avoids the per-entry row-pointer shift of [`SparseMatrix::set`] during
/// bulk assembly. Rows must be supplied in order; entries within a row must
/// arrive in ascending column order.
pub struct SparseMatrixBuilder<T: Scalar> {
    nrows: usize,
    ncols: usize,
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_ptrs: Vec<usize>,
    current_row: usize,
}

impl<T: Scalar> SparseMatrixBuilder<T> {
    /// Create a new builder for an `nrows` by `ncols` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SparseMatrixError::EmptyDimension`] if either dimension is 0.
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        Self::with_capacity(nrows, ncols, 0)
    }

    /// Create a new builder with estimated non-zero capacity.
    pub fn with_capacity(nrows: usize, ncols: usize, nnz_estimate: usize) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(SparseMatrixError::EmptyDimension { nrows, ncols });
        }
        let mut row_ptrs = Vec::with_capacity(nrows + 1);
        row_ptrs.push(0);
        Ok(Self {
            nrows,
            ncols,
            values: Vec::with_capacity(nnz_estimate),
            col_indices: Vec::with_capacity(nnz_estimate),
            row_ptrs,
            current_row: 0,
        })
    }

    /// Append the entries of the next row (must be in ascending column order).
    ///
    /// Zero values are skipped, keeping the result canonical.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if more than `nrows` rows are added, a column is
    /// out of range, or columns arrive out of order.
    pub fn add_row_entries(&mut self, entries: impl IntoIterator<Item = (usize, T)>) {
        debug_assert!(self.current_row < self.nrows);
        let row_start = self.values.len();
        for (col, val) in entries {
            debug_assert!(col < self.ncols);
            debug_assert!(
                self.col_indices.len() == row_start || *self.col_indices.last().unwrap() < col
            );
            if val != T::zero() {
                self.values.push(val);
                self.col_indices.push(col);
            }
        }
        self.row_ptrs.push(self.values.len());
        self.current_row += 1;
    }

    /// Finish building and return the matrix.
    ///
    /// Rows that were never supplied are left empty.
    pub fn finish(mut self) -> SparseMatrix<T> {
        while self.current_row < self.nrows {
            self.row_ptrs.push(self.values.len());
            self.current_row += 1;
        }

        SparseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            values: self.values,
            col_indices: self.col_indices,
            row_ptrs: self.row_ptrs,
        }
    }
}
