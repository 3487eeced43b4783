//! Error types for sparse matrix operations.
//!
//! This module provides structured error handling for the sparse matrix
//! engine, using `thiserror` for library error types with helper methods
//! for error categorization.

use thiserror::Error;

/// Errors that can occur during sparse matrix operations.
#[derive(Debug, Error)]
pub enum SparseMatrixError {
    /// A coordinate falls outside the matrix bounds.
    #[error("coordinates ({row}, {col}) out of range for {nrows}x{ncols} matrix")]
    OutOfRange {
        /// Requested row index
        row: usize,
        /// Requested column index
        col: usize,
        /// Number of rows in the matrix
        nrows: usize,
        /// Number of columns in the matrix
        ncols: usize,
    },

    /// Operand shapes are not conformable for the requested operation.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: Vec<usize>,
        /// Actual dimensions provided
        got: Vec<usize>,
    },

    /// A matrix was constructed with a zero dimension.
    #[error("matrix dimensions must be at least 1x1, got {nrows}x{ncols}")]
    EmptyDimension {
        /// Requested number of rows
        nrows: usize,
        /// Requested number of columns
        ncols: usize,
    },
}

/// A specialized `Result` type for sparse matrix operations.
pub type Result<T> = std::result::Result<T, SparseMatrixError>;

impl SparseMatrixError {
    /// Returns `true` if this is a coordinate range error.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SparseMatrixError::OutOfRange { .. })
    }

    /// Returns `true` if this is a shape conformability error.
    ///
    /// This includes `DimensionMismatch` and `EmptyDimension` variants.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SparseMatrixError::DimensionMismatch { .. }
                | SparseMatrixError::EmptyDimension { .. }
        )
    }
}
