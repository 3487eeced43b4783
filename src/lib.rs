//! Generic sparse matrix container in CSR format
//!
//! This crate provides a compressed-row sparse matrix for numerical clients
//! that need O(nnz) memory instead of O(m·n) for matrices dominated by zero.
//!
//! # Features
//!
//! - **Element access**: `get`/`set` by coordinate with binary search per row
//! - **Canonical storage**: sorted column indices, zeros never stored, so
//!   structural equality is semantic equality
//! - **Products**: matrix-vector (O(nnz)) and matrix-matrix (row-wise sparse
//!   accumulation) products, matrix addition
//! - **Bulk construction**: COO triplet constructor and a row-by-row builder
//! - **Generic Scalar Types**: works with f64, f32, integers, Complex64
//!
//! # Example
//!
//! ```
//! use sparse_matrix::SparseMatrix;
//! use ndarray::array;
//!
//! # fn main() -> sparse_matrix::Result<()> {
//! let mut a = SparseMatrix::<f64>::square(3)?;
//! a.set(1.0, 0, 0)?.set(2.0, 1, 1)?.set(3.0, 2, 2)?;
//!
//! let y = a.multiply_vector(&array![1.0, 1.0, 1.0])?;
//! assert_eq!(y, array![1.0, 2.0, 3.0]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use error::{Result, SparseMatrixError};
pub use sparse::{SparseMatrix, SparseMatrixBuilder};
pub use traits::Scalar;
