//! Sparse matrix structures (CSR format)
//!
//! This module provides the Compressed Sparse Row (CSR) storage engine:
//! element access and mutation under a canonical sorted representation,
//! matrix-vector and matrix-matrix products, and matrix addition.

mod csr;

pub use csr::{SparseMatrix, SparseMatrixBuilder};
