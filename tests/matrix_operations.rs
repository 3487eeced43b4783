//! End-to-end tests of the sparse matrix engine
//!
//! These tests exercise the public surface the way a numerical client would:
//! building matrices through different construction paths, mutating them,
//! and checking the arithmetic operations against hand-computed results.

use approx::assert_relative_eq;
use ndarray::array;
use num_complex::Complex64;
use sparse_matrix::{Result, SparseMatrix, SparseMatrixBuilder};

/// Check the canonical-form invariants on the raw backing arrays.
fn assert_canonical<T: sparse_matrix::Scalar>(m: &SparseMatrix<T>) {
    let row_ptrs = m.row_ptrs();
    assert_eq!(row_ptrs.len(), m.nrows() + 1);
    assert_eq!(row_ptrs[0], 0);
    assert_eq!(row_ptrs[m.nrows()], m.nnz());
    assert_eq!(m.values().len(), m.nnz());
    assert_eq!(m.col_indices().len(), m.nnz());

    for row in 0..m.nrows() {
        assert!(row_ptrs[row] <= row_ptrs[row + 1]);
        let cols = &m.col_indices()[row_ptrs[row]..row_ptrs[row + 1]];
        for pair in cols.windows(2) {
            assert!(pair[0] < pair[1], "columns not strictly increasing");
        }
        for &col in cols {
            assert!(col < m.ncols());
        }
    }

    for &value in m.values() {
        assert!(value != T::zero(), "stored zero violates canonical form");
    }
}

#[test]
fn diagonal_times_ones() -> Result<()> {
    let mut m = SparseMatrix::<f64>::square(3)?;
    m.set(1.0, 0, 0)?.set(2.0, 1, 1)?.set(3.0, 2, 2)?;

    let y = m.multiply_vector(&array![1.0, 1.0, 1.0])?;
    assert_eq!(y, array![1.0, 2.0, 3.0]);

    assert_canonical(&m);
    Ok(())
}

#[test]
fn addition_scenario() -> Result<()> {
    // A = [[1, 0], [0, 2]], B = [[0, 3], [4, 0]]
    let a = SparseMatrix::from_triplets(2, 2, vec![(0, 0, 1.0), (1, 1, 2.0)])?;
    let b = SparseMatrix::from_triplets(2, 2, vec![(0, 1, 3.0), (1, 0, 4.0)])?;

    let c = a.add(&b)?;
    let expected = SparseMatrix::from_triplets(
        2,
        2,
        vec![(0, 0, 1.0), (0, 1, 3.0), (1, 0, 4.0), (1, 1, 2.0)],
    )?;

    assert_eq!(c, expected);
    assert_eq!(c, b.add(&a)?);
    assert_canonical(&c);
    Ok(())
}

#[test]
fn product_scenario() -> Result<()> {
    // A = [[1, 0, 2], [0, 3, 0]], B = [[1, 0], [0, 1], [4, 0]]
    let a = SparseMatrix::from_triplets(2, 3, vec![(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)])?;
    let b = SparseMatrix::from_triplets(3, 2, vec![(0, 0, 1.0), (1, 1, 1.0), (2, 0, 4.0)])?;

    let c = a.multiply(&b)?;

    assert_eq!(c.shape(), (2, 2));
    assert_relative_eq!(c.get(0, 0)?, 9.0);
    assert_relative_eq!(c.get(0, 1)?, 0.0);
    assert_relative_eq!(c.get(1, 0)?, 0.0);
    assert_relative_eq!(c.get(1, 1)?, 3.0);
    assert_canonical(&c);
    Ok(())
}

#[test]
fn get_after_set_over_full_grid() -> Result<()> {
    let mut m = SparseMatrix::<i64>::new(4, 5)?;

    // Anti-diagonal-ish fill in scattered order
    let coords = [(3, 0), (0, 4), (2, 2), (1, 3), (0, 0), (3, 4), (2, 0)];
    for (i, &(r, c)) in coords.iter().enumerate() {
        let v = (i as i64) + 1;
        m.set(v, r, c)?;
        assert_eq!(m.get(r, c)?, v);
    }
    assert_eq!(m.nnz(), coords.len());

    // Positions never set read as zero
    assert_eq!(m.get(1, 1)?, 0);
    assert_eq!(m.get(3, 3)?, 0);

    assert_canonical(&m);
    Ok(())
}

#[test]
fn setting_zero_evicts_storage() -> Result<()> {
    let mut m = SparseMatrix::<f64>::square(3)?;
    m.set(5.0, 1, 1)?;
    assert_eq!(m.nnz(), 1);

    m.set(0.0, 1, 1)?;
    assert_eq!(m.nnz(), 0);
    assert_relative_eq!(m.get(1, 1)?, 0.0);

    // A second zero-set at the same place changes nothing
    m.set(0.0, 1, 1)?;
    assert_eq!(m.nnz(), 0);

    assert_canonical(&m);
    Ok(())
}

#[test]
fn construction_paths_agree() -> Result<()> {
    let triplets = vec![(0, 1, 2.0), (1, 0, -1.0), (1, 2, 4.0), (2, 2, 5.0)];

    let bulk = SparseMatrix::from_triplets(3, 3, triplets.clone())?;

    let mut incremental = SparseMatrix::<f64>::square(3)?;
    for &(r, c, v) in triplets.iter().rev() {
        incremental.set(v, r, c)?;
    }

    let mut builder = SparseMatrixBuilder::<f64>::new(3, 3)?;
    builder.add_row_entries([(1, 2.0)]);
    builder.add_row_entries([(0, -1.0), (2, 4.0)]);
    builder.add_row_entries([(2, 5.0)]);
    let built = builder.finish();

    assert_eq!(bulk, incremental);
    assert_eq!(bulk, built);
    Ok(())
}

#[test]
fn failures_never_mutate() -> Result<()> {
    let mut a = SparseMatrix::from_triplets(2, 2, vec![(0, 0, 1.0)])?;
    let snapshot = a.clone();

    assert!(a.set(9.0, 5, 0).unwrap_err().is_out_of_range());
    assert!(a.get(0, 9).unwrap_err().is_out_of_range());

    let b = SparseMatrix::<f64>::new(3, 3)?;
    assert!(a.add(&b).unwrap_err().is_dimension_error());
    assert!(a.multiply(&b).unwrap_err().is_dimension_error());
    assert!(a
        .multiply_vector(&array![1.0, 2.0, 3.0])
        .unwrap_err()
        .is_dimension_error());

    assert_eq!(a, snapshot);
    Ok(())
}

#[test]
fn complex_elements() -> Result<()> {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);

    let mut m = SparseMatrix::<Complex64>::square(2)?;
    m.set(i, 0, 1)?.set(-i, 1, 0)?;

    // [[0, i], [-i, 0]]^2 = [[1, 0], [0, 1]]
    let squared = m.multiply(&m)?;
    assert_eq!(squared.get(0, 0)?, one);
    assert_eq!(squared.get(1, 1)?, one);
    assert_eq!(squared.nnz(), 2);

    // i + (-i) cancels and must evict the entry
    let mut negated = SparseMatrix::<Complex64>::square(2)?;
    negated.set(-i, 0, 1)?.set(i, 1, 0)?;
    let sum = m.add(&negated)?;
    assert_eq!(sum.nnz(), 0);

    assert_canonical(&squared);
    Ok(())
}

#[test]
fn display_renders_dense_grid() -> Result<()> {
    let mut m = SparseMatrix::<i64>::new(2, 3)?;
    m.set(1, 0, 0)?.set(2, 0, 2)?.set(3, 1, 1)?;

    assert_eq!(m.to_string(), "1 0 2\n0 3 0\n");
    Ok(())
}

#[test]
fn iteration_matches_storage() -> Result<()> {
    let triplets = vec![(0, 0, 1.5), (0, 2, 2.5), (1, 1, 3.5), (2, 0, 4.5)];
    let m = SparseMatrix::from_triplets(3, 3, triplets.clone())?;

    let collected: Vec<_> = m.iter().collect();
    assert_eq!(collected, triplets);
    assert_eq!(m.iter().count(), m.nnz());
    Ok(())
}
