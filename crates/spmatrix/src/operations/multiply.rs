//! Sparse-dense multiply-accumulate kernels.
//!
//! Every kernel iterates the stored entries of the sparse operand and never
//! touches its implicit zeros. For an entry `v` of `op(B)` at `(k, j)`:
//!
//! ```text
//! C[:, j] += (alpha * v) * op(A)[:, k]
//! ```

use tracing::debug;

use crate::dense_matrix::DenseMatrix;
use crate::error::MatrixError;
use crate::operations::dense::{check_inner_dims, op_shape, prepare_weighted_output};
use crate::scalar::Scalar;
use crate::sparse_matrix::SparseMatrix;
use crate::storage::{SparseFormat, SparseStorage};

/// Column `k` of `op(A)` read through a transpose flag.
#[derive(Clone, Copy)]
struct DenseOperand<'a, ElT: Scalar> {
    data: &'a [ElT],
    rows: usize,
    transpose: bool,
}

impl<'a, ElT: Scalar> DenseOperand<'a, ElT> {
    fn new(a: &'a DenseMatrix<ElT>, transpose: bool) -> Self {
        Self {
            data: a.data(),
            rows: a.rows(),
            transpose,
        }
    }

    /// `dst += scale * op(A)[:, k]`.
    #[inline]
    fn axpy_column(&self, k: usize, scale: ElT, dst: &mut [ElT]) {
        if self.transpose {
            // op(A)[i, k] = A[k, i]
            for (i, x) in dst.iter_mut().enumerate() {
                *x += scale * self.data[k + i * self.rows];
            }
        } else {
            let col = &self.data[k * self.rows..(k + 1) * self.rows];
            for (x, &a) in dst.iter_mut().zip(col) {
                *x += scale * a;
            }
        }
    }
}

/// Stored entries of `op(B)` as `(k, j, v)`.
fn for_each_op_entry<ElT: Scalar>(
    b: &SparseMatrix<ElT>,
    transpose: bool,
    mut f: impl FnMut(usize, usize, ElT),
) {
    b.storage().for_each_stored(|row, col, v| {
        if transpose {
            f(col, row, v)
        } else {
            f(row, col, v)
        }
    });
}

/// `result += alpha * op(A) * op(B)` with dense `A`, sparse `B` and a
/// block-column accumulator.
///
/// Output columns that receive a contribution and are not yet stored in
/// `result` get a new block. A shapeless `result` (0 rows or 0 columns, as
/// built by [`SparseMatrix::with_format`]) is sized to the product shape.
///
/// # Errors
///
/// - `FormatMismatch` if `result` is not block-column.
/// - `ShapeMismatch` if the inner dimensions differ, or `result` has a
///   nonzero shape other than the product shape.
///
/// # Example
///
/// ```
/// use spmatrix::{DenseMatrix, SparseFormat, SparseMatrix};
/// use spmatrix::operations::multiply_and_add;
///
/// let a = DenseMatrix::from_row_major(&[1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
/// let mut b: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 2, 3, 0);
/// b.set_value(1, 2, 10.0).unwrap();
///
/// let mut c = SparseMatrix::with_format(SparseFormat::BlockCol);
/// multiply_and_add(1.0, &a, false, &b, false, &mut c).unwrap();
///
/// assert_eq!(c.block_ids().unwrap(), &[2]);
/// assert_eq!(c.get(0, 2).unwrap(), 20.0);
/// assert_eq!(c.get(1, 2).unwrap(), 40.0);
/// ```
pub fn multiply_and_add<ElT: Scalar>(
    alpha: ElT,
    a: &DenseMatrix<ElT>,
    transpose_a: bool,
    b: &SparseMatrix<ElT>,
    transpose_b: bool,
    result: &mut SparseMatrix<ElT>,
) -> Result<(), MatrixError> {
    if result.format() != SparseFormat::BlockCol {
        return Err(MatrixError::FormatMismatch {
            expected: SparseFormat::BlockCol,
            actual: result.format(),
        });
    }
    let (m, k, n) = check_inner_dims(
        "multiply_and_add",
        op_shape(a.shape(), transpose_a),
        op_shape(b.shape(), transpose_b),
    )?;
    result.prepare_accumulator("multiply_and_add", m, n)?;
    debug!(
        m,
        k,
        n,
        nnz = b.nnz(),
        format = %b.format(),
        transpose_a,
        transpose_b,
        "sparse multiply_and_add into block-column"
    );

    let mut touched = vec![false; n];
    for_each_op_entry(b, transpose_b, |_, j, _| touched[j] = true);
    let out_cols: Vec<usize> = (0..n).filter(|&j| touched[j]).collect();

    let acc = result.as_block_col_mut()?;
    acc.ensure_blocks(&out_cols);
    let lhs = DenseOperand::new(a, transpose_a);
    for_each_op_entry(b, transpose_b, |kk, j, v| {
        if let Some(dst) = acc.column_mut(j) {
            lhs.axpy_column(kk, alpha * v, dst);
        }
    });
    Ok(())
}

/// `C = alpha * op(A) * op(B) + beta * C` with dense `A`, sparse `B` and a
/// dense accumulator.
///
/// With `beta == 0` the previous contents of `C` are ignored and `C` is
/// resized if needed. When `B` is not transposed, output columns are
/// independent; the `rayon` feature computes them in parallel with the same
/// per-column summation order as the sequential path.
///
/// # Errors
///
/// `ShapeMismatch` if the inner dimensions differ, or `C` has the wrong shape
/// while `beta != 0`.
#[allow(clippy::too_many_arguments)]
pub fn multiply_and_weighted_add<ElT: Scalar>(
    alpha: ElT,
    a: &DenseMatrix<ElT>,
    transpose_a: bool,
    b: &SparseMatrix<ElT>,
    transpose_b: bool,
    beta: ElT,
    c: &mut DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    let (m, k, n) = check_inner_dims(
        "multiply_and_weighted_add",
        op_shape(a.shape(), transpose_a),
        op_shape(b.shape(), transpose_b),
    )?;
    prepare_weighted_output("multiply_and_weighted_add", c, m, n, beta)?;
    debug!(
        m,
        k,
        n,
        nnz = b.nnz(),
        format = %b.format(),
        transpose_a,
        transpose_b,
        "sparse multiply_and_weighted_add into dense"
    );
    if m == 0 {
        return Ok(());
    }

    let lhs = DenseOperand::new(a, transpose_a);
    if transpose_b {
        // Entries of B scatter across output columns.
        let data = c.data_mut();
        for_each_op_entry(b, true, |kk, j, v| {
            lhs.axpy_column(kk, alpha * v, &mut data[j * m..(j + 1) * m]);
        });
        return Ok(());
    }

    let column = |j: usize, dst: &mut [ElT]| match b.storage() {
        SparseStorage::Csc(s) => {
            let (rows, vals) = s.column(j);
            for (&kk, &v) in rows.iter().zip(vals) {
                lhs.axpy_column(kk, alpha * v, dst);
            }
        }
        SparseStorage::BlockCol(s) => {
            if let Some(block) = s.column(j) {
                for (kk, &v) in block.iter().enumerate() {
                    lhs.axpy_column(kk, alpha * v, dst);
                }
            }
        }
    };

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        c.data_mut()
            .par_chunks_mut(m)
            .enumerate()
            .for_each(|(j, dst)| column(j, dst));
    }
    #[cfg(not(feature = "rayon"))]
    for (j, dst) in c.data_mut().chunks_mut(m).enumerate() {
        column(j, dst);
    }
    Ok(())
}

/// `C = alpha * op(A) * op(B) + beta * C` with sparse `A`, dense `B` and a
/// dense accumulator.
///
/// For an entry `v` of `op(A)` at `(i, k)`: `C[i, :] += (alpha * v) * op(B)[k, :]`.
///
/// # Errors
///
/// `ShapeMismatch` if the inner dimensions differ, or `C` has the wrong shape
/// while `beta != 0`.
#[allow(clippy::too_many_arguments)]
pub fn sparse_dense_multiply_and_weighted_add<ElT: Scalar>(
    alpha: ElT,
    a: &SparseMatrix<ElT>,
    transpose_a: bool,
    b: &DenseMatrix<ElT>,
    transpose_b: bool,
    beta: ElT,
    c: &mut DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    let (m, k, n) = check_inner_dims(
        "sparse_dense_multiply_and_weighted_add",
        op_shape(a.shape(), transpose_a),
        op_shape(b.shape(), transpose_b),
    )?;
    prepare_weighted_output("sparse_dense_multiply_and_weighted_add", c, m, n, beta)?;
    debug!(
        m,
        k,
        n,
        nnz = a.nnz(),
        format = %a.format(),
        transpose_a,
        transpose_b,
        "sparse-left multiply_and_weighted_add into dense"
    );

    let b_rows = b.rows();
    let b_data = b.data();
    let c_data = c.data_mut();
    a.storage().for_each_stored(|row, col, v| {
        let (i, kk) = if transpose_a { (col, row) } else { (row, col) };
        let scale = alpha * v;
        for j in 0..n {
            // op(B)[kk, j]
            let bv = if transpose_b {
                b_data[j + kk * b_rows]
            } else {
                b_data[kk + j * b_rows]
            };
            c_data[i + j * m] += scale * bv;
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::dense::{dense_multiply, dense_multiply_and_weighted_add};
    use approx::assert_relative_eq;

    /// 4x2 dense A and a 4x2 sparse S1 with the standard CSC fixture pattern.
    fn fixtures() -> (DenseMatrix<f64>, SparseMatrix<f64>) {
        let a = DenseMatrix::from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 4, 2)
            .unwrap();
        let mut s = SparseMatrix::new(SparseFormat::Csc, 4, 2, 0);
        s.set_matrix_from_csc_format(&[0, 1, 3], &[3, 2, 3], &[4.0, 5.0, 6.0], 3, 4, 2)
            .unwrap();
        (a, s)
    }

    #[test]
    fn test_multiply_and_add_matches_dense_exactly() {
        let (a, s1) = fixtures();
        let mut result = SparseMatrix::new(SparseFormat::BlockCol, 4, 4, 0);
        multiply_and_add(1.0, &a, false, &s1, true, &mut result).unwrap();

        let expected = dense_multiply(&a, false, &s1.to_dense(), true).unwrap();
        assert_eq!(result.to_dense(), expected);
        // S1^T has nonzero columns only for rows 2 and 3 of S1.
        assert_eq!(result.block_ids().unwrap(), &[2, 3]);
    }

    #[test]
    fn test_multiply_and_add_accumulates() {
        let (a, s1) = fixtures();
        let mut result = SparseMatrix::new(SparseFormat::BlockCol, 4, 4, 0);
        result.set_value(0, 0, 1.0).unwrap();
        multiply_and_add(2.0, &a, false, &s1, true, &mut result).unwrap();
        multiply_and_add(-1.0, &a, false, &s1, true, &mut result).unwrap();

        let mut expected = dense_multiply(&a, false, &s1.to_dense(), true).unwrap();
        expected[(0, 0)] += 1.0;
        assert_eq!(result.to_dense(), expected);
        assert_eq!(result.block_ids().unwrap(), &[0, 2, 3]);
    }

    #[test]
    fn test_multiply_and_add_all_transposes_and_formats() {
        let a = DenseMatrix::<f64>::random_uniform(5, 6, -1.0, 1.0, 11);
        let mut b_dense = DenseMatrix::<f64>::random_uniform(6, 6, -1.0, 1.0, 12);
        b_dense.set_to_zero_if_abs_less_than(0.6);

        for format in [SparseFormat::Csc, SparseFormat::BlockCol] {
            let b = SparseMatrix::from_dense(format, &b_dense);
            for ta in [false, true] {
                let a_op = if ta { a.transpose() } else { a.clone() };
                for tb in [false, true] {
                    let mut result = SparseMatrix::with_format(SparseFormat::BlockCol);
                    multiply_and_add(1.0, &a_op, ta, &b, tb, &mut result).unwrap();
                    let expected = dense_multiply(&a_op, ta, &b_dense, tb).unwrap();
                    assert_eq!(result.shape(), expected.shape());
                    assert!(
                        result.to_dense().is_equal_to(&expected, 1e-12),
                        "format={format} ta={ta} tb={tb}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_multiply_and_add_errors() {
        let (a, s1) = fixtures();
        let mut csc_result = SparseMatrix::new(SparseFormat::Csc, 4, 4, 0);
        assert_eq!(
            multiply_and_add(1.0, &a, false, &s1, true, &mut csc_result),
            Err(MatrixError::FormatMismatch {
                expected: SparseFormat::BlockCol,
                actual: SparseFormat::Csc
            })
        );

        // A is 4x2, S1 (not transposed) is 4x2: inner dims 2 vs 4.
        let mut result = SparseMatrix::with_format(SparseFormat::BlockCol);
        assert!(matches!(
            multiply_and_add(1.0, &a, false, &s1, false, &mut result),
            Err(MatrixError::ShapeMismatch { .. })
        ));

        let mut populated = SparseMatrix::new(SparseFormat::BlockCol, 3, 3, 0);
        populated.set_value(0, 0, 1.0).unwrap();
        assert!(matches!(
            multiply_and_add(1.0, &a, false, &s1, true, &mut populated),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_multiply_and_add_keeps_explicit_shape() {
        let (a, s1) = fixtures();
        let mut result = SparseMatrix::new(SparseFormat::BlockCol, 3, 3, 0);
        assert_eq!(
            multiply_and_add(1.0, &a, false, &s1, true, &mut result),
            Err(MatrixError::ShapeMismatch {
                operation: "multiply_and_add",
                expected: (4, 4),
                actual: (3, 3)
            })
        );
        assert_eq!(result.shape(), (3, 3));
        assert_eq!(result.nnz(), 0);
    }

    #[test]
    fn test_multiply_and_add_f32() {
        let a = DenseMatrix::<f32>::from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
        let mut b: SparseMatrix<f32> = SparseMatrix::new(SparseFormat::Csc, 2, 3, 0);
        b.set_value(0, 0, 2.0).unwrap();
        b.set_value(1, 2, -1.0).unwrap();

        let mut result = SparseMatrix::new(SparseFormat::BlockCol, 3, 3, 0);
        multiply_and_add(1.0, &a, false, &b, false, &mut result).unwrap();
        assert_eq!(result.block_ids().unwrap(), &[0, 2]);
        let expected = dense_multiply(&a, false, &b.to_dense(), false).unwrap();
        assert_eq!(result.to_dense(), expected);
        assert_eq!(result.get(2, 0).unwrap(), 10.0f32);
        assert_eq!(result.get(1, 2).unwrap(), -4.0f32);

        let mut c = DenseMatrix::<f32>::zeros(3, 3);
        multiply_and_weighted_add(2.0, &a, false, &b, false, 0.0, &mut c).unwrap();
        assert_eq!(c[(0, 0)], 4.0);
        assert_eq!(c[(2, 2)], -12.0);
    }

    #[test]
    fn test_weighted_add_matches_dense() {
        let a = DenseMatrix::<f64>::random_uniform(7, 5, -1.0, 1.0, 21);
        let mut b_dense = DenseMatrix::<f64>::random_uniform(5, 9, -1.0, 1.0, 22);
        b_dense.set_to_zero_if_abs_less_than(0.5);
        let c0 = DenseMatrix::<f64>::random_uniform(7, 9, -1.0, 1.0, 23);

        for format in [SparseFormat::Csc, SparseFormat::BlockCol] {
            let b = SparseMatrix::from_dense(format, &b_dense);
            let mut c_sparse = c0.clone();
            multiply_and_weighted_add(0.5, &a, false, &b, false, 2.0, &mut c_sparse).unwrap();

            let mut c_dense = c0.clone();
            dense_multiply_and_weighted_add(0.5, &a, false, &b_dense, false, 2.0, &mut c_dense)
                .unwrap();
            for (x, y) in c_sparse.data().iter().zip(c_dense.data()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_weighted_add_transposed_sparse() {
        let a = DenseMatrix::<f64>::random_uniform(3, 4, -1.0, 1.0, 31);
        let a_t = a.transpose();
        let mut b_dense = DenseMatrix::<f64>::random_uniform(6, 4, -1.0, 1.0, 32);
        b_dense.set_to_zero_if_abs_less_than(0.4);
        let b = SparseMatrix::from_dense(SparseFormat::Csc, &b_dense);

        let mut c = DenseMatrix::zeros(0, 0);
        multiply_and_weighted_add(1.0, &a_t, true, &b, true, 0.0, &mut c).unwrap();
        let expected = dense_multiply(&a, false, &b_dense, true).unwrap();
        assert!(c.is_equal_to(&expected, 1e-12));
    }

    #[test]
    fn test_weighted_add_shape_errors() {
        let (a, s1) = fixtures();
        let mut c: DenseMatrix<f64> = DenseMatrix::zeros(2, 2);
        assert!(multiply_and_weighted_add(1.0, &a, false, &s1, true, 1.0, &mut c).is_err());
        assert!(multiply_and_weighted_add(1.0, &a, false, &s1, false, 0.0, &mut c).is_err());
    }

    #[test]
    fn test_sparse_dense_weighted_add() {
        let mut a_dense = DenseMatrix::<f64>::random_uniform(6, 5, -1.0, 1.0, 41);
        a_dense.set_to_zero_if_abs_less_than(0.5);
        let b = DenseMatrix::<f64>::random_uniform(5, 4, -1.0, 1.0, 42);
        let b_t = b.transpose();
        let a_t_dense = a_dense.transpose();

        for format in [SparseFormat::Csc, SparseFormat::BlockCol] {
            let a = SparseMatrix::from_dense(format, &a_dense);
            let a_t = SparseMatrix::from_dense(format, &a_t_dense);
            let expected = dense_multiply(&a_dense, false, &b, false).unwrap();

            for (lhs, ta) in [(&a, false), (&a_t, true)] {
                for (rhs, tb) in [(&b, false), (&b_t, true)] {
                    let mut c = DenseMatrix::zeros(6, 4);
                    sparse_dense_multiply_and_weighted_add(1.0, lhs, ta, rhs, tb, 0.0, &mut c)
                        .unwrap();
                    assert!(
                        c.is_equal_to(&expected, 1e-12),
                        "format={format} ta={ta} tb={tb}"
                    );
                }
            }
        }
    }
}
