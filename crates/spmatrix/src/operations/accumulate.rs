//! Scale-accumulate kernels: `acc += scale * addend`.

use tracing::debug;

use crate::dense_matrix::DenseMatrix;
use crate::error::MatrixError;
use crate::scalar::Scalar;
use crate::sparse_matrix::SparseMatrix;
use crate::storage::{SparseFormat, SparseStorage};

fn require_block_col<ElT: Scalar>(acc: &SparseMatrix<ElT>) -> Result<(), MatrixError> {
    if acc.format() != SparseFormat::BlockCol {
        return Err(MatrixError::FormatMismatch {
            expected: SparseFormat::BlockCol,
            actual: acc.format(),
        });
    }
    Ok(())
}

/// Logical columns of `m` that hold at least one stored entry.
fn stored_columns<ElT: Scalar>(m: &SparseMatrix<ElT>) -> Vec<usize> {
    match m.storage() {
        SparseStorage::Csc(s) => {
            let ptr = s.col_ptr();
            (0..s.cols()).filter(|&c| ptr[c] < ptr[c + 1]).collect()
        }
        SparseStorage::BlockCol(s) => s.block_ids().to_vec(),
    }
}

/// `acc += scale * addend` for a block-column accumulator and a sparse
/// addend of either format.
///
/// Columns stored in `addend` but not in `acc` become new blocks of `acc`;
/// columns present only in `acc` are left as they are. A shapeless `acc`
/// (0 rows or 0 columns) is sized to the addend's shape.
///
/// # Errors
///
/// `FormatMismatch` if `acc` is CSC, `ShapeMismatch` if `acc` has a nonzero
/// shape other than the addend's.
///
/// # Example
///
/// ```
/// use spmatrix::{SparseFormat, SparseMatrix};
/// use spmatrix::operations::scale_and_accumulate;
///
/// let mut acc: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 2, 3, 0);
/// acc.set_value(0, 0, 1.0).unwrap();
/// let mut b: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 2, 3, 0);
/// b.set_value(1, 0, 2.0).unwrap();
/// b.set_value(0, 2, 4.0).unwrap();
///
/// scale_and_accumulate(0.5, &mut acc, &b).unwrap();
/// assert_eq!(acc.block_ids().unwrap(), &[0, 2]);
/// assert_eq!(acc.get(0, 0).unwrap(), 1.0);
/// assert_eq!(acc.get(1, 0).unwrap(), 1.0);
/// assert_eq!(acc.get(0, 2).unwrap(), 2.0);
/// ```
pub fn scale_and_accumulate<ElT: Scalar>(
    scale: ElT,
    acc: &mut SparseMatrix<ElT>,
    addend: &SparseMatrix<ElT>,
) -> Result<(), MatrixError> {
    require_block_col(acc)?;
    let (rows, cols) = addend.shape();
    acc.prepare_accumulator("scale_and_accumulate", rows, cols)?;

    let used = stored_columns(addend);
    debug!(
        rows,
        cols,
        addend_format = %addend.format(),
        addend_columns = used.len(),
        "scale_and_accumulate into block-column"
    );

    let dst = acc.as_block_col_mut()?;
    dst.ensure_blocks(&used);
    match addend.storage() {
        SparseStorage::BlockCol(src) => {
            for (b, &col) in src.block_ids().iter().enumerate() {
                if let Some(out) = dst.column_mut(col) {
                    for (x, &y) in out.iter_mut().zip(src.block(b)) {
                        *x += scale * y;
                    }
                }
            }
        }
        SparseStorage::Csc(src) => {
            for (row, col, v) in src.entries() {
                if let Some(out) = dst.column_mut(col) {
                    out[row] += scale * v;
                }
            }
        }
    }
    Ok(())
}

/// `acc += scale * addend` for a block-column accumulator and a dense addend.
///
/// Only columns of `addend` with a nonzero element introduce new blocks.
///
/// # Errors
///
/// `FormatMismatch` if `acc` is CSC, `ShapeMismatch` if `acc` has a nonzero
/// shape other than the addend's.
pub fn scale_and_accumulate_dense<ElT: Scalar>(
    scale: ElT,
    acc: &mut SparseMatrix<ElT>,
    addend: &DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    require_block_col(acc)?;
    let (rows, cols) = addend.shape();
    acc.prepare_accumulator("scale_and_accumulate_dense", rows, cols)?;

    let used: Vec<usize> = (0..cols)
        .filter(|&c| addend.column(c).iter().any(|x| !x.is_exact_zero()))
        .collect();
    debug!(
        rows,
        cols,
        addend_columns = used.len(),
        "scale_and_accumulate_dense into block-column"
    );

    let dst = acc.as_block_col_mut()?;
    dst.ensure_blocks(&used);
    for &col in &used {
        if let Some(out) = dst.column_mut(col) {
            for (x, &y) in out.iter_mut().zip(addend.column(col)) {
                *x += scale * y;
            }
        }
    }
    Ok(())
}

/// `C += alpha * A` for a sparse `A` of either format and a dense `C`.
///
/// # Errors
///
/// `ShapeMismatch` if the shapes differ.
pub fn scale_and_add_to_dense<ElT: Scalar>(
    alpha: ElT,
    a: &SparseMatrix<ElT>,
    c: &mut DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    if a.shape() != c.shape() {
        return Err(MatrixError::ShapeMismatch {
            operation: "scale_and_add_to_dense",
            expected: c.shape(),
            actual: a.shape(),
        });
    }
    let rows = c.rows();
    let data = c.data_mut();
    a.storage().for_each_stored(|row, col, v| {
        data[row + col * rows] += alpha * v;
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::dense::dense_scale_and_add;
    use approx::assert_relative_eq;

    fn truncated_random(rows: usize, cols: usize, seed: u64) -> DenseMatrix<f64> {
        let mut m = DenseMatrix::random_uniform(rows, cols, -1.0, 1.0, seed);
        m.set_to_zero_if_abs_less_than(0.5);
        // Leave a fully empty column so the block sets differ.
        m.column_mut(seed as usize % cols).fill(0.0);
        m
    }

    #[test]
    fn test_accumulate_sparse_matches_dense() {
        let a = truncated_random(6, 8, 3);
        let b = truncated_random(6, 8, 4);

        for addend_format in [SparseFormat::Csc, SparseFormat::BlockCol] {
            let mut acc = SparseMatrix::from_dense(SparseFormat::BlockCol, &a);
            let addend = SparseMatrix::from_dense(addend_format, &b);
            scale_and_accumulate(0.9, &mut acc, &addend).unwrap();

            let mut expected = a.clone();
            dense_scale_and_add(0.9, &b, &mut expected).unwrap();
            let got = acc.to_dense();
            for (x, y) in got.data().iter().zip(expected.data()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_accumulate_adds_new_blocks() {
        let mut acc: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 3, 5, 0);
        acc.set_value(0, 1, 1.0).unwrap();
        let mut addend: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 3, 5, 0);
        addend.set_value(2, 4, 3.0).unwrap();
        addend.set_value(0, 1, 1.0).unwrap();

        scale_and_accumulate(2.0, &mut acc, &addend).unwrap();
        assert_eq!(acc.block_ids().unwrap(), &[1, 4]);
        assert_eq!(acc.get(0, 1).unwrap(), 3.0);
        assert_eq!(acc.get(2, 4).unwrap(), 6.0);
    }

    #[test]
    fn test_accumulate_resizes_empty_accumulator() {
        let mut acc: SparseMatrix<f64> = SparseMatrix::with_format(SparseFormat::BlockCol);
        let mut addend: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 2, 2, 0);
        addend.set_value(1, 1, 5.0).unwrap();
        scale_and_accumulate(1.0, &mut acc, &addend).unwrap();
        assert_eq!(acc.shape(), (2, 2));
        assert_eq!(acc.get(1, 1).unwrap(), 5.0);
    }

    #[test]
    fn test_accumulate_errors() {
        let addend: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 2, 2, 0);
        let mut csc: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 2, 2, 0);
        assert!(matches!(
            scale_and_accumulate(1.0, &mut csc, &addend),
            Err(MatrixError::FormatMismatch { .. })
        ));

        let mut acc: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 3, 2, 0);
        acc.set_value(0, 0, 1.0).unwrap();
        assert!(matches!(
            scale_and_accumulate(1.0, &mut acc, &addend),
            Err(MatrixError::ShapeMismatch { .. })
        ));
        assert!(scale_and_accumulate_dense(1.0, &mut acc, &DenseMatrix::zeros(2, 2)).is_err());
    }

    #[test]
    fn test_accumulate_keeps_explicit_shape() {
        let mut acc: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 4, 4, 0);
        let mut addend: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 3, 2, 0);
        addend.set_value(2, 1, 1.0).unwrap();

        assert_eq!(
            scale_and_accumulate(1.0, &mut acc, &addend),
            Err(MatrixError::ShapeMismatch {
                operation: "scale_and_accumulate",
                expected: (3, 2),
                actual: (4, 4)
            })
        );
        assert_eq!(acc.shape(), (4, 4));
        assert_eq!(acc.num_blocks().unwrap(), 0);

        let dense_addend = addend.to_dense();
        assert!(matches!(
            scale_and_accumulate_dense(1.0, &mut acc, &dense_addend),
            Err(MatrixError::ShapeMismatch { .. })
        ));
        assert_eq!(acc.shape(), (4, 4));
    }

    #[test]
    fn test_accumulate_f32() {
        let mut acc: SparseMatrix<f32> = SparseMatrix::new(SparseFormat::BlockCol, 2, 3, 0);
        acc.set_value(0, 0, 1.0).unwrap();
        let mut addend: SparseMatrix<f32> = SparseMatrix::new(SparseFormat::Csc, 2, 3, 0);
        addend.set_value(1, 0, 3.0).unwrap();
        addend.set_value(0, 2, -2.0).unwrap();

        scale_and_accumulate(0.5, &mut acc, &addend).unwrap();
        assert_eq!(acc.block_ids().unwrap(), &[0, 2]);
        let expected = DenseMatrix::<f32>::from_row_major(&[1.0, 0.0, -1.0, 1.5, 0.0, 0.0], 2, 3)
            .unwrap();
        assert_eq!(acc.to_dense(), expected);

        let mut c = DenseMatrix::<f32>::zeros(2, 3);
        scale_and_add_to_dense(2.0, &addend, &mut c).unwrap();
        assert_eq!(c[(1, 0)], 6.0);
        assert_eq!(c[(0, 2)], -4.0);
    }

    #[test]
    fn test_accumulate_dense_skips_zero_columns() {
        let mut acc: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::BlockCol, 2, 3, 0);
        let addend = DenseMatrix::from_row_major(&[0.0, 1.0, 0.0, 0.0, 2.0, 0.0], 2, 3).unwrap();
        scale_and_accumulate_dense(-1.0, &mut acc, &addend).unwrap();
        assert_eq!(acc.block_ids().unwrap(), &[1]);
        assert_eq!(acc.block_column(0).unwrap(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_scale_and_add_to_dense() {
        let sparse_src = truncated_random(4, 5, 7);
        let c0 = DenseMatrix::<f64>::random_uniform(4, 5, -1.0, 1.0, 8);
        for format in [SparseFormat::Csc, SparseFormat::BlockCol] {
            let a = SparseMatrix::from_dense(format, &sparse_src);
            let mut c = c0.clone();
            scale_and_add_to_dense(3.0, &a, &mut c).unwrap();

            let mut expected = c0.clone();
            dense_scale_and_add(3.0, &sparse_src, &mut expected).unwrap();
            assert!(c.is_equal_to(&expected, 1e-12));
        }

        let a: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 4, 4, 0);
        let mut c = c0.clone();
        assert!(scale_and_add_to_dense(1.0, &a, &mut c).is_err());
    }
}
