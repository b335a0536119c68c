//! Dense reference kernels using faer's GEMM.
//!
//! The sparse kernels are checked against these.

use faer::linalg::matmul::matmul;
use faer::{Accum, Par};

use crate::backend::AsFaerMat;
use crate::dense_matrix::DenseMatrix;
use crate::error::MatrixError;
use crate::scalar::Scalar;

/// Shape of `op(m)` for a `(rows, cols)` operand.
#[inline]
pub(crate) fn op_shape((rows, cols): (usize, usize), transpose: bool) -> (usize, usize) {
    if transpose {
        (cols, rows)
    } else {
        (rows, cols)
    }
}

/// Check that `opA` is `m x k` and `opB` is `k x n`; returns `(m, k, n)`.
pub(crate) fn check_inner_dims(
    operation: &'static str,
    a: (usize, usize),
    b: (usize, usize),
) -> Result<(usize, usize, usize), MatrixError> {
    let (m, k) = a;
    let (kb, n) = b;
    if k != kb {
        return Err(MatrixError::ShapeMismatch {
            operation,
            expected: (k, n),
            actual: (kb, n),
        });
    }
    Ok((m, k, n))
}

/// Apply `C = beta * C`, or size `C` to `(m, n)` when `beta == 0`.
pub(crate) fn prepare_weighted_output<ElT: Scalar>(
    operation: &'static str,
    c: &mut DenseMatrix<ElT>,
    m: usize,
    n: usize,
    beta: ElT,
) -> Result<(), MatrixError> {
    if c.shape() != (m, n) {
        if !beta.is_exact_zero() {
            return Err(MatrixError::ShapeMismatch {
                operation,
                expected: (m, n),
                actual: c.shape(),
            });
        }
        c.resize(m, n);
        return Ok(());
    }
    if beta.is_exact_zero() {
        c.fill(ElT::zero());
    } else if beta != ElT::one() {
        c.scale(beta);
    }
    Ok(())
}

/// `C = alpha * op(A) * op(B) + beta * C` for dense operands.
///
/// With `beta == 0` the previous contents of `C` are ignored and `C` is
/// resized if needed.
///
/// # Errors
///
/// `ShapeMismatch` if the inner dimensions differ, or `C` has the wrong shape
/// while `beta != 0`.
///
/// # Example
///
/// ```
/// use spmatrix::DenseMatrix;
/// use spmatrix::operations::dense_multiply_and_weighted_add;
///
/// let a = DenseMatrix::from_row_major(&[1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
/// let b = DenseMatrix::from_row_major(&[1.0, 0.0, 0.0, 1.0], 2, 2).unwrap();
/// let mut c = DenseMatrix::from_row_major(&[1.0, 1.0, 1.0, 1.0], 2, 2).unwrap();
///
/// dense_multiply_and_weighted_add(2.0, &a, false, &b, false, 1.0, &mut c).unwrap();
/// assert_eq!(c, DenseMatrix::from_row_major(&[3.0, 5.0, 7.0, 9.0], 2, 2).unwrap());
/// ```
#[allow(clippy::too_many_arguments)]
pub fn dense_multiply_and_weighted_add<ElT: Scalar>(
    alpha: ElT,
    a: &DenseMatrix<ElT>,
    transpose_a: bool,
    b: &DenseMatrix<ElT>,
    transpose_b: bool,
    beta: ElT,
    c: &mut DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    let (m, k, n) = check_inner_dims(
        "dense_multiply_and_weighted_add",
        op_shape(a.shape(), transpose_a),
        op_shape(b.shape(), transpose_b),
    )?;
    prepare_weighted_output("dense_multiply_and_weighted_add", c, m, n, beta)?;
    if m == 0 || n == 0 || k == 0 {
        return Ok(());
    }

    let a_mat = a.as_faer_mat();
    let a_op = if transpose_a {
        a_mat.transpose()
    } else {
        a_mat
    };
    let b_mat = b.as_faer_mat();
    let b_op = if transpose_b {
        b_mat.transpose()
    } else {
        b_mat
    };
    let mut c_mat = c.as_faer_mat_mut();

    // C += alpha * opA * opB (beta was applied above)
    matmul(c_mat.as_mut(), Accum::Add, a_op, b_op, alpha, Par::Seq);
    Ok(())
}

/// `C += op(A) * op(B)` for dense operands.
pub fn dense_multiply_and_add<ElT: Scalar>(
    a: &DenseMatrix<ElT>,
    transpose_a: bool,
    b: &DenseMatrix<ElT>,
    transpose_b: bool,
    c: &mut DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    dense_multiply_and_weighted_add(ElT::one(), a, transpose_a, b, transpose_b, ElT::one(), c)
}

/// `op(A) * op(B)` as a new dense matrix.
pub fn dense_multiply<ElT: Scalar>(
    a: &DenseMatrix<ElT>,
    transpose_a: bool,
    b: &DenseMatrix<ElT>,
    transpose_b: bool,
) -> Result<DenseMatrix<ElT>, MatrixError> {
    let mut c = DenseMatrix::zeros(0, 0);
    dense_multiply_and_weighted_add(
        ElT::one(),
        a,
        transpose_a,
        b,
        transpose_b,
        ElT::zero(),
        &mut c,
    )?;
    Ok(c)
}

/// `C += alpha * A` for dense operands of equal shape.
pub fn dense_scale_and_add<ElT: Scalar>(
    alpha: ElT,
    a: &DenseMatrix<ElT>,
    c: &mut DenseMatrix<ElT>,
) -> Result<(), MatrixError> {
    if a.shape() != c.shape() {
        return Err(MatrixError::ShapeMismatch {
            operation: "dense_scale_and_add",
            expected: c.shape(),
            actual: a.shape(),
        });
    }
    for (x, &y) in c.data_mut().iter_mut().zip(a.data()) {
        *x += alpha * y;
    }
    Ok(())
}
