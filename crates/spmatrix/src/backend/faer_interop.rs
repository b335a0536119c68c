//! Zero-copy conversion between DenseMatrix and faer matrices.
//!
//! Both spmatrix and faer use column-major storage, so a `DenseMatrix`
//! can be viewed as a `MatRef` / `MatMut` without copying.

use faer::{Mat, MatMut, MatRef};

use crate::dense_matrix::DenseMatrix;
use crate::scalar::Scalar;

/// Extension trait for viewing a dense matrix as a faer matrix.
pub trait AsFaerMat<T: Scalar> {
    /// View as an immutable faer matrix (zero-copy).
    ///
    /// # Example
    ///
    /// ```
    /// use spmatrix::DenseMatrix;
    /// use spmatrix::backend::AsFaerMat;
    ///
    /// let m = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    /// let mat = m.as_faer_mat();
    /// assert_eq!(mat.nrows(), 2);
    /// assert_eq!(mat.ncols(), 3);
    /// ```
    fn as_faer_mat(&self) -> MatRef<'_, T>;

    /// View as a mutable faer matrix (zero-copy).
    fn as_faer_mat_mut(&mut self) -> MatMut<'_, T>;
}

impl<T: Scalar> AsFaerMat<T> for DenseMatrix<T> {
    fn as_faer_mat(&self) -> MatRef<'_, T> {
        let (rows, cols) = self.shape();
        MatRef::from_column_major_slice(self.data(), rows, cols)
    }

    fn as_faer_mat_mut(&mut self) -> MatMut<'_, T> {
        let (rows, cols) = self.shape();
        MatMut::from_column_major_slice_mut(self.data_mut(), rows, cols)
    }
}

/// Create a DenseMatrix from a faer matrix (copies data).
///
/// # Example
///
/// ```
/// use faer::Mat;
/// use spmatrix::backend::dense_from_faer_mat;
///
/// let mat = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
/// let m = dense_from_faer_mat(mat.as_ref());
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m[(1, 2)], 5.0);
/// ```
pub fn dense_from_faer_mat<T: Scalar>(mat: MatRef<'_, T>) -> DenseMatrix<T> {
    DenseMatrix::from_fn(mat.nrows(), mat.ncols(), |i, j| mat[(i, j)])
}

/// Create an owned faer Mat from a DenseMatrix (copies data).
pub fn faer_mat_from_dense<T: Scalar>(m: &DenseMatrix<T>) -> Mat<T> {
    m.as_faer_mat().to_owned()
}
