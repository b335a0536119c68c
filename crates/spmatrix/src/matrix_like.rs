//! Uniform element access for comparing dense and sparse matrices.
//!
//! `MatrixLike` is the seam the verification helpers are written against:
//! any pair of matrices can be compared element by element regardless of
//! their storage.

use crate::dense_matrix::DenseMatrix;
use crate::scalar::Scalar;
use crate::sparse_matrix::SparseMatrix;

/// Read-only element view of a `rows x cols` matrix.
pub trait MatrixLike<ElT: Scalar> {
    /// `(rows, cols)`.
    fn shape(&self) -> (usize, usize);

    /// Element at `(row, col)`, or `None` outside the shape. Unstored
    /// elements of a sparse matrix read as zero.
    fn value_at(&self, row: usize, col: usize) -> Option<ElT>;

    /// Coordinates in column-major order.
    fn coords(&self) -> Box<dyn Iterator<Item = (usize, usize)>> {
        let (rows, cols) = self.shape();
        Box::new((0..cols).flat_map(move |c| (0..rows).map(move |r| (r, c))))
    }
}

impl<ElT: Scalar> MatrixLike<ElT> for DenseMatrix<ElT> {
    fn shape(&self) -> (usize, usize) {
        DenseMatrix::shape(self)
    }

    fn value_at(&self, row: usize, col: usize) -> Option<ElT> {
        self.get(row, col).copied()
    }
}

impl<ElT: Scalar> MatrixLike<ElT> for SparseMatrix<ElT> {
    fn shape(&self) -> (usize, usize) {
        SparseMatrix::shape(self)
    }

    fn value_at(&self, row: usize, col: usize) -> Option<ElT> {
        self.get(row, col).ok()
    }
}

/// Largest `|a - b|` over all elements, or `None` if the shapes differ.
pub fn max_abs_diff<ElT, A, B>(a: &A, b: &B) -> Option<ElT>
where
    ElT: Scalar,
    A: MatrixLike<ElT> + ?Sized,
    B: MatrixLike<ElT> + ?Sized,
{
    if a.shape() != b.shape() {
        return None;
    }
    let mut max = ElT::zero();
    for (r, c) in a.coords() {
        let (x, y) = (a.value_at(r, c)?, b.value_at(r, c)?);
        let d = (x - y).abs_value();
        if d > max {
            max = d;
        }
    }
    Some(max)
}

/// True if the shapes match and every element pair differs by at most
/// `epsilon`.
///
/// # Example
///
/// ```
/// use spmatrix::{DenseMatrix, SparseFormat, SparseMatrix};
/// use spmatrix::matrix_like::all_close;
///
/// let d = DenseMatrix::from_row_major(&[0.0, 1.0, 2.0, 0.0], 2, 2).unwrap();
/// let s = SparseMatrix::from_dense(SparseFormat::Csc, &d);
/// assert!(all_close(&d, &s, 0.0));
/// ```
pub fn all_close<ElT, A, B>(a: &A, b: &B, epsilon: ElT) -> bool
where
    ElT: Scalar,
    A: MatrixLike<ElT> + ?Sized,
    B: MatrixLike<ElT> + ?Sized,
{
    max_abs_diff(a, b).is_some_and(|d| d <= epsilon)
}

/// True if the shapes match and every element pair compares equal.
pub fn exactly_equal<ElT, A, B>(a: &A, b: &B) -> bool
where
    ElT: Scalar,
    A: MatrixLike<ElT> + ?Sized,
    B: MatrixLike<ElT> + ?Sized,
{
    if a.shape() != b.shape() {
        return false;
    }
    let mut coords = a.coords();
    coords.all(|(r, c)| a.value_at(r, c) == b.value_at(r, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SparseFormat;
    use approx::assert_relative_eq;

    #[test]
    fn test_value_at() {
        let d = DenseMatrix::from_row_major(&[1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        assert_eq!(d.value_at(0, 1), Some(2.0));
        assert_eq!(d.value_at(2, 0), None);

        let s = SparseMatrix::from_dense(SparseFormat::BlockCol, &d);
        assert_eq!(s.value_at(1, 0), Some(3.0));
        assert_eq!(s.value_at(0, 2), None);
    }

    #[test]
    fn test_coords_order() {
        let d: DenseMatrix<f64> = DenseMatrix::zeros(2, 2);
        let coords: Vec<_> = MatrixLike::coords(&d).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_compare_dense_and_sparse() {
        let mut d = DenseMatrix::<f64>::random_uniform(5, 4, -1.0, 1.0, 5);
        d.set_to_zero_if_abs_less_than(0.3);
        let s = SparseMatrix::from_dense(SparseFormat::Csc, &d);
        assert!(exactly_equal(&d, &s));

        let mut perturbed = d.clone();
        perturbed[(2, 3)] += 1e-6;
        assert!(!exactly_equal(&perturbed, &s));
        assert!(all_close(&perturbed, &s, 1e-5));
        assert!(!all_close(&perturbed, &s, 1e-7));
        let diff = max_abs_diff(&perturbed, &s).unwrap();
        assert_relative_eq!(diff, 1e-6, epsilon = 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let a: DenseMatrix<f64> = DenseMatrix::zeros(2, 3);
        let b: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 3, 2, 0);
        assert_eq!(max_abs_diff(&a, &b), None);
        assert!(!all_close(&a, &b, 1.0));
        assert!(!exactly_equal(&a, &b));
    }
}
