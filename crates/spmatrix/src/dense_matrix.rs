//! Dense column-major matrix.

use crate::error::MatrixError;
use crate::scalar::Scalar;
use crate::storage::Dense;
use crate::strides::{linear_index, linear_to_coords};

/// A dense `rows x cols` matrix stored in column-major order.
///
/// Element `(row, col)` lives at offset `row + col * rows`, which is also
/// faer's default layout, so GEMM-based kernels view the buffer directly.
///
/// # Example
///
/// ```
/// use spmatrix::DenseMatrix;
///
/// let mut m: DenseMatrix<f64> = DenseMatrix::zeros(2, 3);
/// m.set(1, 2, 5.0).unwrap();
/// assert_eq!(m.get(1, 2), Some(&5.0));
/// assert_eq!(m.get(2, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<ElT: Scalar> {
    storage: Dense<ElT>,
    rows: usize,
    cols: usize,
}

impl<ElT: Scalar> DenseMatrix<ElT> {
    /// Create a zero-initialized matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            storage: Dense::zeros(rows * cols),
            rows,
            cols,
        }
    }

    /// Create a matrix from column-major data.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::LengthMismatch` if `data.len() != rows * cols`.
    ///
    /// # Example
    ///
    /// ```
    /// use spmatrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    /// assert_eq!(m.get(1, 0), Some(&2.0)); // column-major: (1, 0) is the second element
    /// assert_eq!(m.get(0, 1), Some(&3.0));
    /// ```
    pub fn from_vec(data: Vec<ElT>, rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            storage: Dense::from_vec(data),
            rows,
            cols,
        })
    }

    /// Create a matrix from row-major data. Handy for writing fixtures.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::LengthMismatch` if `data.len() != rows * cols`.
    pub fn from_row_major(data: &[ElT], rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self::from_fn(rows, cols, |r, c| data[r * cols + c]))
    }

    /// Create a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> ElT) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for c in 0..cols {
            for r in 0..rows {
                data.push(f(r, c));
            }
        }
        Self {
            storage: Dense::from_vec(data),
            rows,
            cols,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Column-major data.
    #[inline]
    pub fn data(&self) -> &[ElT] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [ElT] {
        self.storage.as_mut_slice()
    }

    /// Get element by coordinates, `None` if out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&ElT> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(&self.storage[linear_index(row, col, self.rows)])
    }

    /// Get mutable element by coordinates, `None` if out of range.
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut ElT> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(&mut self.storage[linear_index(row, col, self.rows)])
    }

    /// Set element by coordinates.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::IndexOutOfRange` outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: ElT) -> Result<(), MatrixError> {
        let (rows, cols) = self.shape();
        match self.get_mut(row, col) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows,
                cols,
            }),
        }
    }

    /// Contiguous column `col`. Panics if `col >= cols`.
    #[inline]
    pub fn column(&self, col: usize) -> &[ElT] {
        self.storage.column(col, self.rows)
    }

    /// Mutable contiguous column `col`. Panics if `col >= cols`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [ElT] {
        self.storage.column_mut(col, self.rows)
    }

    /// Iterate coordinates in storage (column-major) order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + use<ElT> {
        let rows = self.rows;
        (0..self.len()).map(move |i| linear_to_coords(i, rows))
    }

    /// Fill all elements with a value.
    pub fn fill(&mut self, value: ElT) {
        self.data_mut().fill(value);
    }

    /// Change the shape; contents are reset to zero.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.storage.reset_zeroed(rows * cols);
        self.rows = rows;
        self.cols = cols;
    }

    /// Copy of columns `start..start + count`.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::SliceOutOfRange` if `start + count > cols`.
    ///
    /// # Example
    ///
    /// ```
    /// use spmatrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_vec((1..=6).map(f64::from).collect(), 2, 3).unwrap();
    /// let s = m.column_slice(1, 2).unwrap();
    /// assert_eq!(s.shape(), (2, 2));
    /// assert_eq!(s.data(), &[3.0, 4.0, 5.0, 6.0]);
    /// ```
    pub fn column_slice(&self, start: usize, count: usize) -> Result<Self, MatrixError> {
        check_column_range(start, count, self.cols)?;
        let range = start * self.rows..(start + count) * self.rows;
        Ok(Self {
            storage: Dense::from_vec(self.data()[range].to_vec()),
            rows: self.rows,
            cols: count,
        })
    }

    /// True if shapes match and every element pair differs by at most
    /// `epsilon` in absolute value.
    pub fn is_equal_to(&self, other: &Self, epsilon: ElT) -> bool {
        self.shape() == other.shape()
            && self
                .data()
                .iter()
                .zip(other.data())
                .all(|(&a, &b)| (a - b).abs_value() <= epsilon)
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| {
            self.storage[linear_index(c, r, self.rows)]
        })
    }

    /// Multiply every element by `alpha` in place.
    pub fn scale(&mut self, alpha: ElT) {
        for x in self.data_mut() {
            *x *= alpha;
        }
    }

    /// Raise every element below `threshold` to `threshold`.
    pub fn inplace_truncate_bottom(&mut self, threshold: ElT) {
        for x in self.data_mut() {
            if *x < threshold {
                *x = threshold;
            }
        }
    }

    /// Set every element with `|x| < threshold` to zero.
    pub fn set_to_zero_if_abs_less_than(&mut self, threshold: ElT) {
        for x in self.data_mut() {
            if x.abs_value() < threshold {
                *x = ElT::zero();
            }
        }
    }

    /// Number of elements that are not exactly zero.
    pub fn count_nonzero(&self) -> usize {
        self.data().iter().filter(|x| !x.is_exact_zero()).count()
    }
}

impl<ElT: Scalar> std::ops::Index<(usize, usize)> for DenseMatrix<ElT> {
    type Output = ElT;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &ElT {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.storage[linear_index(row, col, self.rows)]
    }
}

impl<ElT: Scalar> std::ops::IndexMut<(usize, usize)> for DenseMatrix<ElT> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut ElT {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        let rows = self.rows;
        &mut self.storage[linear_index(row, col, rows)]
    }
}

/// Validate a column range against a column count.
pub(crate) fn check_column_range(
    start: usize,
    count: usize,
    cols: usize,
) -> Result<(), MatrixError> {
    match start.checked_add(count) {
        Some(end) if end <= cols => Ok(()),
        _ => Err(MatrixError::SliceOutOfRange { start, count, cols }),
    }
}
