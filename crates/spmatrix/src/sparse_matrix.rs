//! SparseMatrix - CPU sparse matrix in CSC or block-column layout.
//!
//! A `SparseMatrix` owns a shape and a format-tagged payload
//! ([`SparseStorage`]). Generic operations (`get`, `set_value`, slicing,
//! dense conversion) work on either format; layout-specific accessors return
//! `MatrixError::FormatMismatch` when called on the other format.
//!
//! # Bulk loaders and the format tag
//!
//! `set_matrix_from_csc_format` and `set_matrix_from_sbc_format` always
//! re-tag the matrix to the format they load. The input is validated in
//! full before anything is replaced, so a failed load leaves the previous
//! contents untouched.

use tracing::debug;

use crate::dense_matrix::{DenseMatrix, check_column_range};
use crate::error::MatrixError;
use crate::scalar::Scalar;
use crate::storage::{BlockColStorage, CscStorage, SparseFormat, SparseStorage};

/// A sparse `rows x cols` matrix.
///
/// # Example
///
/// ```
/// use spmatrix::{SparseFormat, SparseMatrix};
///
/// let mut m: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 4, 2, 0);
/// m.set_matrix_from_csc_format(&[0, 1, 3], &[3, 2, 3], &[4.0, 5.0, 6.0], 3, 4, 2)
///     .unwrap();
///
/// assert_eq!(m.nnz(), 3);
/// assert_eq!(m.get(3, 0).unwrap(), 4.0);
/// assert_eq!(m.get(2, 1).unwrap(), 5.0);
/// assert_eq!(m.get(0, 1).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<ElT: Scalar> {
    rows: usize,
    cols: usize,
    storage: SparseStorage<ElT>,
}

impl<ElT: Scalar> SparseMatrix<ElT> {
    /// Create an empty matrix of the given format and shape.
    ///
    /// `nnz_hint` only sizes the initial allocation; the structure grows as
    /// needed.
    pub fn new(format: SparseFormat, rows: usize, cols: usize, nnz_hint: usize) -> Self {
        Self {
            rows,
            cols,
            storage: SparseStorage::empty(format, rows, cols, nnz_hint),
        }
    }

    /// Create an empty 0x0 matrix. Accumulating kernels size it on first use.
    pub fn with_format(format: SparseFormat) -> Self {
        Self::new(format, 0, 0, 0)
    }

    /// Build a sparse copy of a dense matrix. Exact zeros are not stored,
    /// and in block-column format only columns with a nonzero get a block.
    pub fn from_dense(format: SparseFormat, dense: &DenseMatrix<ElT>) -> Self {
        let (rows, cols) = dense.shape();
        let mut m = Self::new(format, rows, cols, dense.count_nonzero());
        match &mut m.storage {
            SparseStorage::Csc(s) => {
                for (row, col) in dense.coords() {
                    s.set(row, col, dense[(row, col)]);
                }
            }
            SparseStorage::BlockCol(s) => {
                let nonzero_cols: Vec<usize> = (0..cols)
                    .filter(|&c| dense.column(c).iter().any(|x| !x.is_exact_zero()))
                    .collect();
                s.ensure_blocks(&nonzero_cols);
                for (b, &c) in nonzero_cols.iter().enumerate() {
                    s.block_mut(b).copy_from_slice(dense.column(c));
                }
            }
        }
        m
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

    /// Format tag.
    #[inline]
    pub fn format(&self) -> SparseFormat {
        self.storage.format()
    }

    /// Number of stored elements (block-column counts whole blocks).
    #[inline]
    pub fn nnz(&self) -> usize {
        self.storage.nnz()
    }

    /// The format-tagged payload.
    #[inline]
    pub fn storage(&self) -> &SparseStorage<ElT> {
        &self.storage
    }

    /// CSC payload.
    ///
    /// # Errors
    ///
    /// `FormatMismatch` if the matrix is block-column.
    pub fn as_csc(&self) -> Result<&CscStorage<ElT>, MatrixError> {
        match &self.storage {
            SparseStorage::Csc(s) => Ok(s),
            other => Err(MatrixError::FormatMismatch {
                expected: SparseFormat::Csc,
                actual: other.format(),
            }),
        }
    }

    /// Block-column payload.
    ///
    /// # Errors
    ///
    /// `FormatMismatch` if the matrix is CSC.
    pub fn as_block_col(&self) -> Result<&BlockColStorage<ElT>, MatrixError> {
        match &self.storage {
            SparseStorage::BlockCol(s) => Ok(s),
            other => Err(MatrixError::FormatMismatch {
                expected: SparseFormat::BlockCol,
                actual: other.format(),
            }),
        }
    }

    pub(crate) fn as_block_col_mut(&mut self) -> Result<&mut BlockColStorage<ElT>, MatrixError> {
        match &mut self.storage {
            SparseStorage::BlockCol(s) => Ok(s),
            other => Err(MatrixError::FormatMismatch {
                expected: SparseFormat::BlockCol,
                actual: other.format(),
            }),
        }
    }

    /// CSC column pointer array.
    pub fn csc_col_ptr(&self) -> Result<&[usize], MatrixError> {
        Ok(self.as_csc()?.col_ptr())
    }

    /// CSC row index array.
    pub fn csc_row_idx(&self) -> Result<&[usize], MatrixError> {
        Ok(self.as_csc()?.row_idx())
    }

    /// Block ids of a block-column matrix.
    pub fn block_ids(&self) -> Result<&[usize], MatrixError> {
        Ok(self.as_block_col()?.block_ids())
    }

    /// Number of blocks of a block-column matrix.
    pub fn num_blocks(&self) -> Result<usize, MatrixError> {
        Ok(self.as_block_col()?.num_blocks())
    }

    /// Dense values of block `b` of a block-column matrix.
    ///
    /// # Errors
    ///
    /// `FormatMismatch` on CSC, `IndexOutOfRange` if `b >= num_blocks`.
    pub fn block_column(&self, b: usize) -> Result<&[ElT], MatrixError> {
        let s = self.as_block_col()?;
        if b >= s.num_blocks() {
            return Err(MatrixError::IndexOutOfRange {
                row: 0,
                col: b,
                rows: self.rows,
                cols: s.num_blocks(),
            });
        }
        Ok(s.block(b))
    }

    /// Stored values in the format's native order.
    pub fn values(&self) -> &[ElT] {
        match &self.storage {
            SparseStorage::Csc(s) => s.values(),
            SparseStorage::BlockCol(s) => s.values(),
        }
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Element at `(row, col)`; zero if not stored.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<ElT, MatrixError> {
        self.check_index(row, col)?;
        Ok(self.storage.get(row, col))
    }

    /// Insert or overwrite the element at `(row, col)`.
    ///
    /// Writing zero over a stored entry keeps the entry (as an explicit zero);
    /// writing zero to an absent position stores nothing.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` outside the matrix.
    pub fn set_value(&mut self, row: usize, col: usize, value: ElT) -> Result<(), MatrixError> {
        self.check_index(row, col)?;
        self.storage.set(row, col, value);
        Ok(())
    }

    /// Replace the contents with raw CSC arrays.
    ///
    /// Reading `(row, col)` afterwards reproduces the loaded values; columns
    /// without entries read as zero. A block-column matrix is re-tagged to CSC.
    ///
    /// # Errors
    ///
    /// `InconsistentBulkLoad` or `IndexOutOfRange` when the arrays violate the
    /// CSC invariants; the matrix is unchanged in that case.
    pub fn set_matrix_from_csc_format(
        &mut self,
        col_ptr: &[usize],
        row_idx: &[usize],
        values: &[ElT],
        nnz: usize,
        rows: usize,
        cols: usize,
    ) -> Result<(), MatrixError> {
        let storage = CscStorage::from_raw(col_ptr, row_idx, values, nnz, rows, cols)?;
        let retagged = self.format() != SparseFormat::Csc;
        debug!(rows, cols, nnz, retagged, "loaded CSC arrays");
        self.rows = rows;
        self.cols = cols;
        self.storage = SparseStorage::Csc(storage);
        Ok(())
    }

    /// Replace the contents with block-column data.
    ///
    /// `block_values` holds `num_blocks` dense columns of `rows` elements,
    /// block `i` being logical column `block_ids[i]`. A CSC matrix is
    /// re-tagged to block-column.
    ///
    /// # Errors
    ///
    /// `InconsistentBulkLoad` or `IndexOutOfRange` when the data violates the
    /// block-column invariants; the matrix is unchanged in that case.
    pub fn set_matrix_from_sbc_format(
        &mut self,
        block_ids: &[usize],
        block_values: &[ElT],
        num_blocks: usize,
        rows: usize,
        cols: usize,
    ) -> Result<(), MatrixError> {
        let storage = BlockColStorage::from_raw(block_ids, block_values, num_blocks, rows, cols)?;
        let retagged = self.format() != SparseFormat::BlockCol;
        debug!(rows, cols, num_blocks, retagged, "loaded block-column data");
        self.rows = rows;
        self.cols = cols;
        self.storage = SparseStorage::BlockCol(storage);
        Ok(())
    }

    /// Sparse copy of columns `start..start + count`, same format.
    ///
    /// # Errors
    ///
    /// `SliceOutOfRange` if `start + count > cols`.
    pub fn column_slice(&self, start: usize, count: usize) -> Result<Self, MatrixError> {
        check_column_range(start, count, self.cols)?;
        Ok(Self {
            rows: self.rows,
            cols: count,
            storage: self.storage.slice_columns(start, count),
        })
    }

    /// Dense copy of columns `start..start + count`.
    ///
    /// # Errors
    ///
    /// `SliceOutOfRange` if `start + count > cols`.
    pub fn copy_column_slice_to_dense(
        &self,
        start: usize,
        count: usize,
    ) -> Result<DenseMatrix<ElT>, MatrixError> {
        check_column_range(start, count, self.cols)?;
        let mut dense = DenseMatrix::zeros(self.rows, count);
        self.storage
            .write_dense(start, count, self.rows, dense.data_mut());
        Ok(dense)
    }

    /// Dense copy of the whole matrix.
    pub fn to_dense(&self) -> DenseMatrix<ElT> {
        let mut dense = DenseMatrix::zeros(self.rows, self.cols);
        self.storage
            .write_dense(0, self.cols, self.rows, dense.data_mut());
        dense
    }

    /// Change the physical layout in place, keeping every value.
    ///
    /// CSC to block-column stores a block for each column with at least one
    /// entry. Block-column to CSC drops the zeros inside blocks.
    pub fn convert_to_format(&mut self, format: SparseFormat) {
        if self.format() == format {
            return;
        }
        let converted = match &self.storage {
            SparseStorage::Csc(s) => {
                let mut out = BlockColStorage::empty(self.rows, self.cols, 0);
                let used: Vec<usize> = (0..self.cols)
                    .filter(|&c| s.col_ptr()[c] < s.col_ptr()[c + 1])
                    .collect();
                out.ensure_blocks(&used);
                for (row, col, v) in s.entries() {
                    if let Some(block) = out.column_mut(col) {
                        block[row] = v;
                    }
                }
                SparseStorage::BlockCol(out)
            }
            SparseStorage::BlockCol(s) => {
                let nonzero = s.values().iter().filter(|x| !x.is_exact_zero()).count();
                let mut out = CscStorage::empty(self.cols, nonzero);
                for (b, &col) in s.block_ids().iter().enumerate() {
                    for (row, &v) in s.block(b).iter().enumerate() {
                        out.set(row, col, v);
                    }
                }
                SparseStorage::Csc(out)
            }
        };
        debug!(
            from = %self.format(),
            to = %format,
            rows = self.rows,
            cols = self.cols,
            "converted sparse format"
        );
        self.storage = converted;
    }

    /// Drop all stored entries, keeping shape and format.
    pub fn reset(&mut self) {
        self.storage = SparseStorage::empty(self.format(), self.rows, self.cols, 0);
    }

    /// Change the shape, dropping all stored entries.
    pub fn resize(&mut self, rows: usize, cols: usize, nnz_hint: usize) {
        self.rows = rows;
        self.cols = cols;
        self.storage = SparseStorage::empty(self.format(), rows, cols, nnz_hint);
    }

    /// Prepare `self` as an accumulator of shape `(rows, cols)`.
    ///
    /// A shapeless matrix (0 rows or 0 columns) is resized; any other shape
    /// must already match, even when nothing is stored.
    pub(crate) fn prepare_accumulator(
        &mut self,
        operation: &'static str,
        rows: usize,
        cols: usize,
    ) -> Result<(), MatrixError> {
        if self.shape() == (rows, cols) {
            return Ok(());
        }
        if self.rows == 0 || self.cols == 0 {
            self.resize(rows, cols, 0);
            return Ok(());
        }
        Err(MatrixError::ShapeMismatch {
            operation,
            expected: (rows, cols),
            actual: self.shape(),
        })
    }
}
