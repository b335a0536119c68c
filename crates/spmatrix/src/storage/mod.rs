//! Storage types for matrix data.
//!
//! ```text
//! Dense<T>              - contiguous column-major array
//! SparseStorage<T>      - tagged sparse payload
//! ├── Csc(CscStorage)        - compressed sparse column
//! └── BlockCol(BlockColStorage) - dense blocks for a subset of columns
//! ```
//!
//! The format tag of a sparse matrix is the variant of `SparseStorage`, so
//! the tag and the buffer layout cannot disagree.

mod block_col;
mod csc;
mod dense;

use std::fmt;

use crate::scalar::Scalar;

pub use block_col::BlockColStorage;
pub use csc::CscStorage;
pub use dense::Dense;

/// Physical layout of a sparse matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseFormat {
    /// Compressed sparse column.
    Csc,
    /// Sparse block-column: whole dense columns for a subset of column ids.
    BlockCol,
}

impl fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SparseFormat::Csc => f.write_str("CSC"),
            SparseFormat::BlockCol => f.write_str("block-column"),
        }
    }
}

/// Format-tagged sparse payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SparseStorage<ElT: Scalar> {
    Csc(CscStorage<ElT>),
    BlockCol(BlockColStorage<ElT>),
}

impl<ElT: Scalar> SparseStorage<ElT> {
    /// Empty payload of the given format.
    ///
    /// The hint is capped at `rows * cols`. For block-column storage it is
    /// converted to a block count.
    pub fn empty(format: SparseFormat, rows: usize, cols: usize, nnz_hint: usize) -> Self {
        match format {
            SparseFormat::Csc => {
                let capacity = nnz_hint.min(rows.saturating_mul(cols));
                SparseStorage::Csc(CscStorage::empty(cols, capacity))
            }
            SparseFormat::BlockCol => {
                let blocks = if rows == 0 {
                    0
                } else {
                    nnz_hint.div_ceil(rows).min(cols)
                };
                SparseStorage::BlockCol(BlockColStorage::empty(rows, cols, blocks))
            }
        }
    }

    /// Format tag of this payload.
    #[inline]
    pub fn format(&self) -> SparseFormat {
        match self {
            SparseStorage::Csc(_) => SparseFormat::Csc,
            SparseStorage::BlockCol(_) => SparseFormat::BlockCol,
        }
    }

    /// Number of stored elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        match self {
            SparseStorage::Csc(s) => s.nnz(),
            SparseStorage::BlockCol(s) => s.nnz(),
        }
    }

    /// Value at `(row, col)`; coordinates must be in range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> ElT {
        match self {
            SparseStorage::Csc(s) => s.get(row, col),
            SparseStorage::BlockCol(s) => s.get(row, col),
        }
    }

    /// Insert or overwrite `(row, col)`; coordinates must be in range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: ElT) {
        match self {
            SparseStorage::Csc(s) => s.set(row, col, value),
            SparseStorage::BlockCol(s) => s.set(row, col, value),
        }
    }

    /// Copy of a column range in the same format.
    pub fn slice_columns(&self, start: usize, count: usize) -> Self {
        match self {
            SparseStorage::Csc(s) => SparseStorage::Csc(s.slice_columns(start, count)),
            SparseStorage::BlockCol(s) => SparseStorage::BlockCol(s.slice_columns(start, count)),
        }
    }

    /// Scatter a column range into a zeroed column-major buffer.
    pub fn write_dense(&self, start: usize, count: usize, rows: usize, out: &mut [ElT]) {
        match self {
            SparseStorage::Csc(s) => s.write_dense(start, count, rows, out),
            SparseStorage::BlockCol(s) => s.write_dense(start, count, out),
        }
    }

    /// Visit every stored `(row, col, value)` triple.
    pub fn for_each_stored(&self, mut f: impl FnMut(usize, usize, ElT)) {
        match self {
            SparseStorage::Csc(s) => {
                for (row, col, v) in s.entries() {
                    f(row, col, v);
                }
            }
            SparseStorage::BlockCol(s) => {
                for (b, &col) in s.block_ids().iter().enumerate() {
                    for (row, &v) in s.block(b).iter().enumerate() {
                        f(row, col, v);
                    }
                }
            }
        }
    }
}
