//! Compressed sparse column (CSC) storage.
//!
//! Three parallel arrays:
//!
//! ```text
//! col_ptr: [0, 1, 3]        len = cols + 1, non-decreasing
//! row_idx: [3, 2, 3]        len = nnz
//! values:  [4.0, 5.0, 6.0]  len = nnz
//! ```
//!
//! Column `c` owns the entries `col_ptr[c]..col_ptr[c + 1]`. Row indices
//! inside a column are unique but not necessarily sorted.

use crate::error::MatrixError;
use crate::scalar::Scalar;

/// CSC payload of a sparse matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CscStorage<ElT: Scalar> {
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<ElT>,
}

impl<ElT: Scalar> CscStorage<ElT> {
    /// Empty storage for `cols` columns, reserving room for `nnz_hint` entries.
    pub fn empty(cols: usize, nnz_hint: usize) -> Self {
        Self {
            col_ptr: vec![0; cols + 1],
            row_idx: Vec::with_capacity(nnz_hint),
            values: Vec::with_capacity(nnz_hint),
        }
    }

    /// Build storage from raw CSC arrays after validating them.
    ///
    /// # Errors
    ///
    /// - `InconsistentBulkLoad` if array lengths disagree, `col_ptr` does not
    ///   start at 0, decreases, does not end at `nnz`, or a column repeats a row.
    /// - `IndexOutOfRange` if a row index is `>= rows`.
    pub fn from_raw(
        col_ptr: &[usize],
        row_idx: &[usize],
        values: &[ElT],
        nnz: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self, MatrixError> {
        validate_csc(col_ptr, row_idx, values.len(), nnz, rows, cols)?;
        Ok(Self {
            col_ptr: col_ptr.to_vec(),
            row_idx: row_idx.to_vec(),
            values: values.to_vec(),
        })
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.col_ptr.len() - 1
    }

    /// Column pointer array (`cols + 1` entries).
    #[inline]
    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    /// Row index array (`nnz` entries).
    #[inline]
    pub fn row_idx(&self) -> &[usize] {
        &self.row_idx
    }

    /// Value array (`nnz` entries).
    #[inline]
    pub fn values(&self) -> &[ElT] {
        &self.values
    }

    /// Row indices and values of column `col`.
    #[inline]
    pub fn column(&self, col: usize) -> (&[usize], &[ElT]) {
        let range = self.col_ptr[col]..self.col_ptr[col + 1];
        (&self.row_idx[range.clone()], &self.values[range])
    }

    /// Iterate stored entries as `(row, col, value)`, column by column.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, ElT)> + '_ {
        self.col_ptr
            .windows(2)
            .enumerate()
            .flat_map(move |(col, w)| {
                (w[0]..w[1]).map(move |k| (self.row_idx[k], col, self.values[k]))
            })
    }

    fn position(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.col_ptr[col];
        self.row_idx[start..self.col_ptr[col + 1]]
            .iter()
            .position(|&r| r == row)
            .map(|k| start + k)
    }

    /// Value at `(row, col)`, zero if not stored. Coordinates must be in range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> ElT {
        self.position(row, col)
            .map_or(ElT::zero(), |k| self.values[k])
    }

    /// Insert or overwrite the value at `(row, col)`.
    ///
    /// A stored entry is overwritten in place, even with zero. A zero written
    /// to an absent position is not stored. New entries are appended to the
    /// end of their column's range.
    pub fn set(&mut self, row: usize, col: usize, value: ElT) {
        if let Some(k) = self.position(row, col) {
            self.values[k] = value;
            return;
        }
        if value.is_exact_zero() {
            return;
        }
        let at = self.col_ptr[col + 1];
        self.row_idx.insert(at, row);
        self.values.insert(at, value);
        for p in &mut self.col_ptr[col + 1..] {
            *p += 1;
        }
    }

    /// Copy of columns `start..start + count` with re-based column pointers.
    pub fn slice_columns(&self, start: usize, count: usize) -> Self {
        let lo = self.col_ptr[start];
        let hi = self.col_ptr[start + count];
        Self {
            col_ptr: self.col_ptr[start..=start + count]
                .iter()
                .map(|&p| p - lo)
                .collect(),
            row_idx: self.row_idx[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }

    /// Scatter columns `start..start + count` into a zeroed column-major
    /// buffer of `rows * count` elements.
    pub fn write_dense(&self, start: usize, count: usize, rows: usize, out: &mut [ElT]) {
        for j in 0..count {
            let (rs, vs) = self.column(start + j);
            let dst = &mut out[j * rows..(j + 1) * rows];
            for (&r, &v) in rs.iter().zip(vs) {
                dst[r] = v;
            }
        }
    }
}

fn validate_csc(
    col_ptr: &[usize],
    row_idx: &[usize],
    values_len: usize,
    nnz: usize,
    rows: usize,
    cols: usize,
) -> Result<(), MatrixError> {
    let inconsistent = |reason: String| Err(MatrixError::InconsistentBulkLoad { reason });

    if col_ptr.len() != cols + 1 {
        return inconsistent(format!(
            "column pointer array has {} entries, expected {}",
            col_ptr.len(),
            cols + 1
        ));
    }
    if row_idx.len() != nnz || values_len != nnz {
        return inconsistent(format!(
            "row index / value arrays have {} / {} entries, expected nnz = {}",
            row_idx.len(),
            values_len,
            nnz
        ));
    }
    if col_ptr[0] != 0 {
        return inconsistent(format!("col_ptr[0] = {}, expected 0", col_ptr[0]));
    }
    if let Some(c) = col_ptr.windows(2).position(|w| w[0] > w[1]) {
        return inconsistent(format!(
            "column pointers decrease at column {c}: {} > {}",
            col_ptr[c],
            col_ptr[c + 1]
        ));
    }
    if col_ptr[cols] != nnz {
        return inconsistent(format!(
            "col_ptr[{cols}] = {}, expected nnz = {nnz}",
            col_ptr[cols]
        ));
    }

    // Scratch is sized by the longest column, not by `rows`.
    let mut sorted = Vec::new();
    for (col, w) in col_ptr.windows(2).enumerate() {
        let column = &row_idx[w[0]..w[1]];
        if let Some(&row) = column.iter().find(|&&r| r >= rows) {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows,
                cols,
            });
        }
        sorted.clear();
        sorted.extend_from_slice(column);
        sorted.sort_unstable();
        if let Some(d) = sorted.windows(2).find(|d| d[0] == d[1]) {
            return inconsistent(format!("row {} appears twice in column {col}", d[0]));
        }
    }
    Ok(())
}
