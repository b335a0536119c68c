//! Sparse block-column (SBC) storage.
//!
//! Only a subset of columns is stored, each one as a full dense column:
//!
//! ```text
//! logical 4x4:            block_ids: [0, 1]
//! [0 0 0 0]               values (column-major, rows x num_blocks):
//! [0 0 0 0]                 [0, 0, 0, 4,   0, 0, 5, 6]
//! [0 5 0 0]                  \_block 0_/   \_block 1_/
//! [4 6 0 0]
//! ```
//!
//! `block_ids` is strictly increasing, so block order equals column order.

use crate::error::MatrixError;
use crate::scalar::Scalar;
use crate::strides::column_range;

/// Block-column payload of a sparse matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockColStorage<ElT: Scalar> {
    rows: usize,
    block_ids: Vec<usize>,
    values: Vec<ElT>,
    /// Reverse map from logical column to block index.
    col_to_block: Vec<Option<usize>>,
}

impl<ElT: Scalar> BlockColStorage<ElT> {
    /// Empty storage for a `rows x cols` matrix, reserving room for
    /// `block_hint` blocks.
    pub fn empty(rows: usize, cols: usize, block_hint: usize) -> Self {
        Self {
            rows,
            block_ids: Vec::with_capacity(block_hint),
            values: Vec::with_capacity(block_hint.saturating_mul(rows)),
            col_to_block: vec![None; cols],
        }
    }

    /// Build storage from a block-id list and its dense column buffer.
    ///
    /// # Errors
    ///
    /// - `InconsistentBulkLoad` if lengths disagree with `num_blocks` or the
    ///   ids are not strictly increasing.
    /// - `IndexOutOfRange` if an id is `>= cols`.
    pub fn from_raw(
        block_ids: &[usize],
        values: &[ElT],
        num_blocks: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self, MatrixError> {
        if block_ids.len() != num_blocks {
            return Err(MatrixError::InconsistentBulkLoad {
                reason: format!(
                    "block id array has {} entries, expected num_blocks = {num_blocks}",
                    block_ids.len()
                ),
            });
        }
        if values.len() != rows * num_blocks {
            return Err(MatrixError::InconsistentBulkLoad {
                reason: format!(
                    "block value buffer has {} entries, expected {rows} x {num_blocks}",
                    values.len()
                ),
            });
        }
        if let Some(&col) = block_ids.iter().find(|&&id| id >= cols) {
            return Err(MatrixError::IndexOutOfRange {
                row: 0,
                col,
                rows,
                cols,
            });
        }
        if let Some(i) = block_ids.windows(2).position(|w| w[0] >= w[1]) {
            return Err(MatrixError::InconsistentBulkLoad {
                reason: format!(
                    "block ids must be strictly increasing: {} at position {i} is followed by {}",
                    block_ids[i],
                    block_ids[i + 1]
                ),
            });
        }

        let mut storage = Self {
            rows,
            block_ids: block_ids.to_vec(),
            values: values.to_vec(),
            col_to_block: vec![None; cols],
        };
        storage.reindex();
        Ok(storage)
    }

    fn reindex(&mut self) {
        self.col_to_block.fill(None);
        for (b, &id) in self.block_ids.iter().enumerate() {
            self.col_to_block[id] = Some(b);
        }
    }

    /// Number of rows of every block.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of logical columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.col_to_block.len()
    }

    /// Number of stored blocks.
    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.block_ids.len()
    }

    /// Stored elements, `rows * num_blocks`.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Logical column of each block, ascending.
    #[inline]
    pub fn block_ids(&self) -> &[usize] {
        &self.block_ids
    }

    /// Dense column-major buffer of all blocks.
    #[inline]
    pub fn values(&self) -> &[ElT] {
        &self.values
    }

    /// Block index holding logical column `col`, if stored.
    #[inline]
    pub fn block_of(&self, col: usize) -> Option<usize> {
        self.col_to_block[col]
    }

    /// Dense values of block `b`.
    #[inline]
    pub fn block(&self, b: usize) -> &[ElT] {
        &self.values[column_range(b, self.rows)]
    }

    /// Mutable dense values of block `b`.
    #[inline]
    pub fn block_mut(&mut self, b: usize) -> &mut [ElT] {
        &mut self.values[column_range(b, self.rows)]
    }

    /// Dense values of logical column `col`, if stored.
    #[inline]
    pub fn column(&self, col: usize) -> Option<&[ElT]> {
        self.block_of(col).map(|b| self.block(b))
    }

    /// Mutable dense values of logical column `col`, if stored.
    pub fn column_mut(&mut self, col: usize) -> Option<&mut [ElT]> {
        let b = self.block_of(col)?;
        Some(self.block_mut(b))
    }

    /// Value at `(row, col)`, zero if the column is not stored.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> ElT {
        self.column(col).map_or(ElT::zero(), |c| c[row])
    }

    /// Insert or overwrite the value at `(row, col)`.
    ///
    /// A zero written to an absent column does not create a block.
    pub fn set(&mut self, row: usize, col: usize, value: ElT) {
        if self.block_of(col).is_none() && value.is_exact_zero() {
            return;
        }
        let b = self.ensure_block(col);
        self.block_mut(b)[row] = value;
    }

    /// Return the block index of `col`, inserting a zero block in sorted
    /// position if the column is not stored yet.
    pub fn ensure_block(&mut self, col: usize) -> usize {
        if let Some(b) = self.col_to_block[col] {
            return b;
        }
        let pos = self.block_ids.partition_point(|&id| id < col);
        self.block_ids.insert(pos, col);
        let at = pos * self.rows;
        self.values
            .splice(at..at, std::iter::repeat_n(ElT::zero(), self.rows));
        for (b, &id) in self.block_ids.iter().enumerate().skip(pos) {
            self.col_to_block[id] = Some(b);
        }
        pos
    }

    /// Make sure every column in `cols` has a block, merging all new zero
    /// blocks in one pass.
    pub fn ensure_blocks(&mut self, cols: &[usize]) {
        let mut missing: Vec<usize> = cols
            .iter()
            .copied()
            .filter(|&c| self.col_to_block[c].is_none())
            .collect();
        if missing.is_empty() {
            return;
        }
        missing.sort_unstable();
        missing.dedup();

        let rows = self.rows;
        let total = self.block_ids.len() + missing.len();
        let mut ids = Vec::with_capacity(total);
        let mut values = Vec::with_capacity(total * rows);
        let (mut i, mut j) = (0, 0);
        while i < self.block_ids.len() || j < missing.len() {
            let take_existing =
                j == missing.len() || (i < self.block_ids.len() && self.block_ids[i] < missing[j]);
            if take_existing {
                ids.push(self.block_ids[i]);
                values.extend_from_slice(&self.values[i * rows..(i + 1) * rows]);
                i += 1;
            } else {
                ids.push(missing[j]);
                values.extend(std::iter::repeat_n(ElT::zero(), rows));
                j += 1;
            }
        }
        self.block_ids = ids;
        self.values = values;
        self.reindex();
    }

    /// Copy of columns `start..start + count` with re-based block ids.
    pub fn slice_columns(&self, start: usize, count: usize) -> Self {
        let lo = self.block_ids.partition_point(|&id| id < start);
        let hi = self.block_ids.partition_point(|&id| id < start + count);
        let ids = &self.block_ids[lo..hi];
        let mut sliced = Self {
            rows: self.rows,
            block_ids: ids.iter().map(|&id| id - start).collect(),
            values: self.values[lo * self.rows..hi * self.rows].to_vec(),
            col_to_block: vec![None; count],
        };
        sliced.reindex();
        sliced
    }

    /// Copy stored columns within `start..start + count` into a zeroed
    /// column-major buffer of `rows * count` elements.
    pub fn write_dense(&self, start: usize, count: usize, out: &mut [ElT]) {
        let rows = self.rows;
        let lo = self.block_ids.partition_point(|&id| id < start);
        for (b, &id) in self.block_ids.iter().enumerate().skip(lo) {
            if id >= start + count {
                break;
            }
            let j = id - start;
            out[j * rows..(j + 1) * rows].copy_from_slice(self.block(b));
        }
    }
}
