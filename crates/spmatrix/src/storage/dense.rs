//! Dense storage for matrix data.

use crate::scalar::Scalar;
use crate::strides::column_range;

/// Dense storage - contiguous array of elements in column-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<ElT: Scalar> {
    data: Vec<ElT>,
}

impl<ElT: Scalar> Dense<ElT> {
    /// Create dense storage with given length, zero-initialized.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![ElT::zero(); len],
        }
    }

    /// Create dense storage from existing vector (takes ownership).
    pub fn from_vec(data: Vec<ElT>) -> Self {
        Self { data }
    }

    /// Length of storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get immutable slice of data.
    #[inline]
    pub fn as_slice(&self) -> &[ElT] {
        &self.data
    }

    /// Get mutable slice of data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [ElT] {
        &mut self.data
    }

    /// Column `col` of a column-major buffer with `rows` rows.
    #[inline]
    pub fn column(&self, col: usize, rows: usize) -> &[ElT] {
        &self.data[column_range(col, rows)]
    }

    /// Mutable column `col` of a column-major buffer with `rows` rows.
    #[inline]
    pub fn column_mut(&mut self, col: usize, rows: usize) -> &mut [ElT] {
        &mut self.data[column_range(col, rows)]
    }

    /// Resize to `len` elements and zero everything.
    pub fn reset_zeroed(&mut self, len: usize) {
        self.data.clear();
        self.data.resize(len, ElT::zero());
    }
}

impl<ElT: Scalar> std::ops::Index<usize> for Dense<ElT> {
    type Output = ElT;

    #[inline]
    fn index(&self, i: usize) -> &ElT {
        &self.data[i]
    }
}

impl<ElT: Scalar> std::ops::IndexMut<usize> for Dense<ElT> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut ElT {
        &mut self.data[i]
    }
}
