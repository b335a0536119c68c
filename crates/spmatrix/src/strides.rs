//! Index arithmetic for column-major matrices.
//!
//! Dense matrices and block-column value buffers share this layout:
//! element `(row, col)` lives at `row + col * rows`.

/// Convert `(row, col)` to a linear offset in a column-major buffer.
///
/// # Examples
///
/// ```
/// use spmatrix::strides::linear_index;
///
/// assert_eq!(linear_index(0, 0, 3), 0);
/// assert_eq!(linear_index(2, 0, 3), 2);
/// assert_eq!(linear_index(1, 2, 3), 7);
/// ```
#[inline]
pub fn linear_index(row: usize, col: usize, rows: usize) -> usize {
    row + col * rows
}

/// Convert a linear offset back to `(row, col)` in a column-major buffer.
///
/// `rows` must be non-zero.
#[inline]
pub fn linear_to_coords(linear: usize, rows: usize) -> (usize, usize) {
    (linear % rows, linear / rows)
}

/// Range of linear offsets covering column `col`.
#[inline]
pub fn column_range(col: usize, rows: usize) -> std::ops::Range<usize> {
    col * rows..(col + 1) * rows
}
