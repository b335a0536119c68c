//! Error types for spmatrix.

use thiserror::Error;

use crate::storage::SparseFormat;

/// Errors that can occur in matrix operations.
///
/// Every variant is a local precondition fault: the operation that raised it
/// left its operands unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Operand dimensions are incompatible for the requested operation.
    #[error("shape mismatch in {operation}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        operation: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Flat buffer length does not match the declared shape.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Operation requires a different sparse layout.
    #[error("format mismatch: operation requires {expected}, matrix holds {actual}")]
    FormatMismatch {
        expected: SparseFormat,
        actual: SparseFormat,
    },

    /// Element coordinates outside the declared shape.
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Column range outside the declared shape.
    #[error("column slice {start}..{start}+{count} out of range for {cols} columns")]
    SliceOutOfRange {
        start: usize,
        count: usize,
        cols: usize,
    },

    /// Bulk-load arrays violate the structural invariants of their format.
    #[error("inconsistent bulk load: {reason}")]
    InconsistentBulkLoad { reason: String },
}
