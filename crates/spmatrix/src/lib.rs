//! spmatrix - CPU sparse matrices in CSC and block-column layout
//!
//! This crate provides a column-major dense matrix, a sparse matrix with two
//! physical layouts, and the multiply-accumulate and scale-accumulate kernels
//! that combine them.
//!
//! # Layouts
//!
//! ```text
//! DenseMatrix      - rows x cols, column-major
//! SparseMatrix
//! ├── Csc          - col_ptr / row_idx / values
//! └── BlockCol     - sorted block ids, one dense column per block
//! ```
//!
//! Kernels live in [`operations`]; the faer-backed `dense_*` kernels are the
//! reference the sparse ones are verified against (see
//! [`matrix_like::all_close`]).
//!
//! # Example
//!
//! ```
//! use spmatrix::{DenseMatrix, SparseFormat, SparseMatrix};
//! use spmatrix::operations::multiply_and_add;
//!
//! // 4x2 sparse matrix from CSC arrays
//! let mut b: SparseMatrix<f64> = SparseMatrix::new(SparseFormat::Csc, 4, 2, 3);
//! b.set_matrix_from_csc_format(&[0, 1, 3], &[3, 2, 3], &[4.0, 5.0, 6.0], 3, 4, 2)
//!     .unwrap();
//!
//! // result += A * B^T with a block-column accumulator
//! let a = DenseMatrix::from_row_major(&[1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
//! let mut result = SparseMatrix::with_format(SparseFormat::BlockCol);
//! multiply_and_add(1.0, &a, false, &b, true, &mut result).unwrap();
//!
//! assert_eq!(result.shape(), (2, 4));
//! assert_eq!(result.block_ids().unwrap(), &[2, 3]);
//! assert_eq!(result.get(0, 3).unwrap(), 1.0 * 4.0 + 2.0 * 6.0);
//! ```

pub mod backend;
pub mod dense_matrix;
pub mod error;
pub mod matrix_like;
pub mod operations;
pub mod random;
pub mod scalar;
pub mod sparse_matrix;
pub mod storage;
pub mod strides;

pub use dense_matrix::DenseMatrix;
pub use error::MatrixError;
pub use matrix_like::MatrixLike;
pub use random::{RandomUniform, SeedCounter};
pub use scalar::Scalar;
pub use sparse_matrix::SparseMatrix;
pub use storage::{SparseFormat, SparseStorage};
