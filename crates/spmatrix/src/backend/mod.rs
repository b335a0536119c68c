//! Backend glue for dense linear algebra.
//!
//! The `faer_interop` module provides zero-copy conversion between
//! `DenseMatrix` and faer's matrix types. The dense reference kernels in
//! `operations` run faer's GEMM through these views.

mod faer_interop;

pub use faer_interop::{AsFaerMat, dense_from_faer_mat, faer_mat_from_dense};
