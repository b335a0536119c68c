//! Matrix kernels.
//!
//! - [`multiply_and_add`]: `result += alpha * op(A) * op(B)`, dense `A`,
//!   sparse `B`, block-column `result`.
//! - [`multiply_and_weighted_add`] and [`sparse_dense_multiply_and_weighted_add`]:
//!   `C = alpha * op(A) * op(B) + beta * C` with one sparse operand and a dense `C`.
//! - [`scale_and_accumulate`], [`scale_and_accumulate_dense`]: `acc += scale * addend`
//!   into a block-column accumulator.
//! - [`scale_and_add_to_dense`]: `C += alpha * A` with sparse `A`.
//! - `dense_*`: faer-backed dense reference kernels.
//!
//! `op(X)` is `X` or `X^T` depending on the kernel's transpose flag.

mod accumulate;
mod dense;
mod multiply;

pub use accumulate::{scale_and_accumulate, scale_and_accumulate_dense, scale_and_add_to_dense};
pub use dense::{
    dense_multiply, dense_multiply_and_add, dense_multiply_and_weighted_add, dense_scale_and_add,
};
pub use multiply::{
    multiply_and_add, multiply_and_weighted_add, sparse_dense_multiply_and_weighted_add,
};
