//! Scalar trait for matrix element types.

use faer_traits::ComplexField;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

/// Trait for scalar types supported by spmatrix.
///
/// This wraps faer's `ComplexField` (needed by the GEMM reference path)
/// with the real-valued arithmetic the sparse kernels run on.
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
    + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Absolute value.
    fn abs_value(self) -> Self;

    /// Lossy conversion from `f64`, used for tolerances and random bounds.
    fn from_f64(value: f64) -> Self;

    /// Widening conversion to `f64`.
    fn to_f64(self) -> f64;

    /// True if the value compares equal to zero (`-0.0` included).
    #[inline]
    fn is_exact_zero(self) -> bool {
        self == Self::zero()
    }
}

impl Scalar for f64 {
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn abs_value(self) -> Self {
        self.abs()
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl Scalar for f32 {
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn abs_value(self) -> Self {
        self.abs()
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}
