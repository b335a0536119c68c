//! Random matrix fills.
//!
//! Every fill takes either an explicit seed or a caller-owned RNG; there is
//! no process-wide random state. `SeedCounter` hands out successive seeds for
//! code that needs several independent, reproducible fills.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::dense_matrix::DenseMatrix;
use crate::scalar::Scalar;

/// Trait for types that can be sampled uniformly from a half-open interval.
pub trait RandomUniform: Scalar {
    /// Sample from `[low, high)`. Returns `low` when the interval is empty.
    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, low: Self, high: Self) -> Self;
}

impl RandomUniform for f64 {
    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, low: Self, high: Self) -> Self {
        if low < high {
            rng.random_range(low..high)
        } else {
            low
        }
    }
}

impl RandomUniform for f32 {
    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, low: Self, high: Self) -> Self {
        if low < high {
            rng.random_range(low..high)
        } else {
            low
        }
    }
}

/// Deterministic source of seeds, one per call to [`SeedCounter::next_seed`].
///
/// # Example
///
/// ```
/// use spmatrix::random::SeedCounter;
///
/// let mut seeds = SeedCounter::new(7);
/// assert_eq!(seeds.next_seed(), 7);
/// assert_eq!(seeds.next_seed(), 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedCounter {
    next: u64,
}

impl SeedCounter {
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    /// Return the current seed and advance.
    pub fn next_seed(&mut self) -> u64 {
        let seed = self.next;
        self.next = self.next.wrapping_add(1);
        seed
    }
}

impl<ElT: RandomUniform> DenseMatrix<ElT> {
    /// Fill every element independently from `U[low, high)` using a seeded RNG.
    ///
    /// The same seed always yields the same matrix.
    ///
    /// # Example
    ///
    /// ```
    /// use spmatrix::DenseMatrix;
    ///
    /// let mut a: DenseMatrix<f64> = DenseMatrix::zeros(3, 4);
    /// let mut b: DenseMatrix<f64> = DenseMatrix::zeros(3, 4);
    /// a.set_uniform_random_value(-1.0, 1.0, 42);
    /// b.set_uniform_random_value(-1.0, 1.0, 42);
    /// assert_eq!(a, b);
    /// assert!(a.data().iter().all(|&x| (-1.0..1.0).contains(&x)));
    /// ```
    pub fn set_uniform_random_value(&mut self, low: ElT, high: ElT, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.set_uniform_random_value_with_rng(low, high, &mut rng);
    }

    /// Fill every element independently from `U[low, high)` using `rng`.
    pub fn set_uniform_random_value_with_rng<R: Rng + ?Sized>(
        &mut self,
        low: ElT,
        high: ElT,
        rng: &mut R,
    ) {
        for x in self.data_mut() {
            *x = ElT::sample_uniform(rng, low, high);
        }
    }

    /// Create a `rows x cols` matrix filled from `U[low, high)`.
    pub fn random_uniform(rows: usize, cols: usize, low: ElT, high: ElT, seed: u64) -> Self {
        let mut m = Self::zeros(rows, cols);
        m.set_uniform_random_value(low, high, seed);
        m
    }
}

impl<ElT: Scalar> DenseMatrix<ElT> {
    /// Fill every element independently from `N(mean, sigma^2)` using a
    /// seeded RNG. A non-positive or non-finite `sigma` fills with `mean`.
    pub fn set_gaussian_random_value(&mut self, mean: ElT, sigma: ElT, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mean_f = mean.to_f64();
        match Normal::new(mean_f, sigma.to_f64()) {
            Ok(normal) if sigma > ElT::zero() => {
                for x in self.data_mut() {
                    *x = ElT::from_f64(normal.sample(&mut rng));
                }
            }
            _ => self.fill(mean),
        }
    }
}
