//! Random number streams.
//!
//! [`RandomStream`] models the native stream lifecycle: created from a seed,
//! exclusively owned by one generation context, and released exactly once.
//! Release is deterministic (Rust drop semantics); [`RandomStream::close`]
//! surfaces it explicitly for callers that want to observe release, and
//! [`RandomStream::scoped`] bounds a stream to a closure the way the native
//! acquire/release pair would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::Result;
use crate::matrix::DenseMatrix;

/// A seeded, exclusively owned random number stream.
pub struct RandomStream {
    rng: StdRng,
}

impl RandomStream {
    /// Create a stream from a seed. Equal seeds replay equal sequences.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next uniform variate in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Fill `out` with uniform variates in `[0, 1)`.
    pub fn fill_uniform(&mut self, out: &mut [f64]) {
        for slot in out {
            *slot = self.rng.gen();
        }
    }

    /// Fill `out` with gaussian variates of the given mean and deviation.
    pub fn fill_gaussian(&mut self, mean: f64, stddev: f64, out: &mut [f64]) {
        for slot in out {
            let z: f64 = self.rng.sample(StandardNormal);
            *slot = mean + stddev * z;
        }
    }

    /// Release the stream, surfacing any release failure.
    ///
    /// The host-side stream cannot fail to release; the signature exists so
    /// kernel-backed streams can report theirs without leaking.
    pub fn close(self) -> Result<()> {
        Ok(())
    }

    /// Run `f` with a stream that is released when the closure exits,
    /// normally or by unwinding.
    pub fn scoped<R>(seed: u64, f: impl FnOnce(&mut RandomStream) -> R) -> R {
        let mut stream = Self::with_seed(seed);
        f(&mut stream)
    }
}

impl DenseMatrix<f64> {
    /// Matrix of uniform variates in `[0, 1)`.
    pub fn random_uniform(rows: usize, cols: usize, stream: &mut RandomStream) -> Self {
        let mut data = vec![0.0; rows * cols];
        stream.fill_uniform(&mut data);
        DenseMatrix::from_parts(rows, cols, data)
    }

    /// Matrix of gaussian variates.
    pub fn random_gaussian(
        rows: usize,
        cols: usize,
        mean: f64,
        stddev: f64,
        stream: &mut RandomStream,
    ) -> Self {
        let mut data = vec![0.0; rows * cols];
        stream.fill_gaussian(mean, stddev, &mut data);
        DenseMatrix::from_parts(rows, cols, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_seeds_replay() {
        let mut a = RandomStream::with_seed(7);
        let mut b = RandomStream::with_seed(7);
        let mut buf_a = [0.0; 16];
        let mut buf_b = [0.0; 16];
        a.fill_uniform(&mut buf_a);
        b.fill_uniform(&mut buf_b);
        assert_eq!(buf_a, buf_b);
        assert!(a.close().is_ok());
    }

    #[test]
    fn uniform_variates_stay_in_range() {
        RandomStream::scoped(42, |stream| {
            for _ in 0..1000 {
                let u = stream.next_uniform();
                assert!((0.0..1.0).contains(&u));
            }
        });
    }

    #[test]
    fn gaussian_moments_are_plausible() {
        let mut stream = RandomStream::with_seed(1234);
        let mut buf = vec![0.0; 20_000];
        stream.fill_gaussian(2.0, 3.0, &mut buf);
        let mean = buf.iter().sum::<f64>() / buf.len() as f64;
        let var = buf.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>()
            / (buf.len() as f64 - 1.0);
        assert!((mean - 2.0).abs() < 0.1);
        assert!((var - 9.0).abs() < 0.4);
    }

    #[test]
    fn random_matrix_constructors() {
        let mut stream = RandomStream::with_seed(5);
        let u = DenseMatrix::random_uniform(3, 4, &mut stream);
        assert_eq!(u.shape(), (3, 4));
        let g = DenseMatrix::random_gaussian(2, 2, 0.0, 1.0, &mut stream);
        assert_eq!(g.shape(), (2, 2));
    }
}
