//! Dense real/complex matrix algebra over native linear-algebra kernels.
//!
//! The crate is organized around four layers:
//!
//! - [`DenseMatrix`] / [`MatrixView`]: an owned row-major buffer with cached
//!   structural predicates, and its non-owning read-only view. Both satisfy
//!   the [`MatrixRead`] capability, so every operation accepts either.
//! - [`dispatch`]: the operand dispatch layer resolving every
//!   {matrix, view, scalar, null} x {real, complex} pairing of each binary
//!   operator into one shared implementation, with validation ahead of any
//!   kernel work.
//! - [`solve`] and [`decomp`]: structure-aware division (triangular /
//!   Cholesky-with-LU-fallback / LU / least squares, chosen from the divisor's
//!   cached structure) and the spectral/SVD engines.
//! - [`kernel`]: the pluggable native-kernel capability with a pure-Rust
//!   default backend and a process-global dispatcher.
//!
//! Statistics ([`stats`]), sorting with permutations ([`sort`]) and random
//! sampling ([`sampling`] over [`random::RandomStream`]) round out the
//! surface.
//!
//! # Example
//! ```
//! use dense_la::{DenseMatrix, stats, DataOperation};
//!
//! let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! let b = DenseMatrix::identity(2);
//! let sum = &a + &b;
//! assert_eq!(sum.get(0, 0).unwrap(), 2.0);
//! assert_eq!(stats::sum_all(&a), 10.0);
//! let row_means = stats::mean_along(&a.view(), DataOperation::OnRows);
//! assert_eq!(row_means.as_slice(), &[1.5, 3.5]);
//! ```

pub mod decomp;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod kernel;
pub mod matrix;
pub mod messages;
pub mod ops;
pub mod random;
pub mod sampling;
pub mod solve;
pub mod sort;
pub mod stats;
pub mod structure;
pub mod traits;
pub mod view;

pub use decomp::{SpectralDecomposition, Spectrum, SvdDecomposition};
pub use dispatch::{BinaryOp, Operand};
pub use error::{ErrorKind, MatrixError, OperandSide, Result};
pub use index::IndexCollection;
pub use kernel::{
    kernel_info, reset_kernel, set_kernel, KernelHandle, NativeKernel, StorageOrder,
};
pub use matrix::DenseMatrix;
pub use random::RandomStream;
pub use sampling::{simple_random_sample, unequal_probability_sample, SampleDraw};
pub use sort::{SortIndexResult, SortOrder};
pub use stats::{DataOperation, Normalization};
pub use structure::MatrixStructure;
pub use traits::{MatrixRead, Scalar};
pub use view::MatrixView;

#[cfg(test)]
mod sampling_tests;
