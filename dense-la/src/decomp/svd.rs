//! Singular value decomposition.

use crate::error::Result;
use crate::kernel::{self, StorageOrder};
use crate::matrix::DenseMatrix;
use crate::solve::map_kernel_error;
use crate::traits::Scalar;

/// Full SVD of an `m x n` matrix: `a = u * sigma * v^H`.
///
/// `u` is `m x m`, `v` is `n x n` (both with orthonormal columns), and
/// `sigma` is `m x n` with the singular values on its diagonal in descending
/// order, zero-padded when the input is not square. Vector sign/phase follows
/// the kernel and is not normalized.
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T: Scalar> {
    pub u: DenseMatrix<T>,
    pub sigma: DenseMatrix<T>,
    pub v: DenseMatrix<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Full singular value decomposition.
    pub fn singular_value_decomposition(&self) -> Result<SvdDecomposition<T>> {
        let (m, n) = self.shape();
        let backend = kernel::require_kernel()?;
        let factors = T::kernel_gesvd(backend.as_ref(), StorageOrder::RowMajor, m, n, self.as_slice())
            .map_err(map_kernel_error)?;
        let sigma = DenseMatrix::from_fn(m, n, |i, j| {
            if i == j && i < factors.s.len() {
                T::from_f64(factors.s[i])
            } else {
                T::zero()
            }
        });
        Ok(SvdDecomposition {
            u: DenseMatrix::from_vec(m, m, factors.u)?,
            sigma,
            v: DenseMatrix::from_vec(n, n, factors.v)?,
        })
    }

    /// The descending singular values alone.
    pub fn singular_values(&self) -> Result<Vec<f64>> {
        let (m, n) = self.shape();
        let backend = kernel::require_kernel()?;
        let factors = T::kernel_gesvd(backend.as_ref(), StorageOrder::RowMajor, m, n, self.as_slice())
            .map_err(map_kernel_error)?;
        Ok(factors.s)
    }
}
