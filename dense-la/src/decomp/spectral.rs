//! Spectral (eigen) decomposition.
//!
//! Symmetric/Hermitian inputs route to the real-eigenvalue solver: the
//! eigenvalue diagonal is in ascending order and the eigenvector matrix is
//! orthogonal (unitary for complex input), columns matching the eigenvalue
//! order. Everything else routes to the general solver, whose result is
//! complex even for real input; general-path eigenvalues keep the kernel's
//! (Schur) order.
//!
//! Eigenvector sign/phase is whatever the kernel produced; it is not
//! normalized here, because the choice is mathematically arbitrary.

use num_complex::Complex;

use crate::error::{MatrixError, OperandSide, Result};
use crate::kernel::{self, StorageOrder};
use crate::matrix::DenseMatrix;
use crate::solve::map_kernel_error;
use crate::traits::Scalar;

/// Eigenvalue diagonal plus eigenvector matrix, `a * vectors = vectors * values`.
#[derive(Debug, Clone)]
pub struct SpectralDecomposition<T: Scalar> {
    /// `n x n` matrix with the eigenvalues on its diagonal.
    pub values: DenseMatrix<T>,
    /// `n x n` matrix whose columns are the eigenvectors.
    pub vectors: DenseMatrix<T>,
}

/// Result of decomposing a real matrix: real for the symmetric path, complex
/// for the general path (a real matrix may have non-real eigenvalues).
#[derive(Debug, Clone)]
pub enum Spectrum {
    Real(SpectralDecomposition<f64>),
    Complex(SpectralDecomposition<Complex<f64>>),
}

fn diagonal_of_reals<T: Scalar>(values: &[f64]) -> DenseMatrix<T> {
    let n = values.len();
    DenseMatrix::from_fn(n, n, |i, j| {
        if i == j {
            T::from_f64(values[i])
        } else {
            T::zero()
        }
    })
}

fn diagonal_of_complex(values: &[Complex<f64>]) -> DenseMatrix<Complex<f64>> {
    let n = values.len();
    DenseMatrix::from_fn(n, n, |i, j| {
        if i == j {
            values[i]
        } else {
            Complex::new(0.0, 0.0)
        }
    })
}

fn require_square<T: Scalar>(matrix: &DenseMatrix<T>) -> Result<usize> {
    if matrix.rows() != matrix.cols() {
        return Err(MatrixError::DimensionMismatch {
            side: OperandSide::Left,
            operator: "spectral-decomposition",
        });
    }
    Ok(matrix.rows())
}

impl DenseMatrix<f64> {
    /// Spectral decomposition of a square real matrix.
    ///
    /// Consumers must accept either variant of [`Spectrum`]: a non-symmetric
    /// real input produces a complex result.
    pub fn spectral_decomposition(&self) -> Result<Spectrum> {
        let n = require_square(self)?;
        let backend = kernel::require_kernel()?;
        if self.is_symmetric() {
            let factors = backend
                .dsyev(StorageOrder::RowMajor, n, self.as_slice())
                .map_err(map_kernel_error)?;
            Ok(Spectrum::Real(SpectralDecomposition {
                values: diagonal_of_reals(&factors.values),
                vectors: DenseMatrix::from_vec(n, n, factors.vectors)?,
            }))
        } else {
            let factors = backend
                .dgeev(StorageOrder::RowMajor, n, self.as_slice())
                .map_err(map_kernel_error)?;
            Ok(Spectrum::Complex(SpectralDecomposition {
                values: diagonal_of_complex(&factors.values),
                vectors: DenseMatrix::from_vec(n, n, factors.vectors)?,
            }))
        }
    }
}

impl DenseMatrix<Complex<f64>> {
    /// Spectral decomposition of a square complex matrix.
    pub fn spectral_decomposition(&self) -> Result<SpectralDecomposition<Complex<f64>>> {
        let n = require_square(self)?;
        let backend = kernel::require_kernel()?;
        if self.structure().hermitian {
            let factors = backend
                .zheev(StorageOrder::RowMajor, n, self.as_slice())
                .map_err(map_kernel_error)?;
            Ok(SpectralDecomposition {
                values: diagonal_of_reals(&factors.values),
                vectors: DenseMatrix::from_vec(n, n, factors.vectors)?,
            })
        } else {
            let factors = backend
                .zgeev(StorageOrder::RowMajor, n, self.as_slice())
                .map_err(map_kernel_error)?;
            Ok(SpectralDecomposition {
                values: diagonal_of_complex(&factors.values),
                vectors: DenseMatrix::from_vec(n, n, factors.vectors)?,
            })
        }
    }
}
