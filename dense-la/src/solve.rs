//! Structure-aware matrix division.
//!
//! `divide(left, right)` computes `left * right^-1` by solving
//! `X * right = left`, which is the transposed system
//! `right^T * X^T = left^T`. The solution path is picked from `right`'s
//! cached structure, most specific first:
//!
//! 1. triangular  -> direct triangular solve, no factorization
//! 2. symmetric (Hermitian when complex) -> Cholesky, falling back to LU
//!    when the operand turns out not to be positive definite
//! 3. square, general -> LU
//! 4. non-square -> least-squares solve
//!
//! `SingularMatrix` is raised only when the selected factorization reports an
//! exactly zero pivot; near-singular systems propagate large or non-finite
//! values instead of failing, so dividing by a near-zero 1x1 matrix yields
//! infinities rather than an error.

use crate::error::{MatrixError, OperandSide, Result};
use crate::kernel::{self, KernelError, StorageOrder};
use crate::matrix::DenseMatrix;
use crate::traits::{MatrixRead, Scalar};

pub(crate) fn map_kernel_error(err: KernelError) -> MatrixError {
    match err {
        KernelError::Singular { info } => MatrixError::SingularMatrix { info },
        KernelError::NotPositiveDefinite { info } => MatrixError::ComputationFailed { info },
        KernelError::NoConvergence { info } => MatrixError::ComputationFailed { info },
        KernelError::Unsupported { .. } => MatrixError::PlatformUnsupported,
    }
}

fn transposed<T, M>(kernel: &dyn kernel::NativeKernel, operand: &M) -> Vec<T>
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    let (rows, cols) = operand.shape();
    let mut out = vec![T::zero(); rows * cols];
    T::kernel_transpose(
        kernel,
        StorageOrder::RowMajor,
        rows,
        cols,
        operand.as_slice(),
        &mut out,
    );
    out
}

/// Reassemble an `rows x cols` result from its transposed row-major buffer.
fn from_transposed<T: Scalar>(rows: usize, cols: usize, data_t: &[T]) -> DenseMatrix<T> {
    DenseMatrix::from_fn(rows, cols, |i, j| data_t[j * rows + i])
}

/// Matrix division `left * right^-1`.
///
/// Requires `left.cols() == right.cols()`; the result is
/// `left.rows() x right.rows()`. A non-square `right` is resolved in the
/// least-squares sense.
pub fn divide<T, L, R>(left: &L, right: &R) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    let (m, k) = left.shape();
    let (n, right_cols) = right.shape();
    if right_cols != k {
        return Err(MatrixError::DimensionMismatch {
            side: OperandSide::Right,
            operator: "divide",
        });
    }

    let backend = kernel::require_kernel()?;
    let right_t = transposed(backend.as_ref(), right); // k x n
    let left_t = transposed(backend.as_ref(), left); // k x m

    if n == k {
        let structure = right.structure();

        if structure.is_triangular() {
            // Transposition swaps the triangular halves.
            let upper = structure.is_lower_triangular();
            let mut rhs = left_t;
            T::kernel_trsm(
                backend.as_ref(),
                StorageOrder::RowMajor,
                upper,
                n,
                m,
                &right_t,
                &mut rhs,
            )
            .map_err(map_kernel_error)?;
            return Ok(from_transposed(m, n, &rhs));
        }

        let cholesky_candidate = if T::IS_COMPLEX {
            structure.hermitian
        } else {
            structure.symmetric
        };
        if cholesky_candidate {
            let mut rhs = left_t.clone();
            match T::kernel_posv(
                backend.as_ref(),
                StorageOrder::RowMajor,
                n,
                m,
                &right_t,
                &mut rhs,
            ) {
                Ok(()) => return Ok(from_transposed(m, n, &rhs)),
                // Not positive definite: fall through to the LU path.
                Err(KernelError::NotPositiveDefinite { .. }) => {}
                Err(other) => return Err(map_kernel_error(other)),
            }
        }

        let mut rhs = left_t;
        T::kernel_gesv(
            backend.as_ref(),
            StorageOrder::RowMajor,
            n,
            m,
            &right_t,
            &mut rhs,
        )
        .map_err(map_kernel_error)?;
        return Ok(from_transposed(m, n, &rhs));
    }

    // Non-square divisor: minimize ||X * right - left|| column by column of
    // the transposed system.
    let mut solution_t = vec![T::zero(); n * m];
    T::kernel_gels(
        backend.as_ref(),
        StorageOrder::RowMajor,
        k,
        n,
        m,
        &right_t,
        &left_t,
        &mut solution_t,
    )
    .map_err(map_kernel_error)?;
    Ok(from_transposed(m, n, &solution_t))
}
