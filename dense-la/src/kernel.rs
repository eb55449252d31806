//! Native linear-algebra kernel capability with pluggable backends.
//!
//! This module is the only place that touches a concrete linear-algebra
//! implementation. Everything above it talks to the [`NativeKernel`] trait,
//! which exposes BLAS/LAPACK-shaped primitives over flat buffers with an
//! explicit storage order.
//!
//! # Design
//! - **Default**: a pure-Rust backend built on nalgebra
//! - **Optional**: any `NativeKernel` implementation injected at runtime
//! - **Thread-safe**: global dispatcher protected by RwLock
//!
//! # Storage-order conversion
//! The matrix core stores row-major buffers. A backend that works in
//! column-major terms interprets a row-major `m x n` buffer as the transposed
//! `n x m` matrix; the leading dimension is therefore always the row-major
//! column count. Backends receive the order flag and perform whatever
//! conversion their underlying routines require; callers never pre-transpose.

use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use nalgebra::linalg::Schur;
use nalgebra::{ComplexField, DMatrix, DVector};
use num_complex::Complex;
use num_traits::One;
use once_cell::sync::Lazy;

/// Memory layout of a flat matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOrder {
    RowMajor,
    ColumnMajor,
}

/// Failures reported by a kernel routine, with the backend's info code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The factorization hit an exactly zero pivot.
    Singular { info: i32 },
    /// Cholesky factorization failed: the matrix is not positive definite.
    NotPositiveDefinite { info: i32 },
    /// An iterative routine did not converge.
    NoConvergence { info: i32 },
    /// The backend does not implement the requested routine.
    Unsupported { routine: &'static str },
}

/// Full singular value decomposition buffers: `u` is `m x m`, `v` is `n x n`
/// (both in the storage order of the call), `s` holds `min(m, n)` singular
/// values in descending order, and `a = u * diag(s) * v^H`.
#[derive(Debug, Clone)]
pub struct SvdFactors<T> {
    pub u: Vec<T>,
    pub s: Vec<f64>,
    pub v: Vec<T>,
}

/// Symmetric/Hermitian eigen buffers: real eigenvalues in ascending order and
/// the `n x n` matrix whose columns are the matching orthonormal eigenvectors.
#[derive(Debug, Clone)]
pub struct SymmetricEigenFactors<T> {
    pub values: Vec<f64>,
    pub vectors: Vec<T>,
}

/// General eigen buffers; values and vectors are complex even for real input.
#[derive(Debug, Clone)]
pub struct GeneralEigenFactors {
    pub values: Vec<Complex<f64>>,
    pub vectors: Vec<Complex<f64>>,
}

/// Native kernel capability consumed by the matrix operation layer.
///
/// Routine names follow the BLAS/LAPACK convention: `d` prefixes operate on
/// `f64` buffers, `z` prefixes on `Complex<f64>` buffers. All buffers are
/// dense and tightly packed in the given [`StorageOrder`].
pub trait NativeKernel: Send + Sync {
    /// Returns backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Returns false when the backing implementation cannot run on this host.
    fn is_available(&self) -> bool {
        true
    }

    /// C = A * B, with A `m x k`, B `k x n`, C `m x n`.
    fn dgemm(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[f64],
        b: &[f64],
        c: &mut [f64],
    );

    /// C = A * B for complex buffers.
    fn zgemm(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[Complex<f64>],
        b: &[Complex<f64>],
        c: &mut [Complex<f64>],
    );

    /// Transpose-copy a `rows x cols` buffer into `out` (`cols x rows`),
    /// keeping the storage order. Used to reformat operands ahead of routines
    /// that want the transposed system.
    fn dtranspose(
        &self,
        order: StorageOrder,
        rows: usize,
        cols: usize,
        a: &[f64],
        out: &mut [f64],
    ) {
        transpose_buffer(order, rows, cols, a, out);
    }

    /// Complex transpose-copy (no conjugation).
    fn ztranspose(
        &self,
        order: StorageOrder,
        rows: usize,
        cols: usize,
        a: &[Complex<f64>],
        out: &mut [Complex<f64>],
    ) {
        transpose_buffer(order, rows, cols, a, out);
    }

    /// Solve the triangular system A * X = B in place over `b`.
    ///
    /// A is `n x n` and triangular (`upper` selects the half that carries the
    /// data); `b` holds the `n x nrhs` right-hand side on entry and the
    /// solution on exit.
    fn dtrsm(
        &self,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &mut [f64],
    ) -> Result<(), KernelError>;

    /// Complex triangular solve, in place over `b`.
    fn ztrsm(
        &self,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &mut [Complex<f64>],
    ) -> Result<(), KernelError>;

    /// Solve A * X = B through LU factorization, in place over `b`.
    fn dgesv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &mut [f64],
    ) -> Result<(), KernelError>;

    /// Complex LU solve, in place over `b`.
    fn zgesv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &mut [Complex<f64>],
    ) -> Result<(), KernelError>;

    /// Solve A * X = B through Cholesky factorization, in place over `b`.
    ///
    /// Fails with [`KernelError::NotPositiveDefinite`] when A has no Cholesky
    /// factor; callers use that signal to fall back to LU.
    fn dposv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &mut [f64],
    ) -> Result<(), KernelError>;

    /// Hermitian positive-definite solve, in place over `b`.
    fn zposv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &mut [Complex<f64>],
    ) -> Result<(), KernelError>;

    /// Least-squares solve: minimize ||A * X - B|| with A `m x n`,
    /// B `m x nrhs`, writing the `n x nrhs` solution to `x`.
    fn dgels(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &[f64],
        x: &mut [f64],
    ) -> Result<(), KernelError>;

    /// Complex least-squares solve.
    fn zgels(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &[Complex<f64>],
        x: &mut [Complex<f64>],
    ) -> Result<(), KernelError>;

    /// Symmetric eigen-decomposition of an `n x n` real matrix.
    fn dsyev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[f64],
    ) -> Result<SymmetricEigenFactors<f64>, KernelError>;

    /// Hermitian eigen-decomposition of an `n x n` complex matrix.
    fn zheev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[Complex<f64>],
    ) -> Result<SymmetricEigenFactors<Complex<f64>>, KernelError>;

    /// General eigen-decomposition of an `n x n` real matrix; the result is
    /// complex because real matrices may have conjugate eigenvalue pairs.
    fn dgeev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[f64],
    ) -> Result<GeneralEigenFactors, KernelError>;

    /// General eigen-decomposition of an `n x n` complex matrix.
    fn zgeev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[Complex<f64>],
    ) -> Result<GeneralEigenFactors, KernelError>;

    /// Full singular value decomposition of an `m x n` real matrix.
    fn dgesvd(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[f64],
    ) -> Result<SvdFactors<f64>, KernelError>;

    /// Full singular value decomposition of an `m x n` complex matrix.
    fn zgesvd(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[Complex<f64>],
    ) -> Result<SvdFactors<Complex<f64>>, KernelError>;
}

/// Out-of-place transpose of a flat buffer, preserving its storage order.
fn transpose_buffer<T: Copy>(
    order: StorageOrder,
    rows: usize,
    cols: usize,
    a: &[T],
    out: &mut [T],
) {
    debug_assert_eq!(a.len(), rows * cols);
    debug_assert_eq!(out.len(), rows * cols);
    match order {
        StorageOrder::RowMajor => {
            for i in 0..rows {
                for j in 0..cols {
                    out[j * rows + i] = a[i * cols + j];
                }
            }
        }
        StorageOrder::ColumnMajor => {
            for i in 0..rows {
                for j in 0..cols {
                    out[j + i * cols] = a[i + j * rows];
                }
            }
        }
    }
}

//==============================================================================
// Buffer <-> DMatrix conversion
//==============================================================================

fn load<T: nalgebra::Scalar + Copy>(
    order: StorageOrder,
    rows: usize,
    cols: usize,
    data: &[T],
) -> DMatrix<T> {
    match order {
        StorageOrder::RowMajor => DMatrix::from_row_slice(rows, cols, data),
        StorageOrder::ColumnMajor => DMatrix::from_column_slice(rows, cols, data),
    }
}

fn store<T: nalgebra::Scalar + Copy>(order: StorageOrder, m: &DMatrix<T>, out: &mut [T]) {
    let (rows, cols) = m.shape();
    debug_assert_eq!(out.len(), rows * cols);
    match order {
        StorageOrder::RowMajor => {
            for i in 0..rows {
                for j in 0..cols {
                    out[i * cols + j] = m[(i, j)];
                }
            }
        }
        StorageOrder::ColumnMajor => {
            for j in 0..cols {
                for i in 0..rows {
                    out[j * rows + i] = m[(i, j)];
                }
            }
        }
    }
}

fn store_owned<T: nalgebra::Scalar + Copy + num_traits::Zero>(
    order: StorageOrder,
    m: &DMatrix<T>,
) -> Vec<T> {
    let mut out = vec![T::zero(); m.nrows() * m.ncols()];
    store(order, m, &mut out);
    out
}

//==============================================================================
// Default backend (pure Rust, nalgebra)
//==============================================================================

/// Default kernel backend built on nalgebra.
pub struct NalgebraKernel;

fn gemm_impl<T: ComplexField + Copy>(
    order: StorageOrder,
    m: usize,
    n: usize,
    k: usize,
    a: &[T],
    b: &[T],
    c: &mut [T],
) {
    let am = load(order, m, k, a);
    let bm = load(order, k, n, b);
    let cm = &am * &bm;
    store(order, &cm, c);
}

fn trsm_impl<T: ComplexField + Copy>(
    order: StorageOrder,
    upper: bool,
    n: usize,
    nrhs: usize,
    a: &[T],
    b: &mut [T],
) -> Result<(), KernelError> {
    let am = load(order, n, n, a);
    let bm = load(order, n, nrhs, b);
    let solved = if upper {
        am.solve_upper_triangular(&bm)
    } else {
        am.solve_lower_triangular(&bm)
    };
    match solved {
        Some(x) => {
            store(order, &x, b);
            Ok(())
        }
        None => Err(KernelError::Singular { info: 0 }),
    }
}

fn gesv_impl<T: ComplexField + Copy>(
    order: StorageOrder,
    n: usize,
    nrhs: usize,
    a: &[T],
    b: &mut [T],
) -> Result<(), KernelError> {
    let am = load(order, n, n, a);
    let bm = load(order, n, nrhs, b);
    match am.lu().solve(&bm) {
        Some(x) => {
            store(order, &x, b);
            Ok(())
        }
        None => Err(KernelError::Singular { info: 0 }),
    }
}

fn posv_impl<T: ComplexField + Copy>(
    order: StorageOrder,
    n: usize,
    nrhs: usize,
    a: &[T],
    b: &mut [T],
) -> Result<(), KernelError> {
    let am = load(order, n, n, a);
    let bm = load(order, n, nrhs, b);
    match am.cholesky() {
        Some(factor) => {
            let x = factor.solve(&bm);
            store(order, &x, b);
            Ok(())
        }
        None => Err(KernelError::NotPositiveDefinite { info: 0 }),
    }
}

fn gels_impl<T: ComplexField<RealField = f64> + Copy>(
    order: StorageOrder,
    m: usize,
    n: usize,
    nrhs: usize,
    a: &[T],
    b: &[T],
    x: &mut [T],
) -> Result<(), KernelError> {
    let am = load(order, m, n, a);
    let bm = load(order, m, nrhs, b);
    let svd = am.svd(true, true);
    let tol = if svd.singular_values.is_empty() {
        0.0
    } else {
        f64::EPSILON * svd.singular_values.max() * m.max(n) as f64
    };
    let solution = svd
        .solve(&bm, tol)
        .map_err(|_| KernelError::NoConvergence { info: 0 })?;
    store(order, &solution, x);
    Ok(())
}

fn sym_eig_impl<T: ComplexField<RealField = f64> + Copy>(
    order: StorageOrder,
    n: usize,
    a: &[T],
) -> Result<SymmetricEigenFactors<T>, KernelError> {
    let am = load(order, n, n, a);
    let eig = am.symmetric_eigen();
    // nalgebra does not order the spectrum; ascend it together with the
    // eigenvector columns.
    let mut perm: Vec<usize> = (0..n).collect();
    perm.sort_by(|&i, &j| {
        eig.eigenvalues[i]
            .partial_cmp(&eig.eigenvalues[j])
            .unwrap_or(Ordering::Equal)
    });
    let values: Vec<f64> = perm.iter().map(|&i| eig.eigenvalues[i]).collect();
    let vectors = DMatrix::<T>::from_fn(n, n, |i, j| eig.eigenvectors[(i, perm[j])]);
    Ok(SymmetricEigenFactors {
        values,
        vectors: store_owned(order, &vectors),
    })
}

fn general_eig_impl(
    order: StorageOrder,
    n: usize,
    a: &[Complex<f64>],
) -> Result<GeneralEigenFactors, KernelError> {
    let am = load(order, n, n, a);
    let schur = Schur::try_new(am, f64::EPSILON, 0)
        .ok_or(KernelError::NoConvergence { info: 0 })?;
    let (q, t) = schur.unpack();

    let values: Vec<Complex<f64>> = (0..n).map(|i| t[(i, i)]).collect();
    let mut vectors = DMatrix::<Complex<f64>>::zeros(n, n);
    for i in 0..n {
        // Back-substitute (T - lambda I) y = 0 on the upper-triangular Schur
        // factor, with y[i] fixed to 1; tiny pivots are perturbed the way
        // LAPACK's trevc does so clustered eigenvalues stay solvable.
        let lambda = values[i];
        let mut y = DVector::<Complex<f64>>::zeros(n);
        y[i] = Complex::one();
        for j in (0..i).rev() {
            let mut acc = Complex::new(0.0, 0.0);
            for k in (j + 1)..=i {
                acc += t[(j, k)] * y[k];
            }
            let mut denom = t[(j, j)] - lambda;
            let floor = f64::EPSILON * (1.0 + lambda.norm());
            if denom.norm() < floor {
                denom = Complex::new(floor, 0.0);
            }
            y[j] = -acc / denom;
        }
        let mut x = &q * &y;
        let norm = x.norm();
        if norm > 0.0 {
            x.unscale_mut(norm);
        }
        vectors.set_column(i, &x);
    }

    Ok(GeneralEigenFactors {
        values,
        vectors: store_owned(order, &vectors),
    })
}

/// Extend a `dim x r` matrix with orthonormal columns to a full `dim x dim`
/// orthonormal basis via Gram-Schmidt against the unit vectors.
fn complete_basis<T: ComplexField<RealField = f64> + Copy>(
    thin: &DMatrix<T>,
    dim: usize,
) -> DMatrix<T> {
    let mut full = DMatrix::<T>::zeros(dim, dim);
    let mut count = 0;
    for j in 0..thin.ncols().min(dim) {
        full.set_column(count, &thin.column(j));
        count += 1;
    }
    let mut candidate = 0;
    while count < dim && candidate < dim {
        let mut v = DVector::<T>::zeros(dim);
        v[candidate] = T::one();
        // Two Gram-Schmidt sweeps keep the completion orthonormal even when a
        // candidate nearly lies in the current span.
        for _ in 0..2 {
            for j in 0..count {
                let coeff = full.column(j).dotc(&v);
                v -= full.column(j) * coeff;
            }
        }
        let norm = v.norm();
        if norm > 1.0e-8 {
            v.unscale_mut(norm);
            full.set_column(count, &v);
            count += 1;
        }
        candidate += 1;
    }
    full
}

fn svd_impl<T: ComplexField<RealField = f64> + Copy>(
    order: StorageOrder,
    m: usize,
    n: usize,
    a: &[T],
) -> Result<SvdFactors<T>, KernelError> {
    let am = load(order, m, n, a);
    let svd = am.svd(true, true);
    let u_thin = svd.u.ok_or(KernelError::Unsupported { routine: "gesvd" })?;
    let v_t = svd.v_t.ok_or(KernelError::Unsupported { routine: "gesvd" })?;
    let r = svd.singular_values.len();

    // Descending order, with the vector columns permuted in step.
    let mut perm: Vec<usize> = (0..r).collect();
    perm.sort_by(|&i, &j| {
        svd.singular_values[j]
            .partial_cmp(&svd.singular_values[i])
            .unwrap_or(Ordering::Equal)
    });
    let s: Vec<f64> = perm.iter().map(|&i| svd.singular_values[i]).collect();
    let u_sorted = DMatrix::<T>::from_fn(m, r, |i, j| u_thin[(i, perm[j])]);
    // nalgebra hands back V^H; columns of V are its conjugated rows.
    let v_sorted = DMatrix::<T>::from_fn(n, r, |i, j| v_t[(perm[j], i)].conjugate());

    let u_full = complete_basis(&u_sorted, m);
    let v_full = complete_basis(&v_sorted, n);
    Ok(SvdFactors {
        u: store_owned(order, &u_full),
        s,
        v: store_owned(order, &v_full),
    })
}

impl NativeKernel for NalgebraKernel {
    fn name(&self) -> &'static str {
        "nalgebra (pure Rust)"
    }

    fn dgemm(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[f64],
        b: &[f64],
        c: &mut [f64],
    ) {
        gemm_impl(order, m, n, k, a, b, c);
    }

    fn zgemm(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[Complex<f64>],
        b: &[Complex<f64>],
        c: &mut [Complex<f64>],
    ) {
        gemm_impl(order, m, n, k, a, b, c);
    }

    fn dtrsm(
        &self,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &mut [f64],
    ) -> Result<(), KernelError> {
        trsm_impl(order, upper, n, nrhs, a, b)
    }

    fn ztrsm(
        &self,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &mut [Complex<f64>],
    ) -> Result<(), KernelError> {
        trsm_impl(order, upper, n, nrhs, a, b)
    }

    fn dgesv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &mut [f64],
    ) -> Result<(), KernelError> {
        gesv_impl(order, n, nrhs, a, b)
    }

    fn zgesv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &mut [Complex<f64>],
    ) -> Result<(), KernelError> {
        gesv_impl(order, n, nrhs, a, b)
    }

    fn dposv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &mut [f64],
    ) -> Result<(), KernelError> {
        posv_impl(order, n, nrhs, a, b)
    }

    fn zposv(
        &self,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &mut [Complex<f64>],
    ) -> Result<(), KernelError> {
        posv_impl(order, n, nrhs, a, b)
    }

    fn dgels(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[f64],
        b: &[f64],
        x: &mut [f64],
    ) -> Result<(), KernelError> {
        gels_impl(order, m, n, nrhs, a, b, x)
    }

    fn zgels(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[Complex<f64>],
        b: &[Complex<f64>],
        x: &mut [Complex<f64>],
    ) -> Result<(), KernelError> {
        gels_impl(order, m, n, nrhs, a, b, x)
    }

    fn dsyev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[f64],
    ) -> Result<SymmetricEigenFactors<f64>, KernelError> {
        sym_eig_impl(order, n, a)
    }

    fn zheev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[Complex<f64>],
    ) -> Result<SymmetricEigenFactors<Complex<f64>>, KernelError> {
        sym_eig_impl(order, n, a)
    }

    fn dgeev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[f64],
    ) -> Result<GeneralEigenFactors, KernelError> {
        let promoted: Vec<Complex<f64>> = a.iter().map(|&x| Complex::new(x, 0.0)).collect();
        general_eig_impl(order, n, &promoted)
    }

    fn zgeev(
        &self,
        order: StorageOrder,
        n: usize,
        a: &[Complex<f64>],
    ) -> Result<GeneralEigenFactors, KernelError> {
        general_eig_impl(order, n, a)
    }

    fn dgesvd(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[f64],
    ) -> Result<SvdFactors<f64>, KernelError> {
        svd_impl(order, m, n, a)
    }

    fn zgesvd(
        &self,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[Complex<f64>],
    ) -> Result<SvdFactors<Complex<f64>>, KernelError> {
        svd_impl(order, m, n, a)
    }
}

//==============================================================================
// Kernel handle and global dispatcher
//==============================================================================

/// Shareable handle to a kernel backend.
#[derive(Clone)]
pub struct KernelHandle {
    inner: Arc<dyn NativeKernel>,
}

impl KernelHandle {
    /// Wrap a backend in a handle.
    pub fn new(backend: Arc<dyn NativeKernel>) -> Self {
        Self { inner: backend }
    }

    pub(crate) fn as_ref(&self) -> &dyn NativeKernel {
        self.inner.as_ref()
    }
}

impl Default for KernelHandle {
    fn default() -> Self {
        Self {
            inner: Arc::new(NalgebraKernel),
        }
    }
}

/// Global kernel dispatcher (thread-safe). Operations resolve their backend
/// here unless handed an explicit [`KernelHandle`].
static KERNEL_DISPATCHER: Lazy<RwLock<Arc<dyn NativeKernel>>> =
    Lazy::new(|| RwLock::new(Arc::new(NalgebraKernel)));

/// Install a kernel backend process-wide.
pub fn set_kernel(backend: Arc<dyn NativeKernel>) {
    let mut dispatcher = KERNEL_DISPATCHER.write().unwrap();
    *dispatcher = backend;
}

/// Reset the dispatcher to the default nalgebra backend.
pub fn reset_kernel() {
    let mut dispatcher = KERNEL_DISPATCHER.write().unwrap();
    *dispatcher = Arc::new(NalgebraKernel);
}

/// Name and availability of the installed backend.
pub fn kernel_info() -> (&'static str, bool) {
    let dispatcher = KERNEL_DISPATCHER.read().unwrap();
    (dispatcher.name(), dispatcher.is_available())
}

/// Current backend, for internal callers.
pub(crate) fn current_kernel() -> Arc<dyn NativeKernel> {
    KERNEL_DISPATCHER.read().unwrap().clone()
}

/// Current backend, failing with [`MatrixError::PlatformUnsupported`] when the
/// installed backend reports itself unavailable on this host.
pub(crate) fn require_kernel() -> crate::error::Result<Arc<dyn NativeKernel>> {
    let kernel = current_kernel();
    if kernel.is_available() {
        Ok(kernel)
    } else {
        Err(crate::error::MatrixError::PlatformUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backend_is_nalgebra() {
        reset_kernel();
        let (name, available) = kernel_info();
        assert_eq!(name, "nalgebra (pure Rust)");
        assert!(available);
    }

    #[test]
    fn dgemm_row_major() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3
        let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0]; // 3x2
        let mut c = [0.0; 4];
        NalgebraKernel.dgemm(StorageOrder::RowMajor, 2, 2, 3, &a, &b, &mut c);
        assert_eq!(c, [58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn dgemm_column_major_matches_row_major() {
        // Same product expressed column-major.
        let a = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]; // 2x3 col-major
        let b = [7.0, 9.0, 11.0, 8.0, 10.0, 12.0]; // 3x2 col-major
        let mut c = [0.0; 4];
        NalgebraKernel.dgemm(StorageOrder::ColumnMajor, 2, 2, 3, &a, &b, &mut c);
        assert_eq!(c, [58.0, 139.0, 64.0, 154.0]);
    }

    #[test]
    fn dtranspose_reformats_both_orders() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3 row-major
        let mut t = [0.0; 6];
        NalgebraKernel.dtranspose(StorageOrder::RowMajor, 2, 3, &a, &mut t);
        assert_eq!(t, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let mut back = [0.0; 6];
        NalgebraKernel.dtranspose(StorageOrder::ColumnMajor, 2, 3, &t, &mut back);
        // Transposing the row-major transpose read as column-major data
        // lands back on the original flat layout.
        assert_eq!(back, a);
    }

    #[test]
    fn dtrsm_upper_back_substitutes() {
        let a = [2.0, 1.0, 0.0, 4.0]; // [[2,1],[0,4]]
        let mut b = [5.0, 8.0]; // rhs column [5, 8]
        NalgebraKernel
            .dtrsm(StorageOrder::RowMajor, true, 2, 1, &a, &mut b)
            .unwrap();
        assert!((b[1] - 2.0).abs() < 1e-12);
        assert!((b[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn dtrsm_zero_pivot_is_singular() {
        let a = [0.0, 1.0, 0.0, 4.0];
        let mut b = [5.0, 8.0];
        let err = NalgebraKernel
            .dtrsm(StorageOrder::RowMajor, true, 2, 1, &a, &mut b)
            .unwrap_err();
        assert!(matches!(err, KernelError::Singular { .. }));
    }

    #[test]
    fn dposv_rejects_indefinite_input() {
        let a = [1.0, 2.0, 2.0, 1.0]; // symmetric, eigenvalues {3, -1}
        let mut b = [1.0, 1.0];
        let err = NalgebraKernel
            .dposv(StorageOrder::RowMajor, 2, 1, &a, &mut b)
            .unwrap_err();
        assert!(matches!(err, KernelError::NotPositiveDefinite { .. }));
    }

    #[test]
    fn dsyev_orders_ascending() {
        let a = [2.0, 1.0, 1.0, 2.0];
        let eig = NalgebraKernel.dsyev(StorageOrder::RowMajor, 2, &a).unwrap();
        assert!((eig.values[0] - 1.0).abs() < 1e-12);
        assert!((eig.values[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn dgeev_recovers_complex_pair() {
        // Rotation-like matrix with eigenvalues +/- i.
        let a = [0.0, -1.0, 1.0, 0.0];
        let eig = NalgebraKernel.dgeev(StorageOrder::RowMajor, 2, &a).unwrap();
        let mut imags: Vec<f64> = eig.values.iter().map(|v| v.im).collect();
        imags.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert!((imags[0] + 1.0).abs() < 1e-10);
        assert!((imags[1] - 1.0).abs() < 1e-10);
        for v in &eig.values {
            assert!(v.re.abs() < 1e-10);
        }
    }

    #[test]
    fn dgesvd_returns_square_factors() {
        let a = [1.0, 0.0, 0.0, 2.0, 0.0, 0.0]; // 3x2, rows [1,0], [0,2], [0,0]
        let svd = NalgebraKernel
            .dgesvd(StorageOrder::RowMajor, 3, 2, &a)
            .unwrap();
        assert_eq!(svd.u.len(), 9);
        assert_eq!(svd.v.len(), 4);
        assert_eq!(svd.s.len(), 2);
        assert!(svd.s[0] >= svd.s[1]);
        assert!((svd.s[0] - 2.0).abs() < 1e-12);
        assert!((svd.s[1] - 1.0).abs() < 1e-12);
    }
}
