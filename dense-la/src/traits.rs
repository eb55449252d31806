//! Core capability traits.
//!
//! [`Scalar`] unifies the two element types (`f64`, `Complex<f64>`) and routes
//! each kernel request to the matching `d`/`z` routine, so the operation layer
//! is written once and never branches on element type. [`MatrixRead`] is the
//! read-only matrix capability satisfied by both the owning matrix and the
//! borrowed view; arithmetic is implemented against it exactly once, which is
//! what makes the four ownership pairings of every operator share one code
//! path.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex;
use num_traits::{One, Zero};

use crate::kernel::{
    KernelError, NativeKernel, StorageOrder, SvdFactors, SymmetricEigenFactors,
};
use crate::structure::MatrixStructure;

/// Element type of a dense matrix: double-precision real or complex.
pub trait Scalar:
    Copy
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// True for the complex instantiation.
    const IS_COMPLEX: bool;

    /// Embed a real number.
    fn from_f64(value: f64) -> Self;

    /// Complex conjugate (identity for reals).
    fn conjugate(self) -> Self;

    /// Modulus (absolute value for reals).
    fn modulus(self) -> f64;

    /// True when any component is NaN.
    fn is_nan(self) -> bool;

    // Kernel routing: each method picks the `d` or `z` routine of the
    // backend for `Self`, keeping the callers element-type agnostic.

    fn kernel_gemm(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[Self],
        b: &[Self],
        c: &mut [Self],
    );

    fn kernel_transpose(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        rows: usize,
        cols: usize,
        a: &[Self],
        out: &mut [Self],
    );

    fn kernel_trsm(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError>;

    fn kernel_gesv(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError>;

    fn kernel_posv(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError>;

    fn kernel_gels(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &[Self],
        x: &mut [Self],
    ) -> Result<(), KernelError>;

    fn kernel_heev(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        a: &[Self],
    ) -> Result<SymmetricEigenFactors<Self>, KernelError>;

    fn kernel_gesvd(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[Self],
    ) -> Result<SvdFactors<Self>, KernelError>;
}

impl Scalar for f64 {
    const IS_COMPLEX: bool = false;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn conjugate(self) -> Self {
        self
    }

    fn modulus(self) -> f64 {
        self.abs()
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn kernel_gemm(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[Self],
        b: &[Self],
        c: &mut [Self],
    ) {
        kernel.dgemm(order, m, n, k, a, b, c);
    }

    fn kernel_transpose(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        rows: usize,
        cols: usize,
        a: &[Self],
        out: &mut [Self],
    ) {
        kernel.dtranspose(order, rows, cols, a, out);
    }

    fn kernel_trsm(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.dtrsm(order, upper, n, nrhs, a, b)
    }

    fn kernel_gesv(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.dgesv(order, n, nrhs, a, b)
    }

    fn kernel_posv(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.dposv(order, n, nrhs, a, b)
    }

    fn kernel_gels(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &[Self],
        x: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.dgels(order, m, n, nrhs, a, b, x)
    }

    fn kernel_heev(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        a: &[Self],
    ) -> Result<SymmetricEigenFactors<Self>, KernelError> {
        kernel.dsyev(order, n, a)
    }

    fn kernel_gesvd(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[Self],
    ) -> Result<SvdFactors<Self>, KernelError> {
        kernel.dgesvd(order, m, n, a)
    }
}

impl Scalar for Complex<f64> {
    const IS_COMPLEX: bool = true;

    fn from_f64(value: f64) -> Self {
        Complex::new(value, 0.0)
    }

    fn conjugate(self) -> Self {
        self.conj()
    }

    fn modulus(self) -> f64 {
        self.norm()
    }

    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    fn kernel_gemm(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        k: usize,
        a: &[Self],
        b: &[Self],
        c: &mut [Self],
    ) {
        kernel.zgemm(order, m, n, k, a, b, c);
    }

    fn kernel_transpose(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        rows: usize,
        cols: usize,
        a: &[Self],
        out: &mut [Self],
    ) {
        kernel.ztranspose(order, rows, cols, a, out);
    }

    fn kernel_trsm(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        upper: bool,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.ztrsm(order, upper, n, nrhs, a, b)
    }

    fn kernel_gesv(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.zgesv(order, n, nrhs, a, b)
    }

    fn kernel_posv(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.zposv(order, n, nrhs, a, b)
    }

    fn kernel_gels(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &[Self],
        b: &[Self],
        x: &mut [Self],
    ) -> Result<(), KernelError> {
        kernel.zgels(order, m, n, nrhs, a, b, x)
    }

    fn kernel_heev(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        n: usize,
        a: &[Self],
    ) -> Result<SymmetricEigenFactors<Self>, KernelError> {
        kernel.zheev(order, n, a)
    }

    fn kernel_gesvd(
        kernel: &dyn NativeKernel,
        order: StorageOrder,
        m: usize,
        n: usize,
        a: &[Self],
    ) -> Result<SvdFactors<Self>, KernelError> {
        kernel.zgesvd(order, m, n, a)
    }
}

/// Read-only matrix capability.
///
/// Both [`crate::DenseMatrix`] and [`crate::MatrixView`] satisfy this, and
/// every arithmetic kernel is written once against it; which concrete operand
/// kinds meet at an operator therefore cannot change numeric results or error
/// behavior.
pub trait MatrixRead<T: Scalar> {
    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    /// The flat row-major element buffer.
    fn as_slice(&self) -> &[T];

    /// Structural predicates of the matrix (cached by the owner).
    fn structure(&self) -> MatrixStructure;

    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `(row, col)` without bounds checking beyond the slice's own.
    fn at(&self, row: usize, col: usize) -> T {
        self.as_slice()[row * self.cols() + col]
    }
}
