//! Element-wise arithmetic, scalar broadcasts and matrix multiplication.
//!
//! Every routine is written once against [`MatrixRead`], so owning matrices
//! and read-only views flow through identical code with identical results and
//! identical failures. Dimension contracts are enforced here, before any
//! kernel is touched.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{MatrixError, OperandSide, Result};
use crate::kernel::{self, StorageOrder};
use crate::matrix::DenseMatrix;
use crate::solve;
use crate::traits::{MatrixRead, Scalar};

fn require_same_shape<T, L, R>(left: &L, right: &R, operator: &'static str) -> Result<()>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    if left.rows() != right.rows() || left.cols() != right.cols() {
        return Err(MatrixError::DimensionMismatch {
            side: OperandSide::Right,
            operator,
        });
    }
    Ok(())
}

fn elementwise<T, L, R>(
    left: &L,
    right: &R,
    operator: &'static str,
    f: impl Fn(T, T) -> T,
) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    require_same_shape(left, right, operator)?;
    let data = left
        .as_slice()
        .iter()
        .zip(right.as_slice())
        .map(|(&a, &b)| f(a, b))
        .collect();
    Ok(DenseMatrix::from_parts(left.rows(), left.cols(), data))
}

/// Element-wise sum. Requires identical shapes.
pub fn add<T, L, R>(left: &L, right: &R) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    elementwise(left, right, "add", |a, b| a + b)
}

/// Element-wise difference. Requires identical shapes.
pub fn subtract<T, L, R>(left: &L, right: &R) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    elementwise(left, right, "subtract", |a, b| a - b)
}

/// Element-wise (Hadamard) product. Requires identical shapes.
pub fn multiply_elementwise<T, L, R>(left: &L, right: &R) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    elementwise(left, right, "elementwise-multiply", |a, b| a * b)
}

/// Element-wise quotient. Requires identical shapes.
pub fn divide_elementwise<T, L, R>(left: &L, right: &R) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    elementwise(left, right, "elementwise-divide", |a, b| a / b)
}

/// Sign-flip every entry into a new matrix.
pub fn negate<T, M>(operand: &M) -> DenseMatrix<T>
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    let data = operand.as_slice().iter().map(|&a| -a).collect();
    DenseMatrix::from_parts(operand.rows(), operand.cols(), data)
}

/// Broadcast `f(entry, scalar)` over every entry. Never fails on dimension.
pub fn scalar_broadcast<T, M>(operand: &M, scalar: T, f: impl Fn(T, T) -> T) -> DenseMatrix<T>
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    let data = operand.as_slice().iter().map(|&a| f(a, scalar)).collect();
    DenseMatrix::from_parts(operand.rows(), operand.cols(), data)
}

/// Matrix product. Requires `left.cols() == right.rows()`.
pub fn multiply<T, L, R>(left: &L, right: &R) -> Result<DenseMatrix<T>>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    let (m, k) = left.shape();
    if right.rows() != k {
        return Err(MatrixError::DimensionMismatch {
            side: OperandSide::Right,
            operator: "multiply",
        });
    }
    let n = right.cols();
    let mut product = vec![T::zero(); m * n];
    let backend = kernel::require_kernel()?;
    T::kernel_gemm(
        backend.as_ref(),
        StorageOrder::RowMajor,
        m,
        n,
        k,
        left.as_slice(),
        right.as_slice(),
        &mut product,
    );
    Ok(DenseMatrix::from_parts(m, n, product))
}

/// Matrix product into a preallocated result, avoiding the allocation.
pub fn multiply_into<T, L, R>(left: &L, right: &R, out: &mut DenseMatrix<T>) -> Result<()>
where
    T: Scalar,
    L: MatrixRead<T> + ?Sized,
    R: MatrixRead<T> + ?Sized,
{
    let (m, k) = left.shape();
    if right.rows() != k {
        return Err(MatrixError::DimensionMismatch {
            side: OperandSide::Right,
            operator: "multiply",
        });
    }
    let n = right.cols();
    if out.shape() != (m, n) {
        return Err(MatrixError::DimensionMismatch {
            side: OperandSide::Left,
            operator: "multiply-into",
        });
    }
    let backend = kernel::require_kernel()?;
    T::kernel_gemm(
        backend.as_ref(),
        StorageOrder::RowMajor,
        m,
        n,
        k,
        left.as_slice(),
        right.as_slice(),
        out.as_mut_slice(),
    );
    Ok(())
}

//==============================================================================
// In-place variants
//==============================================================================

impl<T: Scalar> DenseMatrix<T> {
    /// `self += rhs`, element-wise.
    pub fn add_assign_matrix(&mut self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<()> {
        require_same_shape(self, rhs, "add")?;
        let src = rhs.as_slice().to_vec();
        for (dst, s) in self.as_mut_slice().iter_mut().zip(src) {
            *dst = *dst + s;
        }
        Ok(())
    }

    /// `self -= rhs`, element-wise.
    pub fn sub_assign_matrix(&mut self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<()> {
        require_same_shape(self, rhs, "subtract")?;
        let src = rhs.as_slice().to_vec();
        for (dst, s) in self.as_mut_slice().iter_mut().zip(src) {
            *dst = *dst - s;
        }
        Ok(())
    }

    /// `self *= rhs`, element-wise.
    pub fn mul_assign_elementwise(&mut self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<()> {
        require_same_shape(self, rhs, "elementwise-multiply")?;
        let src = rhs.as_slice().to_vec();
        for (dst, s) in self.as_mut_slice().iter_mut().zip(src) {
            *dst = *dst * s;
        }
        Ok(())
    }

    /// Add a scalar to every entry in place.
    pub fn add_scalar_assign(&mut self, scalar: T) {
        for dst in self.as_mut_slice() {
            *dst = *dst + scalar;
        }
    }

    /// Multiply every entry by a scalar in place.
    pub fn scale(&mut self, scalar: T) {
        for dst in self.as_mut_slice() {
            *dst = *dst * scalar;
        }
    }

    /// Flip the sign of every entry in place.
    pub fn negate_in_place(&mut self) {
        for dst in self.as_mut_slice() {
            *dst = -*dst;
        }
    }

    /// Allocating element-wise sum.
    pub fn add_matrix(&self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<DenseMatrix<T>> {
        add(self, rhs)
    }

    /// Allocating element-wise difference.
    pub fn sub_matrix(&self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<DenseMatrix<T>> {
        subtract(self, rhs)
    }

    /// Allocating element-wise product.
    pub fn mul_elementwise(&self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<DenseMatrix<T>> {
        multiply_elementwise(self, rhs)
    }

    /// Allocating matrix product.
    pub fn matmul(&self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<DenseMatrix<T>> {
        multiply(self, rhs)
    }

    /// Allocating negation.
    pub fn negated(&self) -> DenseMatrix<T> {
        negate(self)
    }

    /// Matrix division: `self * rhs^-1` (see [`crate::solve::divide`]).
    pub fn div_matrix(&self, rhs: &(impl MatrixRead<T> + ?Sized)) -> Result<DenseMatrix<T>> {
        solve::divide(self, rhs)
    }
}

//==============================================================================
// Operator sugar
//==============================================================================

// The operators defer to the checked routines above and abort with the
// diagnostic text on contract violations, matching the panicking-operator
// convention of the surrounding ecosystem. Fallible call sites use the named
// methods instead.

fn expect_op<V>(result: Result<V>) -> V {
    result.unwrap_or_else(|e| panic!("{e}"))
}

impl<'a, 'b, T: Scalar> Add<&'b DenseMatrix<T>> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn add(self, rhs: &'b DenseMatrix<T>) -> DenseMatrix<T> {
        expect_op(add(self, rhs))
    }
}

impl<'a, 'b, T: Scalar> Sub<&'b DenseMatrix<T>> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn sub(self, rhs: &'b DenseMatrix<T>) -> DenseMatrix<T> {
        expect_op(subtract(self, rhs))
    }
}

impl<'a, 'b, T: Scalar> Mul<&'b DenseMatrix<T>> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: &'b DenseMatrix<T>) -> DenseMatrix<T> {
        expect_op(multiply(self, rhs))
    }
}

impl<'a, 'b, T: Scalar> Div<&'b DenseMatrix<T>> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn div(self, rhs: &'b DenseMatrix<T>) -> DenseMatrix<T> {
        expect_op(solve::divide(self, rhs))
    }
}

impl<'a, T: Scalar> Neg for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn neg(self) -> DenseMatrix<T> {
        negate(self)
    }
}

impl<'a, T: Scalar> Add<T> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn add(self, scalar: T) -> DenseMatrix<T> {
        scalar_broadcast(self, scalar, |a, s| a + s)
    }
}

impl<'a, T: Scalar> Sub<T> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn sub(self, scalar: T) -> DenseMatrix<T> {
        scalar_broadcast(self, scalar, |a, s| a - s)
    }
}

impl<'a, T: Scalar> Mul<T> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, scalar: T) -> DenseMatrix<T> {
        scalar_broadcast(self, scalar, |a, s| a * s)
    }
}

impl<'a, T: Scalar> Div<T> for &'a DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn div(self, scalar: T) -> DenseMatrix<T> {
        scalar_broadcast(self, scalar, |a, s| a / s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m22(data: [f64; 4]) -> DenseMatrix<f64> {
        DenseMatrix::from_vec(2, 2, data.to_vec()).unwrap()
    }

    #[test]
    fn add_and_subtract_round_trip() {
        let a = m22([1.0, 2.0, 3.0, 4.0]);
        let b = m22([0.5, -1.0, 2.0, 8.0]);
        let round_tripped = &(&a + &b) - &b;
        assert_eq!(round_tripped, a);
    }

    #[test]
    fn add_is_commutative() {
        let a = m22([1.0, 2.0, 3.0, 4.0]);
        let b = m22([9.0, -7.0, 0.25, 1.5]);
        assert_eq!(&a + &b, &b + &a);
    }

    #[test]
    fn mismatched_shapes_name_the_right_operand() {
        let a = m22([1.0, 2.0, 3.0, 4.0]);
        let b = DenseMatrix::<f64>::zeros(3, 2);
        let err = add(&a, &b).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                side: OperandSide::Right,
                operator: "add",
            }
        );
    }

    #[test]
    fn views_and_matrices_agree() {
        let a = m22([1.0, 2.0, 3.0, 4.0]);
        let b = m22([5.0, 6.0, 7.0, 8.0]);
        let owned = add(&a, &b).unwrap();
        let viewed = add(&a.view(), &b.view()).unwrap();
        let mixed = add(&a, &b.view()).unwrap();
        assert_eq!(owned, viewed);
        assert_eq!(owned, mixed);
    }

    #[test]
    fn matmul_contract() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = DenseMatrix::from_rows(&[vec![7.0], vec![8.0], vec![9.0]]).unwrap();
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.as_slice(), &[50.0, 122.0]);

        let err = multiply(&b, &a).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
    }

    #[test]
    fn multiply_into_reuses_buffer() {
        let a = m22([1.0, 2.0, 3.0, 4.0]);
        let b = m22([5.0, 6.0, 7.0, 8.0]);
        let mut out = DenseMatrix::zeros(2, 2);
        multiply_into(&a, &b, &mut out).unwrap();
        assert_eq!(out.as_slice(), &[19.0, 22.0, 43.0, 50.0]);

        let mut wrong = DenseMatrix::zeros(3, 3);
        assert!(multiply_into(&a, &b, &mut wrong).is_err());
    }

    #[test]
    fn negation_involution_and_zero_sum() {
        let a = m22([1.0, -2.0, 0.0, 4.5]);
        assert_eq!(-&(-&a), a);
        let sum = &a + &(-&a);
        assert!(sum.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn scalar_broadcast_identities() {
        let a = m22([1.0, -2.0, 3.0, 4.0]);
        assert_eq!(&a + 0.0, a);
        assert_eq!(&a - 0.0, a);
        assert_eq!(&a * 1.0, a);
    }

    #[test]
    fn in_place_matches_allocating() {
        let a = m22([1.0, 2.0, 3.0, 4.0]);
        let b = m22([5.0, 6.0, 7.0, 8.0]);
        let mut c = a.clone();
        c.add_assign_matrix(&b).unwrap();
        assert_eq!(c, &a + &b);

        let mut d = a.clone();
        d.scale(2.0);
        assert_eq!(d, &a * 2.0);

        let mut e = a.clone();
        e.negate_in_place();
        assert_eq!(e, -&a);
    }

    #[test]
    fn in_place_add_invalidates_structure() {
        let mut a = DenseMatrix::from_rows(&[vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();
        assert!(a.is_upper_triangular());
        let bump = DenseMatrix::from_rows(&[vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
        a.add_assign_matrix(&bump).unwrap();
        assert!(!a.is_upper_triangular());
    }
}
