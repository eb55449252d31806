//! Operand dispatch: resolves operator x operand-kind combinations.
//!
//! A binary operator can meet any pairing of {owning matrix, read-only view,
//! scalar, null sentinel} on either side, in real or complex flavor. This
//! module funnels every pairing into the single arithmetic implementation in
//! [`crate::ops`]/[`crate::solve`], after performing the validation the
//! contract puts before any kernel work: null operands first (naming the
//! side), dimensions second (scalar pairings never fail on dimension).
//!
//! `Operand::Null` is the explicit rendition of the source API's
//! uninitialized-operand sentinel; operations reached through live Rust
//! references cannot be null by construction.

use num_complex::Complex;

use crate::error::{MatrixError, OperandSide, Result};
use crate::matrix::DenseMatrix;
use crate::ops;
use crate::solve;
use crate::traits::{MatrixRead, Scalar};
use crate::view::MatrixView;

/// The five binary operators of the matrix algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    ElementwiseMultiply,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::ElementwiseMultiply => "elementwise-multiply",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
        }
    }
}

/// One operand of a dispatched operation.
pub enum Operand<'a, T: Scalar> {
    /// A writable (owning) matrix, borrowed for the call.
    Matrix(&'a DenseMatrix<T>),
    /// A read-only view.
    View(MatrixView<'a, T>),
    /// A broadcast scalar.
    Scalar(T),
    /// The uninitialized sentinel.
    Null,
}

/// An operand after null resolution: readable or broadcast scalar.
enum Resolved<'a, T: Scalar> {
    Read(&'a dyn MatrixRead<T>),
    Scalar(T),
}

impl<'a, T: Scalar> Operand<'a, T> {
    fn resolve(&self, side: OperandSide) -> Result<Resolved<'_, T>> {
        match self {
            Operand::Null => Err(MatrixError::NullOperand { side }),
            Operand::Scalar(s) => Ok(Resolved::Scalar(*s)),
            Operand::Matrix(m) => Ok(Resolved::Read(*m as &dyn MatrixRead<T>)),
            Operand::View(v) => Ok(Resolved::Read(v as &dyn MatrixRead<T>)),
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }
}

/// Apply a binary operator to two dispatched operands.
///
/// The concrete ownership pairing cannot influence results: matrix and view
/// operands collapse onto the same readable capability before any arithmetic
/// runs. A null left operand is reported before a null right one.
pub fn evaluate<T: Scalar>(
    op: BinaryOp,
    left: Operand<'_, T>,
    right: Operand<'_, T>,
) -> Result<DenseMatrix<T>> {
    let lhs = left.resolve(OperandSide::Left)?;
    let rhs = right.resolve(OperandSide::Right)?;
    match (lhs, rhs) {
        (Resolved::Scalar(a), Resolved::Scalar(b)) => {
            Ok(DenseMatrix::scalar(combine_scalars(op, a, b)))
        }
        (Resolved::Scalar(s), Resolved::Read(matrix)) => Ok(broadcast_scalar_left(op, s, matrix)),
        (Resolved::Read(matrix), Resolved::Scalar(s)) => Ok(broadcast_scalar_right(op, matrix, s)),
        (Resolved::Read(l), Resolved::Read(r)) => matrix_matrix(op, l, r),
    }
}

/// Negate a dispatched operand.
pub fn negate<T: Scalar>(operand: Operand<'_, T>) -> Result<DenseMatrix<T>> {
    match operand {
        Operand::Null => Err(MatrixError::NullOperand {
            side: OperandSide::Left,
        }),
        Operand::Scalar(s) => Ok(DenseMatrix::scalar(-s)),
        Operand::Matrix(m) => Ok(ops::negate(m)),
        Operand::View(v) => Ok(ops::negate(&v)),
    }
}

fn matrix_matrix<T: Scalar>(
    op: BinaryOp,
    left: &dyn MatrixRead<T>,
    right: &dyn MatrixRead<T>,
) -> Result<DenseMatrix<T>> {
    match op {
        BinaryOp::Add => ops::add(left, right),
        BinaryOp::Subtract => ops::subtract(left, right),
        BinaryOp::ElementwiseMultiply => ops::multiply_elementwise(left, right),
        BinaryOp::Multiply => ops::multiply(left, right),
        BinaryOp::Divide => solve::divide(left, right),
    }
}

fn combine_scalars<T: Scalar>(op: BinaryOp, a: T, b: T) -> T {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::ElementwiseMultiply | BinaryOp::Multiply => a * b,
        BinaryOp::Divide => a / b,
    }
}

fn broadcast_scalar_right<T: Scalar>(
    op: BinaryOp,
    matrix: &dyn MatrixRead<T>,
    scalar: T,
) -> DenseMatrix<T> {
    ops::scalar_broadcast(matrix, scalar, |entry, s| combine_scalars(op, entry, s))
}

fn broadcast_scalar_left<T: Scalar>(
    op: BinaryOp,
    scalar: T,
    matrix: &dyn MatrixRead<T>,
) -> DenseMatrix<T> {
    ops::scalar_broadcast(matrix, scalar, |entry, s| combine_scalars(op, s, entry))
}

//==============================================================================
// Mixed real/complex pairings
//==============================================================================

/// Apply an operator to a real left operand and a complex right operand.
///
/// The real side is promoted and the call proceeds through the complex path;
/// null checks still report the original sides.
pub fn evaluate_dz(
    op: BinaryOp,
    left: Operand<'_, f64>,
    right: Operand<'_, Complex<f64>>,
) -> Result<DenseMatrix<Complex<f64>>> {
    match left {
        Operand::Null => Err(MatrixError::NullOperand {
            side: OperandSide::Left,
        }),
        Operand::Scalar(s) => evaluate(op, Operand::Scalar(Complex::new(s, 0.0)), right),
        Operand::Matrix(m) => {
            let promoted = m.to_complex();
            evaluate(op, Operand::Matrix(&promoted), right)
        }
        Operand::View(v) => {
            let promoted = v.to_owned().to_complex();
            evaluate(op, Operand::Matrix(&promoted), right)
        }
    }
}

/// Apply an operator to a complex left operand and a real right operand.
pub fn evaluate_zd(
    op: BinaryOp,
    left: Operand<'_, Complex<f64>>,
    right: Operand<'_, f64>,
) -> Result<DenseMatrix<Complex<f64>>> {
    match right {
        Operand::Null => {
            // Preserve ordering: a null left still wins the report.
            if left.is_null() {
                Err(MatrixError::NullOperand {
                    side: OperandSide::Left,
                })
            } else {
                Err(MatrixError::NullOperand {
                    side: OperandSide::Right,
                })
            }
        }
        Operand::Scalar(s) => evaluate(op, left, Operand::Scalar(Complex::new(s, 0.0))),
        Operand::Matrix(m) => {
            let promoted = m.to_complex();
            evaluate(op, left, Operand::Matrix(&promoted))
        }
        Operand::View(v) => {
            let promoted = v.to_owned().to_complex();
            evaluate(op, left, Operand::Matrix(&promoted))
        }
    }
}
