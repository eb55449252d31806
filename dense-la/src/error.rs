//! Error taxonomy shared by every fallible operation in the crate.
//!
//! Callers branch on [`MatrixError`] variants (or [`ErrorKind`]); the
//! human-readable text is composed separately from the diagnostic-message
//! table in [`crate::messages`], so no logic ever depends on message wording.

use core::fmt;

use crate::messages;

/// Which side of a binary operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Left,
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSide::Left => f.write_str("left"),
            OperandSide::Right => f.write_str("right"),
        }
    }
}

/// All errors returned by `dense-la`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// A binary operator received the uninitialized-operand sentinel.
    NullOperand { side: OperandSide },

    /// Operand shapes are incompatible with the operator's contract.
    DimensionMismatch {
        side: OperandSide,
        operator: &'static str,
    },

    /// An integer was passed where an enumeration value was expected.
    InvalidEnumValue {
        parameter: &'static str,
        value: i32,
    },

    /// A linear or (row, column) index fell outside `[0, bound)`.
    IndexOutOfRange { index: usize, bound: usize },

    /// A factorization reported exact singularity during division/solve.
    SingularMatrix { info: i32 },

    /// The native kernel reported a numerical failure (e.g. no convergence).
    ComputationFailed { info: i32 },

    /// The native kernel capability is unavailable on this host.
    PlatformUnsupported,
}

impl MatrixError {
    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatrixError::NullOperand { .. } => ErrorKind::NullOperand,
            MatrixError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            MatrixError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            MatrixError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            MatrixError::SingularMatrix { .. } => ErrorKind::SingularMatrix,
            MatrixError::ComputationFailed { .. } => ErrorKind::ComputationFailed,
            MatrixError::PlatformUnsupported => ErrorKind::PlatformUnsupported,
        }
    }
}

/// Discriminant-only view of [`MatrixError`], used as the key into the
/// diagnostic-message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullOperand,
    DimensionMismatch,
    InvalidEnumValue,
    IndexOutOfRange,
    SingularMatrix,
    ComputationFailed,
    PlatformUnsupported,
}

impl ErrorKind {
    /// The symbolic message identifier for this kind.
    pub fn message_key(&self) -> &'static str {
        match self {
            ErrorKind::NullOperand => "null_operand",
            ErrorKind::DimensionMismatch => "dimension_mismatch",
            ErrorKind::InvalidEnumValue => "invalid_enum_value",
            ErrorKind::IndexOutOfRange => "index_out_of_range",
            ErrorKind::SingularMatrix => "singular_matrix",
            ErrorKind::ComputationFailed => "computation_failed",
            ErrorKind::PlatformUnsupported => "platform_unsupported",
        }
    }
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = messages::lookup(self.kind().message_key());
        match self {
            MatrixError::NullOperand { side } => write!(f, "{base} ({side} operand)"),
            MatrixError::DimensionMismatch { side, operator } => {
                write!(f, "{base} ({side} operand of `{operator}`)")
            }
            MatrixError::InvalidEnumValue { parameter, value } => {
                write!(f, "{base} (parameter `{parameter}`, value {value})")
            }
            MatrixError::IndexOutOfRange { index, bound } => {
                write!(f, "{base} (index {index}, bound {bound})")
            }
            MatrixError::SingularMatrix { info } => write!(f, "{base} (info {info})"),
            MatrixError::ComputationFailed { info } => write!(f, "{base} (info {info})"),
            MatrixError::PlatformUnsupported => f.write_str(base),
        }
    }
}

impl std::error::Error for MatrixError {}

/// Convenience alias used throughout `dense-la`.
pub type Result<T> = std::result::Result<T, MatrixError>;
