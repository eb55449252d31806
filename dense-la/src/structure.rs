//! Structural classification of dense matrices.
//!
//! Predicates are derived in one pass and cached by the owning matrix; any
//! write path invalidates the cache, so a stale answer is unreachable. The
//! triangular and Hessenberg predicates fall out of the bandwidths: a matrix
//! is upper triangular iff its lower bandwidth is 0 and upper Hessenberg iff
//! its lower bandwidth is at most 1.

use crate::traits::Scalar;

/// Cached structural predicates of a matrix.
///
/// `symmetric`/`skew_symmetric` compare raw entries; `hermitian`/
/// `skew_hermitian` compare against conjugates and only differ from them for
/// complex matrices. Non-square matrices report all four as false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixStructure {
    pub symmetric: bool,
    pub skew_symmetric: bool,
    pub hermitian: bool,
    pub skew_hermitian: bool,
    /// Largest `col - row` over nonzero entries.
    pub upper_bandwidth: usize,
    /// Largest `row - col` over nonzero entries.
    pub lower_bandwidth: usize,
}

impl MatrixStructure {
    pub fn is_upper_triangular(&self) -> bool {
        self.lower_bandwidth == 0
    }

    pub fn is_lower_triangular(&self) -> bool {
        self.upper_bandwidth == 0
    }

    pub fn is_triangular(&self) -> bool {
        self.is_upper_triangular() || self.is_lower_triangular()
    }

    pub fn is_upper_hessenberg(&self) -> bool {
        self.lower_bandwidth <= 1
    }

    pub fn is_lower_hessenberg(&self) -> bool {
        self.upper_bandwidth <= 1
    }

    pub fn is_diagonal(&self) -> bool {
        self.upper_bandwidth == 0 && self.lower_bandwidth == 0
    }
}

/// Classify a row-major buffer in a single sweep.
pub(crate) fn analyze<T: Scalar>(rows: usize, cols: usize, data: &[T]) -> MatrixStructure {
    let square = rows == cols && rows > 0;
    let mut symmetric = square;
    let mut skew_symmetric = square;
    let mut hermitian = square;
    let mut skew_hermitian = square;
    let mut upper_bandwidth = 0usize;
    let mut lower_bandwidth = 0usize;

    for i in 0..rows {
        for j in 0..cols {
            let value = data[i * cols + j];
            if value != T::zero() {
                if j > i {
                    upper_bandwidth = upper_bandwidth.max(j - i);
                } else {
                    lower_bandwidth = lower_bandwidth.max(i - j);
                }
            }
            if square && j >= i {
                let mirrored = data[j * cols + i];
                if value != mirrored {
                    symmetric = false;
                }
                if value != -mirrored {
                    skew_symmetric = false;
                }
                if value != mirrored.conjugate() {
                    hermitian = false;
                }
                if value != -mirrored.conjugate() {
                    skew_hermitian = false;
                }
            }
        }
    }

    MatrixStructure {
        symmetric,
        skew_symmetric,
        hermitian,
        skew_hermitian,
        upper_bandwidth,
        lower_bandwidth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn classifies_upper_triangular() {
        let s = analyze::<f64>(3, 3, &[1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 0.0, 6.0]);
        assert!(s.is_upper_triangular());
        assert!(!s.is_lower_triangular());
        assert!(s.is_upper_hessenberg());
        assert_eq!(s.lower_bandwidth, 0);
        assert_eq!(s.upper_bandwidth, 2);
    }

    #[test]
    fn classifies_hessenberg_but_not_triangular() {
        let s = analyze::<f64>(
            3,
            3,
            &[1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 0.0, 2.0, 1.0],
        );
        assert!(s.is_upper_hessenberg());
        assert!(!s.is_upper_triangular());
        assert!(!s.is_lower_hessenberg());
    }

    #[test]
    fn classifies_symmetric_and_skew() {
        let sym = analyze::<f64>(2, 2, &[1.0, 5.0, 5.0, 2.0]);
        assert!(sym.symmetric);
        assert!(sym.hermitian);
        assert!(!sym.skew_symmetric);

        let skew = analyze::<f64>(2, 2, &[0.0, 3.0, -3.0, 0.0]);
        assert!(skew.skew_symmetric);
        assert!(!skew.symmetric);
    }

    #[test]
    fn hermitian_differs_from_symmetric_for_complex() {
        let data = [
            Complex::new(1.0, 0.0),
            Complex::new(2.0, 1.0),
            Complex::new(2.0, -1.0),
            Complex::new(3.0, 0.0),
        ];
        let s = analyze::<Complex<f64>>(2, 2, &data);
        assert!(s.hermitian);
        assert!(!s.symmetric);
    }

    #[test]
    fn non_square_is_never_symmetric() {
        let s = analyze::<f64>(2, 3, &[1.0; 6]);
        assert!(!s.symmetric);
        assert!(!s.hermitian);
    }

    #[test]
    fn diagonal_has_zero_bandwidths() {
        let s = analyze::<f64>(2, 2, &[4.0, 0.0, 0.0, 9.0]);
        assert!(s.is_diagonal());
        assert!(s.is_upper_triangular() && s.is_lower_triangular());
    }
}
