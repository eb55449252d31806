//! Dense matrix core: an owned row-major buffer with cached structure.

use std::cell::RefCell;
use std::fmt;

use num_complex::Complex;

use crate::error::{MatrixError, OperandSide, Result};
use crate::index::IndexCollection;
use crate::structure::{self, MatrixStructure};
use crate::traits::{MatrixRead, Scalar};
use crate::view::MatrixView;

/// A dense `rows x cols` matrix over `f64` or `Complex<f64>`.
///
/// Elements live in one contiguous row-major buffer whose length is exactly
/// `rows * cols`. Structural predicates (symmetry, bandwidths, and what
/// derives from them) are computed lazily and cached; every mutating entry
/// point drops the cache first, so a cached predicate can never outlive a
/// write.
///
/// A `1 x 1` matrix is an ordinary matrix, not a distinct scalar type.
#[derive(Debug, Clone)]
pub struct DenseMatrix<T: Scalar> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
    cache: RefCell<Option<MatrixStructure>>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Build a matrix from a row-major buffer.
    ///
    /// Fails when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::DimensionMismatch {
                side: OperandSide::Left,
                operator: "from_vec",
            });
        }
        Ok(Self::from_parts(rows, cols, data))
    }

    /// Build a matrix from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(MatrixError::DimensionMismatch {
                    side: OperandSide::Left,
                    operator: "from_rows",
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_parts(nrows, ncols, data))
    }

    /// Build a matrix by evaluating `f(row, col)` for every position.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self::from_parts(rows, cols, data)
    }

    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_parts(rows, cols, vec![T::zero(); rows * cols])
    }

    /// `n x n` identity.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// `1 x 1` matrix holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(1, 1, vec![value])
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            rows,
            cols,
            data,
            cache: RefCell::new(None),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True for a `1 x 1` (scalar-like) matrix.
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the raw buffer. Invalidates the structure cache.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.invalidate();
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_position(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    /// Element at a linear (row-major) index.
    pub fn get_linear(&self, index: usize) -> Result<T> {
        if index >= self.data.len() {
            return Err(MatrixError::IndexOutOfRange {
                index,
                bound: self.data.len(),
            });
        }
        Ok(self.data[index])
    }

    /// Overwrite the element at `(row, col)`. Invalidates the structure cache.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_position(row, col)?;
        self.invalidate();
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Overwrite the element at a linear index. Invalidates the cache.
    pub fn set_linear(&mut self, index: usize, value: T) -> Result<()> {
        if index >= self.data.len() {
            return Err(MatrixError::IndexOutOfRange {
                index,
                bound: self.data.len(),
            });
        }
        self.invalidate();
        self.data[index] = value;
        Ok(())
    }

    fn check_position(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        if col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        Ok(())
    }

    pub(crate) fn invalidate(&mut self) {
        *self.cache.borrow_mut() = None;
    }

    /// Structural predicates, computed on first use and cached until the next
    /// write.
    pub fn structure(&self) -> MatrixStructure {
        if let Some(cached) = *self.cache.borrow() {
            return cached;
        }
        let analyzed = structure::analyze(self.rows, self.cols, &self.data);
        *self.cache.borrow_mut() = Some(analyzed);
        analyzed
    }

    pub fn is_symmetric(&self) -> bool {
        self.structure().symmetric
    }

    pub fn is_skew_symmetric(&self) -> bool {
        self.structure().skew_symmetric
    }

    pub fn is_upper_triangular(&self) -> bool {
        self.structure().is_upper_triangular()
    }

    pub fn is_lower_triangular(&self) -> bool {
        self.structure().is_lower_triangular()
    }

    pub fn is_upper_hessenberg(&self) -> bool {
        self.structure().is_upper_hessenberg()
    }

    pub fn is_lower_hessenberg(&self) -> bool {
        self.structure().is_lower_hessenberg()
    }

    pub fn upper_bandwidth(&self) -> usize {
        self.structure().upper_bandwidth
    }

    pub fn lower_bandwidth(&self) -> usize {
        self.structure().lower_bandwidth
    }

    /// A read-only view borrowing this matrix.
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView::new(self)
    }

    /// Allocating transpose.
    pub fn transpose(&self) -> DenseMatrix<T> {
        DenseMatrix::from_fn(self.cols, self.rows, |i, j| self.data[j * self.cols + i])
    }

    /// Conjugate transpose (plain transpose for real matrices).
    pub fn adjoint(&self) -> DenseMatrix<T> {
        DenseMatrix::from_fn(self.cols, self.rows, |i, j| {
            self.data[j * self.cols + i].conjugate()
        })
    }

    /// Extract the sub-matrix made of the given rows, in the given order.
    pub fn select_rows(&self, indices: &IndexCollection) -> Result<DenseMatrix<T>> {
        indices.validate(self.rows)?;
        let cols = self.cols;
        let mut data = Vec::with_capacity(indices.len() * cols);
        for &row in indices {
            data.extend_from_slice(&self.data[row * cols..(row + 1) * cols]);
        }
        Ok(DenseMatrix::from_parts(indices.len(), cols, data))
    }

    /// Extract the sub-matrix made of the given columns, in the given order.
    pub fn select_columns(&self, indices: &IndexCollection) -> Result<DenseMatrix<T>> {
        indices.validate(self.cols)?;
        let mut data = Vec::with_capacity(self.rows * indices.len());
        for i in 0..self.rows {
            for &col in indices {
                data.push(self.data[i * self.cols + col]);
            }
        }
        Ok(DenseMatrix::from_parts(self.rows, indices.len(), data))
    }

    /// Single row as a `1 x cols` matrix.
    pub fn row(&self, index: usize) -> Result<DenseMatrix<T>> {
        self.select_rows(&IndexCollection::new(vec![index]))
    }

    /// Single column as a `rows x 1` matrix.
    pub fn column(&self, index: usize) -> Result<DenseMatrix<T>> {
        self.select_columns(&IndexCollection::new(vec![index]))
    }

    /// Sum of the diagonal. Fails for non-square matrices.
    pub fn trace(&self) -> Result<T> {
        if self.rows != self.cols {
            return Err(MatrixError::DimensionMismatch {
                side: OperandSide::Left,
                operator: "trace",
            });
        }
        let mut acc = T::zero();
        for i in 0..self.rows {
            acc = acc + self.data[i * self.cols + i];
        }
        Ok(acc)
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> f64 {
        self.data
            .iter()
            .map(|&x| {
                let m = x.modulus();
                m * m
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl DenseMatrix<Complex<f64>> {
    /// Equal to its own conjugate transpose.
    pub fn is_hermitian(&self) -> bool {
        self.structure().hermitian
    }

    /// Equal to the negated conjugate transpose.
    pub fn is_skew_hermitian(&self) -> bool {
        self.structure().skew_hermitian
    }
}

impl DenseMatrix<f64> {
    /// Promote to a complex matrix with zero imaginary parts.
    pub fn to_complex(&self) -> DenseMatrix<Complex<f64>> {
        DenseMatrix::from_parts(
            self.rows,
            self.cols,
            self.data.iter().map(|&x| Complex::new(x, 0.0)).collect(),
        )
    }
}

impl<T: Scalar> PartialEq for DenseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

impl<T: Scalar> MatrixRead<T> for DenseMatrix<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn structure(&self) -> MatrixStructure {
        DenseMatrix::structure(self)
    }
}

impl<T: Scalar> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", self.data[i * self.cols + j])?;
            }
            if i + 1 < self.rows {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_checks_length() {
        assert!(DenseMatrix::from_vec(2, 3, vec![1.0; 6]).is_ok());
        let err = DenseMatrix::from_vec(2, 3, vec![1.0; 5]).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
    }

    #[test]
    fn indexing_bounds() {
        let mut m = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(1, 0).unwrap(), 3.0);
        assert!(matches!(
            m.get(2, 0).unwrap_err(),
            MatrixError::IndexOutOfRange { index: 2, bound: 2 }
        ));
        assert!(m.set(0, 1, 9.0).is_ok());
        assert_eq!(m.get_linear(1).unwrap(), 9.0);
        assert!(m.get_linear(4).is_err());
    }

    #[test]
    fn structure_cache_invalidates_on_write() {
        let mut m =
            DenseMatrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        assert!(m.is_upper_triangular());
        m.set(1, 0, 5.0).unwrap();
        assert!(!m.is_upper_triangular());
        assert_eq!(m.lower_bandwidth(), 1);

        m.as_mut_slice()[2] = 0.0;
        assert!(m.is_upper_triangular());
    }

    #[test]
    fn select_rows_and_columns() {
        let m = DenseMatrix::from_rows(&[
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])
        .unwrap();
        let picked = m.select_rows(&IndexCollection::new(vec![2, 0])).unwrap();
        assert_eq!(picked.as_slice(), &[7.0, 8.0, 9.0, 1.0, 2.0, 3.0]);

        let cols = m.select_columns(&IndexCollection::new(vec![1])).unwrap();
        assert_eq!(cols.shape(), (3, 1));
        assert_eq!(cols.as_slice(), &[2.0, 5.0, 8.0]);

        assert!(m.select_rows(&IndexCollection::new(vec![3])).is_err());
    }

    #[test]
    fn hermitian_predicates_on_complex_matrices() {
        let m = DenseMatrix::from_rows(&[
            vec![Complex::new(1.0, 0.0), Complex::new(0.0, 2.0)],
            vec![Complex::new(0.0, -2.0), Complex::new(3.0, 0.0)],
        ])
        .unwrap();
        assert!(m.is_hermitian());
        assert!(!m.is_skew_hermitian());
        assert!(!m.is_symmetric());
    }

    #[test]
    fn transpose_round_trip() {
        let m = DenseMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn trace_requires_square() {
        let m = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.trace().unwrap(), 5.0);
        let rect = DenseMatrix::<f64>::zeros(2, 3);
        assert!(rect.trace().is_err());
    }
}
