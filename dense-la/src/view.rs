//! Read-only matrix view.

use crate::error::Result;
use crate::index::IndexCollection;
use crate::matrix::DenseMatrix;
use crate::structure::MatrixStructure;
use crate::traits::{MatrixRead, Scalar};

/// Non-owning, read-only wrapper over a [`DenseMatrix`].
///
/// Exposes the same query surface as the owning matrix and none of its
/// mutation entry points. The borrow ties the view's lifetime to the
/// underlying buffer, so a view can never outlive the matrix it wraps, and
/// structural queries hit the owner's cache.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T: Scalar> {
    target: &'a DenseMatrix<T>,
}

impl<'a, T: Scalar> MatrixView<'a, T> {
    pub(crate) fn new(target: &'a DenseMatrix<T>) -> Self {
        Self { target }
    }

    pub fn rows(&self) -> usize {
        self.target.rows()
    }

    pub fn cols(&self) -> usize {
        self.target.cols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.target.shape()
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        self.target.as_slice()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.target.get(row, col)
    }

    pub fn get_linear(&self, index: usize) -> Result<T> {
        self.target.get_linear(index)
    }

    pub fn structure(&self) -> MatrixStructure {
        self.target.structure()
    }

    pub fn is_symmetric(&self) -> bool {
        self.target.is_symmetric()
    }

    pub fn is_skew_symmetric(&self) -> bool {
        self.target.is_skew_symmetric()
    }

    pub fn is_upper_triangular(&self) -> bool {
        self.target.is_upper_triangular()
    }

    pub fn is_lower_triangular(&self) -> bool {
        self.target.is_lower_triangular()
    }

    pub fn is_upper_hessenberg(&self) -> bool {
        self.target.is_upper_hessenberg()
    }

    pub fn is_lower_hessenberg(&self) -> bool {
        self.target.is_lower_hessenberg()
    }

    /// Extract the sub-matrix made of the given rows, as an owned matrix.
    pub fn select_rows(&self, indices: &IndexCollection) -> Result<DenseMatrix<T>> {
        self.target.select_rows(indices)
    }

    /// Extract the sub-matrix made of the given columns, as an owned matrix.
    pub fn select_columns(&self, indices: &IndexCollection) -> Result<DenseMatrix<T>> {
        self.target.select_columns(indices)
    }

    /// Materialize an owned copy of the viewed matrix.
    pub fn to_owned(&self) -> DenseMatrix<T> {
        self.target.clone()
    }
}

impl<'a, T: Scalar> MatrixRead<T> for MatrixView<'a, T> {
    fn rows(&self) -> usize {
        self.target.rows()
    }

    fn cols(&self) -> usize {
        self.target.cols()
    }

    fn as_slice(&self) -> &[T] {
        self.target.as_slice()
    }

    fn structure(&self) -> MatrixStructure {
        self.target.structure()
    }
}
