//! Sorting with permutation tracking.

use std::cmp::Ordering;

use crate::index::IndexCollection;
use crate::matrix::DenseMatrix;
use crate::traits::MatrixRead;

/// Requested sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A sorted copy of the data together with the permutation that produced it:
/// `data[k] == original[permutation[k]]` for every linear index `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortIndexResult {
    pub data: DenseMatrix<f64>,
    pub permutation: IndexCollection,
}

// NaN entries order after every number in both directions, so a sort is
// total; -0.0 and 0.0 compare equal and keep their relative (stable) order.
fn compare(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let natural = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => natural,
                SortOrder::Descending => natural.reverse(),
            }
        }
    }
}

/// Sort all entries of a matrix in linear (row-major) order, keeping its
/// shape and returning the permutation alongside the sorted data.
pub fn sort<M>(matrix: &M, order: SortOrder) -> SortIndexResult
where
    M: MatrixRead<f64> + ?Sized,
{
    let source = matrix.as_slice();
    let mut permutation: Vec<usize> = (0..source.len()).collect();
    permutation.sort_by(|&i, &j| compare(source[i], source[j], order));
    let sorted: Vec<f64> = permutation.iter().map(|&i| source[i]).collect();
    SortIndexResult {
        data: DenseMatrix::from_parts(matrix.rows(), matrix.cols(), sorted),
        permutation: IndexCollection::new(permutation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_sort_with_permutation() {
        let m = DenseMatrix::from_vec(2, 2, vec![3.0, 1.0, 4.0, 2.0]).unwrap();
        let result = sort(&m, SortOrder::Ascending);
        assert_eq!(result.data.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(result.data.shape(), (2, 2));
        for k in 0..4 {
            assert_eq!(
                result.data.get_linear(k).unwrap(),
                m.get_linear(result.permutation[k]).unwrap()
            );
        }
    }

    #[test]
    fn descending_sort_mirrors_reverse_data() {
        let m = DenseMatrix::from_vec(2, 2, vec![2.0, 4.0, 1.0, 3.0]).unwrap();
        let result = sort(&m, SortOrder::Descending);
        assert_eq!(result.data.as_slice(), &[4.0, 3.0, 2.0, 1.0]);
        for k in 0..4 {
            assert_eq!(
                result.data.get_linear(k).unwrap(),
                m.get_linear(result.permutation[k]).unwrap()
            );
        }
    }

    #[test]
    fn nan_entries_sort_last() {
        let m = DenseMatrix::from_vec(1, 4, vec![2.0, f64::NAN, 1.0, 3.0]).unwrap();
        let ascending = sort(&m, SortOrder::Ascending);
        assert_eq!(&ascending.data.as_slice()[..3], &[1.0, 2.0, 3.0]);
        assert!(ascending.data.get_linear(3).unwrap().is_nan());

        let descending = sort(&m, SortOrder::Descending);
        assert_eq!(&descending.data.as_slice()[..3], &[3.0, 2.0, 1.0]);
        assert!(descending.data.get_linear(3).unwrap().is_nan());
    }

    #[test]
    fn views_sort_like_owners() {
        let m = DenseMatrix::from_vec(1, 3, vec![2.0, 0.0, 1.0]).unwrap();
        assert_eq!(sort(&m, SortOrder::Ascending), sort(&m.view(), SortOrder::Ascending));
    }
}
