//! Summary statistics: reductions over all entries or along a dimension.

use crate::error::{MatrixError, Result};
use crate::matrix::DenseMatrix;
use crate::traits::{MatrixRead, Scalar};

/// Dimension selector for along-a-dimension reductions.
///
/// `OnRows` collapses each row to one value (the result is a column vector,
/// or a `rows x rows` matrix for correlation); `OnColumns` is the column
/// analogue. Only these two values exist; integer conversion rejects
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOperation {
    OnRows = 0,
    OnColumns = 1,
}

impl DataOperation {
    /// Decode an integer parameter, failing with `InvalidEnumValue` for any
    /// value other than the two members.
    pub fn from_i32(value: i32) -> Result<Self> {
        match value {
            0 => Ok(DataOperation::OnRows),
            1 => Ok(DataOperation::OnColumns),
            other => Err(MatrixError::InvalidEnumValue {
                parameter: "data_operation",
                value: other,
            }),
        }
    }
}

impl TryFrom<i32> for DataOperation {
    type Error = MatrixError;

    fn try_from(value: i32) -> Result<Self> {
        Self::from_i32(value)
    }
}

/// Denominator convention for variance-like statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Bias-adjusted: divide by `n - 1`.
    Sample,
    /// Divide by `n`.
    Population,
}

/// Sum of every entry.
pub fn sum_all<T, M>(matrix: &M) -> T
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    matrix
        .as_slice()
        .iter()
        .fold(T::zero(), |acc, &x| acc + x)
}

/// Mean of every entry.
pub fn mean_all<T, M>(matrix: &M) -> T
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    sum_all(matrix) / T::from_f64(matrix.len() as f64)
}

/// Sum along a dimension: a `rows x 1` vector for [`DataOperation::OnRows`],
/// a `1 x cols` vector for [`DataOperation::OnColumns`].
pub fn sum_along<T, M>(matrix: &M, operation: DataOperation) -> DenseMatrix<T>
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    let (rows, cols) = matrix.shape();
    match operation {
        DataOperation::OnRows => DenseMatrix::from_fn(rows, 1, |i, _| {
            (0..cols).fold(T::zero(), |acc, j| acc + matrix.at(i, j))
        }),
        DataOperation::OnColumns => DenseMatrix::from_fn(1, cols, |_, j| {
            (0..rows).fold(T::zero(), |acc, i| acc + matrix.at(i, j))
        }),
    }
}

/// Mean along a dimension; shapes as for [`sum_along`].
pub fn mean_along<T, M>(matrix: &M, operation: DataOperation) -> DenseMatrix<T>
where
    T: Scalar,
    M: MatrixRead<T> + ?Sized,
{
    let (rows, cols) = matrix.shape();
    let count = match operation {
        DataOperation::OnRows => cols,
        DataOperation::OnColumns => rows,
    };
    let mut sums = sum_along(matrix, operation);
    sums.scale(T::one() / T::from_f64(count as f64));
    sums
}

/// Variance of every entry.
pub fn variance_all<M>(matrix: &M, normalization: Normalization) -> f64
where
    M: MatrixRead<f64> + ?Sized,
{
    variance_of(matrix.as_slice(), normalization)
}

/// Variance along a dimension; shapes as for [`sum_along`].
pub fn variance_along<M>(
    matrix: &M,
    operation: DataOperation,
    normalization: Normalization,
) -> DenseMatrix<f64>
where
    M: MatrixRead<f64> + ?Sized,
{
    let (rows, cols) = matrix.shape();
    match operation {
        DataOperation::OnRows => DenseMatrix::from_fn(rows, 1, |i, _| {
            let row: Vec<f64> = (0..cols).map(|j| matrix.at(i, j)).collect();
            variance_of(&row, normalization)
        }),
        DataOperation::OnColumns => DenseMatrix::from_fn(1, cols, |_, j| {
            let col: Vec<f64> = (0..rows).map(|i| matrix.at(i, j)).collect();
            variance_of(&col, normalization)
        }),
    }
}

fn variance_of(values: &[f64], normalization: Normalization) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|&x| (x - mean) * (x - mean)).sum();
    match normalization {
        Normalization::Sample => ss / (n - 1.0),
        Normalization::Population => ss / n,
    }
}

/// Correlation matrix of the variables selected by `operation`.
///
/// `OnRows` treats each row as a variable observed across the columns and
/// yields a `rows x rows` matrix; `OnColumns` is the transpose convention.
/// Covariances are bias-adjusted (`n - 1`); with a single observation per
/// variable every entry is `0/0 = NaN`.
pub fn correlation<M>(matrix: &M, operation: DataOperation) -> DenseMatrix<f64>
where
    M: MatrixRead<f64> + ?Sized,
{
    let (rows, cols) = matrix.shape();
    let (variables, observations) = match operation {
        DataOperation::OnRows => (rows, cols),
        DataOperation::OnColumns => (cols, rows),
    };
    let value = |variable: usize, observation: usize| match operation {
        DataOperation::OnRows => matrix.at(variable, observation),
        DataOperation::OnColumns => matrix.at(observation, variable),
    };

    let means: Vec<f64> = (0..variables)
        .map(|v| (0..observations).map(|o| value(v, o)).sum::<f64>() / observations as f64)
        .collect();
    let mut covariance = vec![0.0; variables * variables];
    for a in 0..variables {
        for b in a..variables {
            let mut acc = 0.0;
            for o in 0..observations {
                acc += (value(a, o) - means[a]) * (value(b, o) - means[b]);
            }
            let cov = acc / (observations as f64 - 1.0);
            covariance[a * variables + b] = cov;
            covariance[b * variables + a] = cov;
        }
    }

    DenseMatrix::from_fn(variables, variables, |a, b| {
        let denom =
            (covariance[a * variables + a] * covariance[b * variables + b]).sqrt();
        covariance[a * variables + b] / denom
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DenseMatrix<f64> {
        DenseMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn data_operation_decoding() {
        assert_eq!(DataOperation::from_i32(0).unwrap(), DataOperation::OnRows);
        assert_eq!(DataOperation::from_i32(1).unwrap(), DataOperation::OnColumns);
        let err = DataOperation::from_i32(7).unwrap_err();
        assert_eq!(
            err,
            MatrixError::InvalidEnumValue {
                parameter: "data_operation",
                value: 7,
            }
        );
    }

    #[test]
    fn sums_and_means() {
        let m = sample();
        assert_eq!(sum_all(&m), 21.0);
        assert_eq!(mean_all(&m), 3.5);

        let row_sums = sum_along(&m, DataOperation::OnRows);
        assert_eq!(row_sums.shape(), (2, 1));
        assert_eq!(row_sums.as_slice(), &[6.0, 15.0]);

        let col_means = mean_along(&m, DataOperation::OnColumns);
        assert_eq!(col_means.shape(), (1, 3));
        assert_eq!(col_means.as_slice(), &[2.5, 3.5, 4.5]);
    }

    #[test]
    fn reductions_over_zeros_are_zero() {
        let z = DenseMatrix::<f64>::zeros(3, 4);
        assert_eq!(sum_all(&z), 0.0);
        assert_eq!(mean_all(&z), 0.0);
        assert!(sum_along(&z, DataOperation::OnRows)
            .as_slice()
            .iter()
            .all(|&x| x == 0.0));
    }

    #[test]
    fn variance_bias_variants() {
        let m = DenseMatrix::from_vec(1, 4, vec![2.0, 4.0, 6.0, 8.0]).unwrap();
        let sample_var = variance_all(&m, Normalization::Sample);
        let population_var = variance_all(&m, Normalization::Population);
        assert!((sample_var - 20.0 / 3.0).abs() < 1e-12);
        assert!((population_var - 5.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_on_columns_shape_and_diagonal() {
        let m = DenseMatrix::from_rows(&[
            vec![1.0, 2.0],
            vec![2.0, 4.0],
            vec![3.0, 5.9],
        ])
        .unwrap();
        let c = correlation(&m, DataOperation::OnColumns);
        assert_eq!(c.shape(), (2, 2));
        assert!((c.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert!((c.get(1, 1).unwrap() - 1.0).abs() < 1e-12);
        assert!(c.get(0, 1).unwrap() > 0.99);
        assert_eq!(c.get(0, 1).unwrap(), c.get(1, 0).unwrap());
    }

    #[test]
    fn single_row_correlation_is_all_nan() {
        let m = DenseMatrix::from_vec(1, 3, vec![4.0, 5.0, 6.0]).unwrap();
        let c = correlation(&m, DataOperation::OnColumns);
        assert_eq!(c.shape(), (3, 3));
        assert!(c.as_slice().iter().all(|x| x.is_nan()));
    }

    #[test]
    fn views_reduce_like_owners() {
        let m = sample();
        assert_eq!(sum_all(&m.view()), sum_all(&m));
        assert_eq!(
            mean_along(&m.view(), DataOperation::OnRows),
            mean_along(&m, DataOperation::OnRows)
        );
    }
}
