//! End-to-end exercises of the public surface.

use dense_la::{
    dispatch, kernel_info, simple_random_sample, sort, stats, BinaryOp, DataOperation,
    DenseMatrix, MatrixError, Operand, OperandSide, RandomStream, SortOrder, Spectrum,
};

#[test]
fn default_kernel_is_installed() {
    let (name, available) = kernel_info();
    assert!(available);
    assert!(!name.is_empty());
}

#[test]
fn operator_round_trip_and_identities() {
    let a = DenseMatrix::from_rows(&[vec![1.0, -2.5], vec![0.0, 4.0]]).unwrap();
    let b = DenseMatrix::from_rows(&[vec![3.0, 3.0], vec![-1.0, 0.5]]).unwrap();

    assert_eq!(&(&a + &b) - &b, a);
    assert_eq!(&a + &b, &b + &a);
    assert_eq!(-&(-&a), a);
    assert_eq!(&a + 0.0, a);
    assert_eq!(&a - 0.0, a);
    assert_eq!(&a * 1.0, a);

    let zero_sum = &a + &(-&a);
    assert!(zero_sum.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn dispatch_contract_for_null_operands() {
    let a = DenseMatrix::<f64>::identity(2);
    for op in [
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::ElementwiseMultiply,
        BinaryOp::Multiply,
        BinaryOp::Divide,
    ] {
        let left_null = dispatch::evaluate(op, Operand::Null, Operand::Matrix(&a)).unwrap_err();
        assert_eq!(
            left_null,
            MatrixError::NullOperand {
                side: OperandSide::Left
            }
        );
        let right_null = dispatch::evaluate(op, Operand::Matrix(&a), Operand::Null).unwrap_err();
        assert_eq!(
            right_null,
            MatrixError::NullOperand {
                side: OperandSide::Right
            }
        );
    }
}

#[test]
fn hessenberg_division_fixture() {
    let right = DenseMatrix::from_rows(&[
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        vec![0.0, 3.0, 6.0, 10.0, 15.0],
        vec![0.0, 0.0, 10.0, 20.0, 35.0],
        vec![0.0, 0.0, 0.0, 35.0, 70.0],
    ])
    .unwrap();
    let left = DenseMatrix::from_rows(&[
        vec![1.0, 3.0, 5.0, 7.0, 9.0],
        vec![2.0, 4.0, 6.0, 8.0, 10.0],
    ])
    .unwrap();

    let quotient = &left / &right;
    let expected = [
        -1.0, 2.0, 0.0, 0.0, 0.0, //
        0.0, 2.0, 0.0, 0.0, 0.0,
    ];
    for (a, e) in quotient.as_slice().iter().zip(expected) {
        assert!((a - e).abs() < 1e-6);
    }
}

#[test]
fn sort_fixture_with_permutation() {
    let m = DenseMatrix::from_vec(2, 2, vec![3.0, 1.0, 4.0, 2.0]).unwrap();
    let ascending = sort::sort(&m, SortOrder::Ascending);
    assert_eq!(ascending.data.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    for k in 0..4 {
        assert_eq!(
            ascending.data.get_linear(k).unwrap(),
            m.get_linear(ascending.permutation[k]).unwrap()
        );
    }

    let reversed = DenseMatrix::from_vec(2, 2, vec![2.0, 4.0, 1.0, 3.0]).unwrap();
    let descending = sort::sort(&reversed, SortOrder::Descending);
    assert_eq!(descending.data.as_slice(), &[4.0, 3.0, 2.0, 1.0]);
    for k in 0..4 {
        assert_eq!(
            descending.data.get_linear(k).unwrap(),
            reversed.get_linear(descending.permutation[k]).unwrap()
        );
    }
}

#[test]
fn single_row_correlation_is_nan() {
    let m = DenseMatrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
    let c = stats::correlation(&m, DataOperation::OnColumns);
    assert_eq!(c.shape(), (3, 3));
    assert!(c.as_slice().iter().all(|x| x.is_nan()));
}

#[test]
fn spectral_and_svd_work_through_the_public_surface() {
    let sym = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
    match sym.spectral_decomposition().unwrap() {
        Spectrum::Real(eig) => {
            assert!((eig.values.get(0, 0).unwrap() - 1.0).abs() < 1e-10);
            assert!((eig.values.get(1, 1).unwrap() - 3.0).abs() < 1e-10);
        }
        Spectrum::Complex(_) => panic!("symmetric input should stay real"),
    }

    let rect = DenseMatrix::from_rows(&[vec![3.0, 0.0], vec![0.0, -2.0], vec![0.0, 0.0]]).unwrap();
    let svd = rect.singular_value_decomposition().unwrap();
    assert!((svd.sigma.get(0, 0).unwrap() - 3.0).abs() < 1e-10);
    assert!((svd.sigma.get(1, 1).unwrap() - 2.0).abs() < 1e-10);
}

#[test]
fn sampling_through_scoped_streams() {
    let draw = RandomStream::scoped(7, |stream| simple_random_sample(stream, 20, 5).unwrap());
    assert_eq!(draw.indices.len(), 5);
    assert!(draw.indices.is_distinct());
    assert!(draw
        .inclusion_probabilities
        .iter()
        .all(|&p| (p - 0.25).abs() < 1e-12));
}

#[test]
fn views_participate_everywhere() {
    let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let b = DenseMatrix::identity(2);

    let via_views = dispatch::evaluate(
        BinaryOp::Multiply,
        Operand::View(a.view()),
        Operand::View(b.view()),
    )
    .unwrap();
    assert_eq!(via_views, a);

    assert_eq!(stats::sum_all(&a.view()), 10.0);
    assert!(a.view().is_upper_hessenberg());
}
