use super::*;

fn reference() -> Matrix<f64> {
    Matrix::from_vec(
        4,
        3,
        vec![
            10.0, 5.0, 5.0, //
            5.0, 10.0, 5.0, //
            20.0, 5.0, 15.0, //
            5.0, 15.0, 0.0,
        ],
    )
    .expect("valid matrix dimensions")
}

#[test]
fn test_sum_of_squares_reference() {
    // bin means [10, 8.75, 6.25]: SST = 150 + 68.75 + 118.75
    // groups {A,B}, {C,D}: SSE = (12.5 + 12.5 + 0) + (112.5 + 50 + 112.5)
    let p = Partition::new(vec![0, 0, 1, 1], 2).expect("valid labels");
    let ss = sum_of_squares(&reference(), &p).expect("matching shapes");
    assert!((ss.sst - 337.5).abs() < 1e-9);
    assert!((ss.sse - 300.0).abs() < 1e-9);
}

#[test]
fn test_calinski_harabasz_reference() {
    let p = Partition::new(vec![0, 0, 1, 1], 2).expect("valid labels");
    let ss = sum_of_squares(&reference(), &p).expect("matching shapes");
    let ch = calinski_harabasz(ss, 4, 2).expect("k >= 2");
    // (37.5 / 1) / (300 / 2)
    assert!((ch - 0.25).abs() < 1e-9);
}

#[test]
fn test_single_group_sse_equals_sst() {
    let p = Partition::new(vec![0; 4], 1).expect("valid labels");
    let ss = sum_of_squares(&reference(), &p).expect("matching shapes");
    assert!((ss.sst - ss.sse).abs() < 1e-9);
}

#[test]
fn test_singletons_have_zero_sse_and_infinite_ch() {
    let p = Partition::singletons(4);
    let ss = sum_of_squares(&reference(), &p).expect("matching shapes");
    assert_eq!(ss.sse, 0.0);
    assert_eq!(calinski_harabasz(ss, 4, 4).expect("k >= 2"), f64::INFINITY);
}

#[test]
fn test_ch_rejects_single_group() {
    let err = calinski_harabasz(SumOfSquares { sst: 5.0, sse: 5.0 }, 10, 1).unwrap_err();
    assert!(matches!(err, EntropyMaxError::InvalidGroupCount { k: 1, .. }));
}

#[test]
fn test_single_group_ch_with_spread_is_zero() {
    let p = Partition::new(vec![0; 4], 1).expect("valid labels");
    let ss = sum_of_squares(&reference(), &p).expect("matching shapes");
    assert_eq!(single_group_ch(ss, 4), 0.0);
}

#[test]
fn test_single_group_ch_identical_rows_is_infinite() {
    assert_eq!(
        single_group_ch(SumOfSquares { sst: 0.0, sse: 0.0 }, 3),
        f64::INFINITY
    );
}

#[test]
fn test_single_group_ch_one_sample_is_zero() {
    assert_eq!(single_group_ch(SumOfSquares { sst: 0.0, sse: 0.0 }, 1), 0.0);
}

#[test]
fn test_ch_zero_sst_with_room_for_dof() {
    // r = 0, numerator 0, denominator 0: +inf
    let ch = calinski_harabasz(SumOfSquares { sst: 0.0, sse: 0.0 }, 5, 2).expect("k >= 2");
    assert_eq!(ch, f64::INFINITY);
}

#[test]
fn test_ch_no_residual_dof_is_infinite() {
    let ch = calinski_harabasz(SumOfSquares { sst: 10.0, sse: 4.0 }, 3, 3).expect("k >= 2");
    assert_eq!(ch, f64::INFINITY);
}

#[test]
fn test_ch_is_never_nan() {
    for (sst, sse, n, k) in [(0.0, 0.0, 2, 2), (1.0, 1.0, 3, 2), (2.0, 0.0, 2, 2), (0.0, 0.0, 10, 3)] {
        let ch = calinski_harabasz(SumOfSquares { sst, sse }, n, k).expect("k >= 2");
        assert!(!ch.is_nan(), "sst={sst} sse={sse} n={n} k={k}");
    }
}

#[test]
fn test_sum_of_squares_empty_matrix() {
    let p = Partition::new(vec![], 1).expect("valid labels");
    let ss = sum_of_squares(&Matrix::zeros(0, 3), &p).expect("matching shapes");
    assert_eq!(ss, SumOfSquares { sst: 0.0, sse: 0.0 });
}

#[test]
fn test_sum_of_squares_rejects_short_partition() {
    let p = Partition::new(vec![0, 1], 2).expect("valid labels");
    assert!(sum_of_squares(&reference(), &p).is_err());
}
