use super::*;

fn raw() -> Matrix<f64> {
    Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 0.0, 10.0]).expect("valid matrix dimensions")
}

#[test]
fn test_normalize_sums_to_hundred() {
    let pct = normalize(&raw());
    assert!((pct.sum() - 100.0).abs() < 1e-12);
    assert!((pct.get(1, 2) - 50.0).abs() < 1e-12);
}

#[test]
fn test_normalize_zero_total_is_zero_matrix() {
    let pct = normalize(&Matrix::zeros(3, 2));
    assert_eq!(pct.shape(), (3, 2));
    assert!(pct.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn test_normalize_is_pure() {
    let data = raw();
    let before = data.clone();
    let _ = normalize(&data);
    assert_eq!(data, before);
    assert_eq!(normalize(&data), normalize(&data));
}

#[test]
fn test_grand_total_percent_matches_free_function() {
    let data = raw();
    let mut scaler = GrandTotalPercent::new();
    assert!(!scaler.is_fitted());
    let out = scaler.fit_transform(&data).expect("fit_transform should succeed");
    assert_eq!(scaler.grand_total(), Some(20.0));
    assert_eq!(out, normalize(&data));
}

#[test]
fn test_grand_total_percent_requires_fit() {
    assert!(GrandTotalPercent::new().transform(&raw()).is_err());
}

#[test]
fn test_row_proportion_rows_sum_to_hundred() {
    let out = RowProportion::new().fit_transform(&raw()).expect("fit_transform should succeed");
    for total in out.row_sums() {
        assert!((total - 100.0).abs() < 1e-12);
    }
}

#[test]
fn test_row_proportion_zero_row_stays_zero() {
    let data = Matrix::from_vec(2, 2, vec![0.0, 0.0, 1.0, 3.0]).expect("valid matrix dimensions");
    let out = RowProportion::new().fit_transform(&data).expect("fit_transform should succeed");
    assert_eq!(out.row(0), &[0.0, 0.0]);
    assert!((out.get(1, 1) - 75.0).abs() < 1e-12);
}

#[test]
fn test_row_proportion_checks_width() {
    let mut scaler = RowProportion::new();
    scaler.fit(&raw()).expect("fit should succeed");
    let narrow = Matrix::zeros(1, 2);
    assert!(scaler.transform(&narrow).is_err());
}

#[test]
fn test_normalization_none_is_identity() {
    let data = raw();
    assert_eq!(Normalization::None.apply(&data).expect("apply"), data);
    assert_eq!(Normalization::default(), Normalization::GrandTotal);
}
