use super::*;
use crate::preprocessing::normalize;

fn separated() -> Matrix<f64> {
    normalize(
        &Matrix::from_vec(
            4,
            3,
            vec![
                10.0, 0.0, 0.0, //
                0.0, 10.0, 0.0, //
                10.0, 0.0, 0.0, //
                0.0, 10.0, 0.0,
            ],
        )
        .expect("valid matrix dimensions"),
    )
}

#[test]
fn test_perfect_separation() {
    let p = Partition::new(vec![0, 1, 0, 1], 2).expect("valid labels");
    let record = compute_metrics(&separated(), &p).expect("matching shapes");
    assert!((record.bineq - record.tineq).abs() < 1e-9);
    assert!((record.rs - 100.0).abs() < 1e-9);
    assert_eq!(record.sse, 0.0);
    assert_eq!(record.ch, f64::INFINITY);
}

#[test]
fn test_reference_round_trip() {
    let data = Matrix::from_vec(
        4,
        3,
        vec![
            10.0, 5.0, 5.0, //
            5.0, 10.0, 5.0, //
            20.0, 5.0, 15.0, //
            5.0, 15.0, 0.0,
        ],
    )
    .expect("valid matrix dimensions");
    let p = Partition::new(vec![0, 0, 1, 1], 2).expect("valid labels");
    let record = compute_metrics(&normalize(&data), &p).expect("matching shapes");
    assert!((record.tineq - 31.243_250_377_434_478).abs() < 1e-9);
    assert!((record.bineq - 3.065_890_260_435_882_6).abs() < 1e-9);
    assert!((record.rs - 9.812_968_316_031_006).abs() < 1e-9);
    assert!((record.sst - 337.5).abs() < 1e-9);
    assert!((record.sse - 300.0).abs() < 1e-9);
    assert!((record.ch - 0.25).abs() < 1e-9);
}

#[test]
fn test_single_group_records_zero_ch() {
    let p = Partition::new(vec![0; 4], 1).expect("valid labels");
    let record = compute_metrics(&separated(), &p).expect("matching shapes");
    assert!(record.bineq.abs() < 1e-12);
    assert!(record.rs.abs() < 1e-10);
    assert_eq!(record.ch, 0.0);
}

#[test]
fn test_single_group_of_identical_rows_has_infinite_ch() {
    let raw = Matrix::from_vec(4, 2, [2.5, 3.75].repeat(4)).expect("shape");
    let data = normalize(&raw);
    let p = Partition::new(vec![0; 4], 1).expect("valid labels");
    let record = compute_metrics(&data, &p).expect("matching shapes");
    assert_eq!(record.sse, 0.0);
    assert_eq!(record.ch, f64::INFINITY);
}

#[test]
fn test_degenerate_matrix_record() {
    let data = normalize(&Matrix::zeros(3, 2));
    let p = Partition::new(vec![0, 1, 1], 2).expect("valid labels");
    let record = compute_metrics(&data, &p).expect("matching shapes");
    assert_eq!(record.tineq, 0.0);
    assert_eq!(record.rs, 0.0);
}

#[test]
fn test_record_get_follows_report_order() {
    let record = MetricsRecord::from_ordered([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let values: Vec<f64> = MetricName::ALL.iter().map(|&m| record.get(m)).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(record.rs, 1.0);
    assert_eq!(record.ch, 6.0);
}

#[test]
fn test_metric_headers_round_trip() {
    for metric in MetricName::ALL {
        assert_eq!(MetricName::from_header(metric.header()), Some(metric));
    }
    assert_eq!(MetricName::from_header(" % explained "), Some(MetricName::PercentExplained));
    assert_eq!(MetricName::from_header("latitude"), None);
}

#[test]
fn test_record_json_keeps_infinity() {
    let record = MetricsRecord::from_ordered([100.0, 1.0, 1.0, 2.0, 0.0, f64::INFINITY]);
    let json = serde_json::to_string(&record).expect("serializable");
    assert!(json.contains("\"ch\":\"inf\""), "{json}");
    let back: MetricsRecord = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back.ch, f64::INFINITY);
}
