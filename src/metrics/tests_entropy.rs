// =========================================================================
// Inequality decomposition: hand-computed values and invariants.
//
// Reference matrix (grand total 100, so grand-total percent leaves it as is):
//
//          bin0  bin1  bin2
//   A       10     5     5
//   B        5    10     5
//   C       20     5    15
//   D        5    15     0
//
// Y = [40, 35, 25], N = 4. Because Y[j]·(v/Y[j]) = v, each bin's term
// reduces to Σ_i v · log2(N·v / Y[j]).
// =========================================================================

use super::*;
use proptest::prelude::*;

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

fn expected_tineq() -> f64 {
    let bin0 = 10.0 * 1.0_f64.log2() + 5.0 * 0.5_f64.log2() + 20.0 * 2.0_f64.log2() + 5.0 * 0.5_f64.log2();
    let bin1 = 5.0 * (20.0_f64 / 35.0).log2()
        + 10.0 * (40.0_f64 / 35.0).log2()
        + 5.0 * (20.0_f64 / 35.0).log2()
        + 15.0 * (60.0_f64 / 35.0).log2();
    let bin2 = 5.0 * (20.0_f64 / 25.0).log2() + 5.0 * (20.0_f64 / 25.0).log2() + 15.0 * (60.0_f64 / 25.0).log2();
    bin0 + bin1 + bin2
}

// Groups {A, B} and {C, D}: N / nr = 2, so each group term is
// S · log2(2·S / Y[j]) with S the group's bin sum.
fn expected_bineq() -> f64 {
    let bin0 = 15.0 * (30.0_f64 / 40.0).log2() + 25.0 * (50.0_f64 / 40.0).log2();
    let bin1 = 15.0 * (30.0_f64 / 35.0).log2() + 20.0 * (40.0_f64 / 35.0).log2();
    let bin2 = 10.0 * (20.0_f64 / 25.0).log2() + 15.0 * (30.0_f64 / 25.0).log2();
    bin0 + bin1 + bin2
}

#[test]
fn test_total_inequality_reference() {
    let total = total_inequality(&reference());
    assert_eq!(total.column_totals, vec![40.0, 35.0, 25.0]);
    assert!((total.tineq - expected_tineq()).abs() < 1e-9, "tineq={}", total.tineq);
}

#[test]
fn test_between_inequality_reference() {
    let data = reference();
    let total = total_inequality(&data);
    let p = Partition::new(vec![0, 0, 1, 1], 2).expect("valid labels");
    let bineq = between_inequality(&data, &total.column_totals, &p).expect("matching shapes");
    assert!((bineq - expected_bineq()).abs() < 1e-9, "bineq={bineq}");
    let rs = percent_explained(total.tineq, bineq);
    assert!((rs - 100.0 * expected_bineq() / expected_tineq()).abs() < 1e-9);
}

#[test]
fn test_zero_cells_never_hit_log_of_zero() {
    let data = Matrix::from_vec(3, 2, vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0]).expect("valid matrix dimensions");
    let total = total_inequality(&data);
    assert!(total.tineq.is_finite());
    // bin1 all in one sample of three: 10 · log2(3)
    assert!((total.tineq - 10.0 * 3.0_f64.log2()).abs() < 1e-12);
}

#[test]
fn test_uniform_mass_has_zero_inequality() {
    let data = Matrix::from_vec(3, 2, vec![2.0, 7.0, 2.0, 7.0, 2.0, 7.0]).expect("valid matrix dimensions");
    assert!(total_inequality(&data).tineq.abs() < 1e-12);
}

#[test]
fn test_single_group_explains_nothing() {
    let data = reference();
    let total = total_inequality(&data);
    let p = Partition::new(vec![0; 4], 1).expect("valid labels");
    let bineq = between_inequality(&data, &total.column_totals, &p).expect("matching shapes");
    assert!(bineq.abs() < 1e-12);
    assert!(percent_explained(total.tineq, bineq).abs() < 1e-10);
}

#[test]
fn test_singletons_explain_everything() {
    let data = reference();
    let total = total_inequality(&data);
    let p = Partition::singletons(4);
    let bineq = between_inequality(&data, &total.column_totals, &p).expect("matching shapes");
    assert!((bineq - total.tineq).abs() < 1e-9);
}

#[test]
fn test_empty_group_is_skipped() {
    let data = reference();
    let total = total_inequality(&data);
    let with_gap = Partition::new(vec![0, 0, 2, 2], 3).expect("valid labels");
    let compact = Partition::new(vec![0, 0, 1, 1], 2).expect("valid labels");
    let a = between_inequality(&data, &total.column_totals, &with_gap).expect("matching shapes");
    let b = between_inequality(&data, &total.column_totals, &compact).expect("matching shapes");
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn test_between_inequality_rejects_short_partition() {
    let data = reference();
    let total = total_inequality(&data);
    let p = Partition::new(vec![0, 1], 2).expect("valid labels");
    assert!(between_inequality(&data, &total.column_totals, &p).is_err());
    let full = Partition::new(vec![0, 1, 0, 1], 2).expect("valid labels");
    assert!(between_inequality(&data, &[1.0], &full).is_err());
}

#[test]
fn test_percent_explained_zero_tineq_policy() {
    assert_eq!(percent_explained(0.0, 0.0), 0.0);
    assert_eq!(percent_explained(0.0, 5.0), 0.0);
    assert!((percent_explained(20.0, 5.0) - 25.0).abs() < 1e-12);
}

#[test]
fn test_degenerate_matrix_has_no_inequality() {
    let data = crate::preprocessing::normalize(&Matrix::zeros(3, 4));
    let total = total_inequality(&data);
    assert_eq!(total.tineq, 0.0);
    let p = Partition::new(vec![0, 1, 1], 2).expect("valid labels");
    let bineq = between_inequality(&data, &total.column_totals, &p).expect("matching shapes");
    assert_eq!(bineq, 0.0);
    assert_eq!(percent_explained(total.tineq, bineq), 0.0);
}

fn matrix_and_labels() -> impl Strategy<Value = (Matrix<f64>, Vec<usize>, usize)> {
    (2..=8usize, 1..=5usize, 1..=4usize).prop_flat_map(|(n, m, k)| {
        (
            proptest::collection::vec(prop_oneof![Just(0.0), 0.0f64..50.0], n * m),
            proptest::collection::vec(0..k, n),
        )
            .prop_map(move |(cells, labels)| {
                let data = Matrix::from_vec(n, m, cells).expect("n * m cells");
                (data, labels, k)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_total_inequality_nonnegative((data, _, _) in matrix_and_labels()) {
        let tineq = total_inequality(&data).tineq;
        prop_assert!(tineq >= -1e-9, "tineq={}", tineq);
    }

    #[test]
    fn prop_between_bounded_by_total((data, labels, k) in matrix_and_labels()) {
        let total = total_inequality(&data);
        let p = Partition::new(labels, k).expect("labels drawn below k");
        let bineq = between_inequality(&data, &total.column_totals, &p).expect("matching shapes");
        let slack = 1e-9 * total.tineq.max(1.0);
        prop_assert!(bineq >= -slack, "bineq={}", bineq);
        prop_assert!(bineq <= total.tineq + slack, "bineq={} tineq={}", bineq, total.tineq);
    }

    #[test]
    fn prop_percent_explained_in_range((data, labels, k) in matrix_and_labels()) {
        let total = total_inequality(&data);
        let p = Partition::new(labels, k).expect("labels drawn below k");
        let bineq = between_inequality(&data, &total.column_totals, &p).expect("matching shapes");
        let rs = percent_explained(total.tineq, bineq);
        if total.tineq > 1e-3 {
            prop_assert!((-1e-4..=100.0 + 1e-4).contains(&rs), "rs={}", rs);
        }
    }
}
