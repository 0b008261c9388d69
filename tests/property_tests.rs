//! Property-based tests using proptest.
//!
//! These check the decomposition invariants across random nonnegative
//! tables and random partitions.

use entropymax::prelude::*;
use proptest::prelude::*;

/// Nonnegative `rows x cols` tables with some exact zeros.
fn table_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Matrix<f64>> {
    proptest::collection::vec(prop_oneof![1 => Just(0.0), 4 => 0.0f64..100.0], rows * cols)
        .prop_map(move |data| Matrix::from_vec(rows, cols, data).expect("Test data should be valid"))
}

/// A table with a labelling into at most `k` groups.
fn case_strategy(k: usize) -> impl Strategy<Value = (Matrix<f64>, Vec<usize>)> {
    (2usize..12, 1usize..6).prop_flat_map(move |(n, m)| {
        (
            table_strategy(n, m),
            proptest::collection::vec(0..k, n),
        )
    })
}

fn metrics(raw: &Matrix<f64>, labels: Vec<usize>, k: usize) -> MetricsRecord {
    let partition = Partition::new(labels, k).expect("labels below k");
    compute_metrics(&normalize(raw), &partition).expect("matching shapes")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn tineq_is_non_negative((raw, labels) in case_strategy(3)) {
        let r = metrics(&raw, labels, 3);
        prop_assert!(r.tineq >= -1e-9, "tineq = {}", r.tineq);
    }

    #[test]
    fn bineq_bounded_by_tineq((raw, labels) in case_strategy(4)) {
        let r = metrics(&raw, labels, 4);
        let slack = 1e-9 * r.tineq.abs().max(1.0);
        prop_assert!(r.bineq >= -slack, "bineq = {}", r.bineq);
        prop_assert!(r.bineq <= r.tineq + slack, "bineq {} > tineq {}", r.bineq, r.tineq);
    }

    #[test]
    fn rs_is_a_percentage((raw, labels) in case_strategy(3)) {
        let r = metrics(&raw, labels, 3);
        if r.tineq > 1e-6 {
            prop_assert!((-1e-4..=100.0 + 1e-4).contains(&r.rs), "rs = {}", r.rs);
        } else if r.tineq == 0.0 {
            prop_assert_eq!(r.rs, 0.0);
        }
    }

    #[test]
    fn sse_never_exceeds_sst((raw, labels) in case_strategy(3)) {
        let r = metrics(&raw, labels, 3);
        prop_assert!(r.sse <= r.sst + 1e-9 * r.sst.max(1.0));
        prop_assert!(!r.ch.is_nan());
    }

    #[test]
    fn singletons_separate_perfectly(raw in (2usize..10, 1usize..5).prop_flat_map(|(n, m)| table_strategy(n, m))) {
        let n = raw.n_rows();
        let r = compute_metrics(&normalize(&raw), &Partition::singletons(n)).expect("matching shapes");
        prop_assert_eq!(r.sse, 0.0);
        prop_assert_eq!(r.ch, f64::INFINITY);
    }

    #[test]
    fn single_group_explains_nothing((raw, _labels) in case_strategy(1)) {
        let n = raw.n_rows();
        let r = metrics(&raw, vec![0; n], 1);
        prop_assert!(r.bineq.abs() < 1e-9);
        prop_assert!(r.rs.abs() < 1e-9);
        let expected = if n > 1 && r.sse == 0.0 { f64::INFINITY } else { 0.0 };
        prop_assert_eq!(r.ch, expected);
    }

    #[test]
    fn metrics_ignore_overall_scale((raw, labels) in case_strategy(3), scale in 0.01f64..1000.0) {
        let scaled = raw.map(|v| v * scale);
        let a = metrics(&raw, labels.clone(), 3);
        let b = metrics(&scaled, labels, 3);
        let tol = Tolerance::uniform(1e-6);
        for metric in MetricName::ALL {
            prop_assert!(tol.approx_eq(a.get(metric), b.get(metric)),
                "{metric}: {} vs {}", a.get(metric), b.get(metric));
        }
    }

    #[test]
    fn metrics_ignore_row_order((raw, labels) in case_strategy(3)) {
        let n = raw.n_rows();
        let rows: Vec<Vec<f64>> = (0..n).rev().map(|i| raw.row(i).to_vec()).collect();
        let reversed = Matrix::from_rows(&rows).expect("rectangular rows");
        let reversed_labels: Vec<usize> = labels.iter().rev().copied().collect();
        let a = metrics(&raw, labels, 3);
        let b = metrics(&reversed, reversed_labels, 3);
        let tol = Tolerance::uniform(1e-8);
        for metric in MetricName::ALL {
            prop_assert!(tol.approx_eq(a.get(metric), b.get(metric)),
                "{metric}: {} vs {}", a.get(metric), b.get(metric));
        }
    }

    #[test]
    fn zero_table_normalizes_to_zero(n in 1usize..8, m in 1usize..5) {
        let z = normalize(&Matrix::zeros(n, m));
        prop_assert!(z.as_slice().iter().all(|v| *v == 0.0));
        let r = compute_metrics(&z, &Partition::singletons(n)).expect("matching shapes");
        prop_assert_eq!(r.tineq, 0.0);
        prop_assert_eq!(r.rs, 0.0);
    }
}
