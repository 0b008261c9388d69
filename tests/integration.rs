//! Integration tests for EntropyMax.
//!
//! End-to-end runs over files on disk: read the raw table and the reported
//! pages, recompute, compare.

use entropymax::prelude::*;
use entropymax::validation::KOutcome;
use std::io::Write;
use tempfile::NamedTempFile;

const RAW: &str = "Sample Name,0.063,0.125,0.25\n\
A,10,5,5\n\
B,5,10,5\n\
C,20,5,15\n\
D,5,15,0\n";

const HEADER: &str = "K,Group,Sample,0.063,0.125,0.25,% explained,Total inequality,\
Between region inequality,Total sum of squares,Within group sum of squares,\
Calinski-Harabasz pseudo-F statistic,latitude,longitude";

const TINEQ: &str = "31.243250377434478";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn page_rows(k: usize, groups: [usize; 4], metrics: &str) -> String {
    ["A", "B", "C", "D"]
        .iter()
        .zip(groups)
        .map(|(s, g)| format!("{k},{g},{s},0,0,0,{metrics},-33.9,151.2\n"))
        .collect()
}

fn reference_pages() -> String {
    let mut out = format!("{HEADER}\n");
    out.push_str(&page_rows(1, [1, 1, 1, 1], &format!("0,{TINEQ},0,337.5,337.5,0")));
    out.push_str(&page_rows(
        2,
        [1, 1, 2, 2],
        &format!("9.812968316031006,{TINEQ},3.0658902604358826,337.5,300,0.25"),
    ));
    out.push_str(&page_rows(
        4,
        [1, 2, 3, 4],
        &format!("100,{TINEQ},{TINEQ},337.5,0,inf"),
    ));
    out
}

fn run(raw: &str, pages: &str, config: ValidationConfig) -> Verdict {
    let raw = write_temp(raw);
    let pages = write_temp(pages);
    let table = read_composition_path(raw.path()).expect("valid composition file");
    let pages = read_pages_path(pages.path()).expect("valid pages file");
    Validator::new(config)
        .validate(&table, &pages)
        .expect("structurally valid")
}

fn computed(outcome: Option<&KOutcome>) -> MetricsRecord {
    outcome
        .and_then(|o| o.computed)
        .expect("metrics were computed")
}

#[test]
fn test_reference_pages_validate() {
    let verdict = run(RAW, &reference_pages(), ValidationConfig::default());
    assert!(verdict.passed(), "{:?}", verdict.discrepancies);
    assert_eq!(verdict.checked_k, [1, 2, 4]);
}

#[test]
fn test_reference_values_to_1e9() {
    let verdict = run(RAW, &reference_pages(), ValidationConfig::default());
    let k2 = computed(verdict.outcome(2));
    assert!((k2.tineq - 31.243_250_377_434_478).abs() < 1e-9);
    assert!((k2.bineq - 3.065_890_260_435_882_6).abs() < 1e-9);
    assert!((k2.rs - 9.812_968_316_031_006).abs() < 1e-9);
    assert!((k2.sst - 337.5).abs() < 1e-9);
    assert!((k2.sse - 300.0).abs() < 1e-9);
    assert!((k2.ch - 0.25).abs() < 1e-9);
}

#[test]
fn test_singleton_and_single_group_boundaries() {
    let verdict = run(RAW, &reference_pages(), ValidationConfig::default());
    let k4 = computed(verdict.outcome(4));
    assert_eq!(k4.sse, 0.0);
    assert_eq!(k4.ch, f64::INFINITY);
    let k1 = computed(verdict.outcome(1));
    assert_eq!(k1.bineq, 0.0);
    assert_eq!(k1.rs, 0.0);
    assert_eq!(k1.ch, 0.0);
}

#[test]
fn test_single_k_filter() {
    let verdict = run(
        RAW,
        &reference_pages(),
        ValidationConfig::default().with_k(Some(2)),
    );
    assert_eq!(verdict.checked_k, [2]);
    assert!(verdict.passed());
}

#[test]
fn test_mismatch_isolated_to_one_k() {
    let pages = reference_pages().replace(",300,0.25,", ",300,0.35,");
    let verdict = run(RAW, &pages, ValidationConfig::default());
    assert_eq!(verdict.discrepancies.len(), 1);
    let d = &verdict.discrepancies[0];
    assert_eq!(d.k(), 2);
    assert!(matches!(
        d,
        Discrepancy::MetricMismatch {
            metric: MetricName::CalinskiHarabasz,
            ..
        }
    ));
    assert!(verdict.outcome(1).expect("K=1").passed());
    assert!(verdict.outcome(4).expect("K=4").passed());
}

#[test]
fn test_duplicate_sample_names_in_file_order() {
    let raw = "Sample,1,2\nS,10,0\nS,0,10\nT,10,0\nT,0,10\n";
    let pages = "K,Group,Sample,1,2,% explained,Total inequality,Between region inequality,\
Total sum of squares,Within group sum of squares,Calinski-Harabasz pseudo-F statistic\n\
2,1,S,,,100,100,100,1250,0,inf\n\
2,2,S,,,100,100,100,1250,0,inf\n\
2,1,T,,,100,100,100,1250,0,inf\n\
2,2,T,,,100,100,100,1250,0,inf\n";
    let verdict = run(raw, pages, ValidationConfig::default());
    assert!(verdict.passed(), "{:?}", verdict.discrepancies);
}

#[test]
fn test_exhausted_name_does_not_stop_other_pages() {
    let mut pages = reference_pages();
    pages.push_str(&page_rows(3, [1, 2, 3, 3], "1,1,1,1,1,1").replace(",D,", ",A,"));
    let verdict = run(RAW, &pages, ValidationConfig::default());
    assert_eq!(verdict.checked_k, [1, 2, 3, 4]);
    let bad = verdict.outcome(3).expect("K=3");
    assert!(bad.computed.is_none());
    assert!(matches!(
        bad.discrepancies[..],
        [Discrepancy::MissingAssignment { k: 3, .. }]
    ));
    assert_eq!(verdict.discrepancies.len(), 1);
}

#[test]
fn test_zero_table_degenerates_cleanly() {
    let raw = "Sample,1,2\nA,0,0\nB,,0\n";
    let pages = "K,Group,Sample,% explained,Total inequality,Between region inequality,\
Total sum of squares,Within group sum of squares,Calinski-Harabasz pseudo-F statistic\n\
2,1,A,0,0,0,0,0,inf\n\
2,2,B,0,0,0,0,0,inf\n";
    let verdict = run(raw, pages, ValidationConfig::default());
    assert!(verdict.passed(), "{:?}", verdict.discrepancies);
}

#[test]
fn test_malformed_raw_aborts() {
    let raw = write_temp("Sample,0.1,oops\nA,1,2\n");
    let err = read_composition_path(raw.path()).expect_err("bad bin header");
    assert!(err.is_input_error());
}
