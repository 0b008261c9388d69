//! Recompute-and-compare checking of reported partition pages.
//!
//! The [`Validator`] never corrects anything. For each reported K it
//! rebuilds the partition, recomputes the six metrics on the shared
//! normalized matrix, and records every disagreement as a [`Discrepancy`].
//! Only structural failures (a table that cannot be normalized, a
//! partition whose shape does not match the table) abort the run.
//!
//! # Examples
//!
//! ```
//! use entropymax::format::{read_composition, read_pages};
//! use entropymax::validation::{ValidationConfig, Validator};
//!
//! let raw = "Sample,1,2,3\nA,10,0,0\nB,0,10,0\nC,10,0,0\nD,0,10,0\n";
//! let out = "K,Group,Sample,1,2,3,% explained,Total inequality,Between region inequality,\
//! Total sum of squares,Within group sum of squares,Calinski-Harabasz pseudo-F statistic\n\
//! 2,1,A,,,,100,100,100,1250,0,inf\n2,2,B,,,,100,100,100,1250,0,inf\n\
//! 2,1,C,,,,100,100,100,1250,0,inf\n2,2,D,,,,100,100,100,1250,0,inf\n";
//!
//! let table = read_composition(raw.as_bytes()).unwrap();
//! let pages = read_pages(out.as_bytes()).unwrap();
//! let verdict = Validator::new(ValidationConfig::default()).validate(&table, &pages).unwrap();
//! assert!(verdict.passed());
//! assert_eq!(verdict.checked_k, vec![2]);
//! ```

use crate::data::{CompositionTable, SampleIndex};
use crate::error::Result;
use crate::format::json;
use crate::format::{Page, PageSet};
use crate::metrics::{compute_metrics, MetricName, MetricsRecord};
use crate::partition::{AssignmentGap, Partition};
use crate::preprocessing::Normalization;
use crate::primitives::Matrix;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Default absolute and relative tolerance.
pub const DEFAULT_EPS: f64 = 1e-6;

/// Combined absolute/relative comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Absolute bound on `|a - b|`.
    pub abs_eps: f64,
    /// Bound on `|a - b| / max(1, |a|, |b|)`.
    pub rel_eps: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::uniform(DEFAULT_EPS)
    }
}

impl Tolerance {
    /// Separate absolute and relative bounds.
    #[must_use]
    pub fn new(abs_eps: f64, rel_eps: f64) -> Self {
        Self { abs_eps, rel_eps }
    }

    /// The same bound for both tests.
    #[must_use]
    pub fn uniform(eps: f64) -> Self {
        Self::new(eps, eps)
    }

    /// True when `a` and `b` agree under either bound.
    ///
    /// Infinite and NaN values only match by exact equality, so `+inf`
    /// matches `+inf` and NaN never matches anything.
    ///
    /// ```
    /// use entropymax::validation::Tolerance;
    ///
    /// let tol = Tolerance::uniform(1e-6);
    /// assert!(tol.approx_eq(1.0, 1.0000005));
    /// assert!(!tol.approx_eq(1.0, 1.1));
    /// assert!(tol.approx_eq(f64::INFINITY, f64::INFINITY));
    /// ```
    #[must_use]
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        if !a.is_finite() || !b.is_finite() {
            return a == b;
        }
        let diff = (a - b).abs();
        if diff <= self.abs_eps {
            return true;
        }
        diff / 1.0_f64.max(a.abs()).max(b.abs()) <= self.rel_eps
    }
}

/// One per-K problem found while validating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discrepancy {
    /// The page could not be mapped onto the table's rows.
    MissingAssignment {
        /// Page K
        k: usize,
        /// What went wrong
        gap: AssignmentGap,
    },
    /// No row of the page carried parsable metrics.
    MissingReportedMetrics {
        /// Page K
        k: usize,
    },
    /// A recomputed metric disagrees with the reported one.
    MetricMismatch {
        /// Page K
        k: usize,
        /// Which metric
        metric: MetricName,
        /// Value computed here
        #[serde(with = "json::float")]
        computed: f64,
        /// Value found in the page
        #[serde(with = "json::float")]
        reported: f64,
    },
}

impl Discrepancy {
    /// K of the page this belongs to.
    #[must_use]
    pub fn k(&self) -> usize {
        match self {
            Discrepancy::MissingAssignment { k, .. }
            | Discrepancy::MissingReportedMetrics { k }
            | Discrepancy::MetricMismatch { k, .. } => *k,
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::MissingAssignment { k, gap } => write!(f, "[K={k}] {gap}"),
            Discrepancy::MissingReportedMetrics { k } => {
                write!(f, "[K={k}] no reported metrics found")
            }
            Discrepancy::MetricMismatch {
                k,
                metric,
                computed,
                reported,
            } => write!(
                f,
                "[K={k}] {metric} mismatch: computed={computed:.9}, reported={reported:.9}"
            ),
        }
    }
}

/// Result of checking one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KOutcome {
    /// Page K
    pub k: usize,
    /// Recomputed metrics, absent when the partition could not be rebuilt.
    pub computed: Option<MetricsRecord>,
    /// Metrics as reported in the page.
    pub reported: Option<MetricsRecord>,
    /// Problems found on this page.
    pub discrepancies: Vec<Discrepancy>,
}

impl KOutcome {
    /// True when the page produced no discrepancy.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Aggregate over every checked K, in ascending K order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// The K values that were checked.
    pub checked_k: Vec<usize>,
    /// Per-K results.
    pub outcomes: Vec<KOutcome>,
    /// Every discrepancy across all K.
    pub discrepancies: Vec<Discrepancy>,
}

impl Verdict {
    fn from_outcomes(mut outcomes: Vec<KOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.k);
        Self {
            checked_k: outcomes.iter().map(|o| o.k).collect(),
            discrepancies: outcomes
                .iter()
                .flat_map(|o| o.discrepancies.iter().cloned())
                .collect(),
            outcomes,
        }
    }

    /// True when no discrepancy was recorded. A verdict over zero pages
    /// passes.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.discrepancies.is_empty()
    }

    /// Outcome for one K.
    #[must_use]
    pub fn outcome(&self, k: usize) -> Option<&KOutcome> {
        self.outcomes.iter().find(|o| o.k == k)
    }
}

/// Settings for a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Comparison bounds.
    pub tolerance: Tolerance,
    /// Check only this K.
    pub k: Option<usize>,
    /// Preprocessing applied before computing metrics.
    pub normalization: Normalization,
}

impl ValidationConfig {
    /// Sets the comparison bounds.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Restricts the run to a single K.
    #[must_use]
    pub fn with_k(mut self, k: Option<usize>) -> Self {
        self.k = k;
        self
    }

    /// Sets the preprocessing mode.
    #[must_use]
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }
}

/// Checks reported pages against recomputed metrics.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Creates a validator.
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates every selected page of `pages` against `table`.
    ///
    /// The table is normalized once and shared read-only by every page.
    ///
    /// # Errors
    ///
    /// Returns an error only for structural failures; per-K problems are
    /// collected into the verdict.
    pub fn validate(&self, table: &CompositionTable, pages: &PageSet) -> Result<Verdict> {
        let data = self.config.normalization.apply(table.matrix())?;
        let index = table.sample_index();

        let selected: Vec<&Page> = pages
            .iter()
            .filter(|p| self.config.k.map_or(true, |k| p.k == k))
            .collect();
        if let Some(k) = self.config.k {
            if selected.is_empty() {
                warn!(k, "requested K not present in pages");
            }
        }
        debug!(pages = selected.len(), normalization = ?self.config.normalization, "validating");

        #[cfg(feature = "parallel")]
        let outcomes: Result<Vec<KOutcome>> = selected
            .par_iter()
            .map(|page| self.evaluate(&data, &index, page))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Result<Vec<KOutcome>> = selected
            .iter()
            .map(|page| self.evaluate(&data, &index, page))
            .collect();

        let verdict = Verdict::from_outcomes(outcomes?);
        info!(
            checked = verdict.checked_k.len(),
            discrepancies = verdict.discrepancies.len(),
            "validation finished"
        );
        Ok(verdict)
    }

    /// Evaluates one page. Consumes a fresh cursor over `index`.
    fn evaluate(&self, data: &Matrix<f64>, index: &SampleIndex, page: &Page) -> Result<KOutcome> {
        let k = page.k;
        debug!(k, rows = page.assignments.len(), "evaluating page");

        let partition = match Partition::from_assignments(index, &page.assignments, k) {
            Ok(p) => p,
            Err(gap) => {
                let d = Discrepancy::MissingAssignment { k, gap };
                debug!("{d}");
                return Ok(KOutcome {
                    k,
                    computed: None,
                    reported: page.reported,
                    discrepancies: vec![d],
                });
            }
        };

        let computed = compute_metrics(data, &partition)?;
        let discrepancies = match page.reported {
            None => vec![Discrepancy::MissingReportedMetrics { k }],
            Some(reported) => compare(k, &computed, &reported, &self.config.tolerance),
        };
        for d in &discrepancies {
            debug!("{d}");
        }

        Ok(KOutcome {
            k,
            computed: Some(computed),
            reported: page.reported,
            discrepancies,
        })
    }
}

/// Compares all six metrics, in report order.
fn compare(
    k: usize,
    computed: &MetricsRecord,
    reported: &MetricsRecord,
    tolerance: &Tolerance,
) -> Vec<Discrepancy> {
    MetricName::ALL
        .into_iter()
        .filter_map(|metric| {
            let (c, r) = (computed.get(metric), reported.get(metric));
            (!tolerance.approx_eq(c, r)).then_some(Discrepancy::MetricMismatch {
                k,
                metric,
                computed: c,
                reported: r,
            })
        })
        .collect()
}
