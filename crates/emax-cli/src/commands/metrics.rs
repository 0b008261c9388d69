//! Metrics command implementation
//!
//! Prints recomputed metrics for each page, optionally with per-group
//! profiles. Nothing is compared.

use super::load;
use crate::error::{CliError, Result};
use crate::output;
use entropymax::data::CompositionTable;
use entropymax::format::Page;
use entropymax::metrics::{compute_metrics, MetricName, MetricsRecord};
use entropymax::partition::Partition;
use entropymax::preprocessing::Normalization;
use entropymax::primitives::Matrix;
use entropymax::stats::{group_profiles, GroupProfile};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Serialize)]
struct PageMetrics {
    k: usize,
    metrics: Option<MetricsRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupProfile>,
}

/// Run the metrics command
pub(crate) fn run(
    input: &Path,
    output_path: &Path,
    k: Option<usize>,
    normalization: Normalization,
    groups: bool,
    json: bool,
) -> Result<()> {
    let (table, pages) = load(input, output_path)?;
    let data = normalization.apply(table.matrix())?;

    let results = pages
        .iter()
        .filter(|p| k.map_or(true, |k| p.k == k))
        .map(|page| page_metrics(&table, &data, page, groups))
        .collect::<Result<Vec<_>>>()?;
    if results.is_empty() {
        return Err(CliError::InvalidFormat(match k {
            Some(k) => format!("no page for K={k}"),
            None => "no K pages found".to_string(),
        }));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    for result in &results {
        print_page(result, &table);
    }
    Ok(())
}

fn page_metrics(
    table: &CompositionTable,
    data: &Matrix<f64>,
    page: &Page,
    groups: bool,
) -> Result<PageMetrics> {
    let partition =
        match Partition::from_assignments(&table.sample_index(), &page.assignments, page.k) {
            Ok(p) => p,
            Err(gap) => {
                warn!(k = page.k, "{gap}");
                return Ok(PageMetrics {
                    k: page.k,
                    metrics: None,
                    error: Some(gap.to_string()),
                    groups: Vec::new(),
                });
            }
        };
    Ok(PageMetrics {
        k: page.k,
        metrics: Some(compute_metrics(data, &partition)?),
        error: None,
        groups: if groups {
            group_profiles(data, &partition)?
        } else {
            Vec::new()
        },
    })
}

fn print_page(result: &PageMetrics, table: &CompositionTable) {
    output::section(&format!("K = {}", result.k));
    let Some(metrics) = &result.metrics else {
        output::fail(result.error.as_deref().unwrap_or("partition could not be rebuilt"));
        return;
    };
    for metric in MetricName::ALL {
        output::kv(metric.header(), output::format_metric(metrics.get(metric)));
    }
    for profile in &result.groups {
        output::info(&format!("group {} (n = {})", profile.group + 1, profile.size));
        for ((bin, mean), z) in table
            .bin_labels()
            .iter()
            .zip(&profile.means)
            .zip(&profile.z_scores)
        {
            println!("    {:>10}  mean {:>10.4}  z {:>8.3}", bin.raw, mean, z);
        }
    }
}
