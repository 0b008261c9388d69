//! Validate command implementation
//!
//! Recomputes every selected K page and compares the six metrics against
//! the reported values. Discrepancies are always itemized on stderr.

use super::load;
use crate::error::{CliError, Result};
use crate::output;
use entropymax::metrics::MetricName;
use entropymax::validation::{KOutcome, ValidationConfig, Validator, Verdict};
use std::path::Path;

/// Run the validate command
pub(crate) fn run(
    input: &Path,
    output_path: &Path,
    config: ValidationConfig,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let (table, pages) = load(input, output_path)?;
    let verdict = Validator::new(config).validate(&table, &pages)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else if !quiet {
        output::section("Validation");
        output::kv("Input", input.display());
        output::kv("Pages", output_path.display());
        output::kv("Samples", table.n_samples());
        output::kv("Bins", table.n_bins());
        output::kv(
            "Tolerance",
            format!(
                "abs {:e}, rel {:e}",
                config.tolerance.abs_eps, config.tolerance.rel_eps
            ),
        );
        println!();
        for outcome in &verdict.outcomes {
            print_outcome(outcome);
        }
    }

    for d in &verdict.discrepancies {
        output::discrepancy(&d.to_string());
    }
    summarize(&verdict, config.k, quiet || json)
}

fn print_outcome(outcome: &KOutcome) {
    if outcome.passed() {
        output::success(&format!(
            "K={}: all {} metrics within tolerance",
            outcome.k,
            MetricName::ALL.len()
        ));
    } else {
        output::fail(&format!(
            "K={}: {} discrepancies",
            outcome.k,
            outcome.discrepancies.len()
        ));
    }
}

/// Turns the verdict into the command result. Checking nothing is an error.
fn summarize(verdict: &Verdict, k: Option<usize>, silent: bool) -> Result<()> {
    if verdict.checked_k.is_empty() {
        return Err(CliError::ValidationFailed(match k {
            Some(k) => format!("no page for K={k}"),
            None => "no K pages to check".to_string(),
        }));
    }
    if !verdict.passed() {
        return Err(CliError::ValidationFailed(format!(
            "{} mismatches across {} pages",
            verdict.discrepancies.len(),
            verdict.checked_k.len()
        )));
    }
    if !silent {
        println!();
        output::success(&format!("Validation PASSED ({} pages)", verdict.checked_k.len()));
    }
    Ok(())
}
