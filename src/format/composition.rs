//! Raw composition CSV.

use crate::data::{BinLabel, CompositionTable};
use crate::error::{EntropyMaxError, Result};
use crate::primitives::Matrix;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Accepted spellings of the sample column, compared case-insensitively.
const SAMPLE_HEADERS: [&str; 2] = ["sample", "sample name"];

fn is_dropped_header(header: &str) -> bool {
    let h = header.trim();
    h.is_empty() || h.starts_with("Unnamed:")
}

fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

fn line_of(record: &csv::StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map_or(fallback as u64, csv::Position::line)
}

/// Parses one data cell. Blank means zero; anything else must be a
/// nonnegative finite number.
fn parse_cell(cell: &str, line: u64, bin: &BinLabel) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0.0);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(v) => Err(EntropyMaxError::malformed(
            format!("line {line}, column '{}'", bin.raw),
            format!("value {v} is not a nonnegative number"),
        )),
        Err(_) => Err(EntropyMaxError::malformed(
            format!("line {line}, column '{}'", bin.raw),
            format!("'{cell}' is not a number"),
        )),
    }
}

/// Reads a composition table from CSV.
///
/// The first column holds sample identifiers and must be headed `Sample` or
/// `Sample Name`. Every other header is a numeric bin label; labels must be
/// non-decreasing. Trailing blank or `Unnamed:` headers are ignored along
/// with their cells.
///
/// # Errors
///
/// Returns `MalformedInput` naming the offending row or column, or `Csv`
/// when the reader itself fails.
///
/// # Examples
///
/// ```
/// use entropymax::format::read_composition;
///
/// let csv = "Sample Name,0.5,1.0\nS1,3,1\nS2,,4\n";
/// let table = read_composition(csv.as_bytes()).unwrap();
/// assert_eq!(table.n_samples(), 2);
/// assert_eq!(table.matrix().get(1, 0), 0.0);
/// ```
pub fn read_composition<R: Read>(reader: R) -> Result<CompositionTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let first = headers.get(0).map(clean_header).unwrap_or_default();
    if !SAMPLE_HEADERS.iter().any(|h| first.eq_ignore_ascii_case(h)) {
        return Err(EntropyMaxError::malformed(
            "header column 1",
            format!("expected a sample identifier column ('Sample Name'), found '{first}'"),
        ));
    }

    let mut width = headers.len();
    while width > 1 && headers.get(width - 1).is_some_and(is_dropped_header) {
        width -= 1;
    }

    let mut bins: Vec<BinLabel> = Vec::with_capacity(width.saturating_sub(1));
    for col in 1..width {
        let label = BinLabel::parse(clean_header(headers.get(col).unwrap_or_default()), col)?;
        if let Some(prev) = bins.last() {
            if label.value < prev.value {
                return Err(EntropyMaxError::malformed(
                    format!("header column {}", col + 1),
                    format!(
                        "bin header '{}' is smaller than the preceding '{}'",
                        label.raw, prev.raw
                    ),
                ));
            }
        }
        bins.push(label);
    }
    if bins.is_empty() {
        return Err(EntropyMaxError::malformed("header", "no bin columns found"));
    }

    let mut sample_ids = Vec::new();
    let mut cells = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = line_of(&record, i + 2);
        if record.iter().all(|c| c.trim().is_empty()) {
            debug!(line, "skipping blank row");
            continue;
        }

        let id = record.get(0).map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err(EntropyMaxError::malformed(
                format!("line {line}, column 1"),
                "empty sample identifier",
            ));
        }
        if let Some(extra) = record.iter().skip(width).find(|c| !c.trim().is_empty()) {
            return Err(EntropyMaxError::malformed(
                format!("line {line}"),
                format!("value '{}' has no bin header", extra.trim()),
            ));
        }

        for (j, bin) in bins.iter().enumerate() {
            cells.push(parse_cell(record.get(j + 1).unwrap_or_default(), line, bin)?);
        }
        sample_ids.push(id.to_string());
    }

    let matrix = Matrix::from_vec(sample_ids.len(), bins.len(), cells)?;
    let table = CompositionTable::new(sample_ids, bins, matrix)?;
    info!(
        samples = table.n_samples(),
        bins = table.n_bins(),
        "loaded composition table"
    );
    Ok(table)
}

/// Reads a composition table from a CSV file.
///
/// # Errors
///
/// As [`read_composition`], plus `Io` when the file cannot be opened.
pub fn read_composition_path(path: impl AsRef<Path>) -> Result<CompositionTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening composition file");
    read_composition(File::open(path)?)
}
