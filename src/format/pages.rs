//! Reported partition pages.
//!
//! The file is a single CSV holding one block of rows per K:
//! `K,Group,Sample,<bins...>,<six metrics...>[,extra columns]`. Every row
//! carries the page's metrics; only the first row that parses is kept.

use crate::error::{EntropyMaxError, Result};
use crate::metrics::{MetricName, MetricsRecord};
use crate::partition::Assignment;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// One K's reported partition and metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Number of groups.
    pub k: usize,
    /// `(sample, 1-based group)` pairs in file order.
    pub assignments: Vec<Assignment>,
    /// Metrics from the first row whose six metric cells parse.
    pub reported: Option<MetricsRecord>,
}

impl Page {
    /// An empty page for `k` groups.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }
}

/// All pages of a reported output file, keyed by K.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSet {
    pages: BTreeMap<usize, Page>,
    bin_headers: Vec<String>,
}

impl PageSet {
    /// Builds a set from pages; a later page with the same K replaces an
    /// earlier one.
    #[must_use]
    pub fn new(pages: impl IntoIterator<Item = Page>, bin_headers: Vec<String>) -> Self {
        Self {
            pages: pages.into_iter().map(|p| (p.k, p)).collect(),
            bin_headers,
        }
    }

    /// Page for one K.
    #[must_use]
    pub fn get(&self, k: usize) -> Option<&Page> {
        self.pages.get(&k)
    }

    /// Pages in ascending K order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// The K values present, ascending.
    pub fn ks(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.keys().copied()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when no page was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Bin headers found between `Sample` and the first metric column.
    #[must_use]
    pub fn bin_headers(&self) -> &[String] {
        &self.bin_headers
    }
}

struct Layout {
    k: usize,
    group: usize,
    sample: usize,
    bins: Vec<String>,
    metrics: [usize; 6],
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let cols: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |name: &str| {
            cols.iter().position(|c| *c == name).ok_or_else(|| {
                EntropyMaxError::malformed("header", format!("missing required column '{name}'"))
            })
        };

        let k = find("K")?;
        let group = find("Group")?;
        let sample = find("Sample")?;

        let mut metrics = [0usize; 6];
        for (slot, metric) in metrics.iter_mut().zip(MetricName::ALL) {
            *slot = find(metric.header())?;
        }
        let first_metric = metrics.iter().copied().min().unwrap_or(cols.len());
        let bins = if first_metric > sample {
            cols[sample + 1..first_metric]
                .iter()
                .map(|c| (*c).to_string())
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            k,
            group,
            sample,
            bins,
            metrics,
        })
    }

    fn reported(&self, record: &csv::StringRecord) -> Option<MetricsRecord> {
        let mut values = [0.0; 6];
        for (value, &col) in values.iter_mut().zip(&self.metrics) {
            *value = record.get(col)?.trim().parse::<f64>().ok()?;
        }
        Some(MetricsRecord::from_ordered(values))
    }
}

/// Parses a K or group cell. Integral floats such as `3.0` are accepted as
/// long as they fit in a `usize`.
fn parse_count(cell: &str, line: u64, column: &str) -> Result<usize> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<usize>() {
        return Ok(v);
    }
    match cell.parse::<f64>() {
        Ok(v) if v >= 0.0 && v < usize::MAX as f64 && v.fract() == 0.0 => Ok(v as usize),
        _ => Err(EntropyMaxError::malformed(
            format!("line {line}, column '{column}'"),
            format!("'{cell}' is not a whole number"),
        )),
    }
}

/// Reads every K page from a reported output CSV.
///
/// # Errors
///
/// Returns `MalformedInput` when a required column is missing or a K or
/// Group cell does not parse, and `Csv` when the reader fails.
///
/// # Examples
///
/// ```
/// use entropymax::format::read_pages;
///
/// let csv = "K,Group,Sample,1,% explained,Total inequality,Between region inequality,\
/// Total sum of squares,Within group sum of squares,Calinski-Harabasz pseudo-F statistic\n\
/// 2,1,A,5,100,10,10,4,0,inf\n\
/// 2,2,B,5,100,10,10,4,0,inf\n";
/// let pages = read_pages(csv.as_bytes()).unwrap();
/// let page = pages.get(2).unwrap();
/// assert_eq!(page.assignments.len(), 2);
/// assert_eq!(page.reported.unwrap().ch, f64::INFINITY);
/// ```
pub fn read_pages<R: Read>(reader: R) -> Result<PageSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);
    let layout = Layout::from_headers(rdr.headers()?)?;

    let mut pages: BTreeMap<usize, Page> = BTreeMap::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(i as u64 + 2, csv::Position::line);
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let k = parse_count(record.get(layout.k).unwrap_or_default(), line, "K")?;
        let group = parse_count(record.get(layout.group).unwrap_or_default(), line, "Group")?;
        let sample = record.get(layout.sample).map(str::trim).unwrap_or_default();
        if sample.is_empty() {
            return Err(EntropyMaxError::malformed(
                format!("line {line}, column 'Sample'"),
                "empty sample identifier",
            ));
        }

        let page = pages.entry(k).or_insert_with(|| Page::new(k));
        page.assignments.push(Assignment::new(sample, group));
        if page.reported.is_none() {
            page.reported = layout.reported(&record);
            if page.reported.is_none() {
                debug!(k, line, "metric cells did not parse; trying the next row");
            }
        }
    }

    for page in pages.values().filter(|p| p.reported.is_none()) {
        warn!(k = page.k, "page has no parsable reported metrics");
    }
    info!(pages = pages.len(), "loaded partition pages");
    Ok(PageSet::new(pages.into_values(), layout.bins))
}

/// Reads reported pages from a file.
///
/// # Errors
///
/// As [`read_pages`], plus `Io` when the file cannot be opened.
pub fn read_pages_path(path: impl AsRef<Path>) -> Result<PageSet> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening partition pages");
    read_pages(File::open(path)?)
}
