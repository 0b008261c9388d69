//! Command implementations

use crate::error::{CliError, Result};
use entropymax::data::CompositionTable;
use entropymax::format::{read_composition_path, read_pages_path, PageSet};
use std::path::Path;

pub(crate) mod metrics;
pub(crate) mod validate;

fn validate_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(CliError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Loads both input files, checking paths first.
fn load(input: &Path, output: &Path) -> Result<(CompositionTable, PageSet)> {
    validate_path(input)?;
    validate_path(output)?;
    let table = read_composition_path(input)?;
    let pages = read_pages_path(output)?;
    Ok((table, pages))
}
