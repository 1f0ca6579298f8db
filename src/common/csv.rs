//! CSV reading and writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::{SerReader, SerWriter}, prelude::{CsvReadOptions, CsvWriter}};

/// Reads a comma-separated file with a header row, keeping every column as a string.
/// Codes like "05" or values like "1,234" must survive untouched until they are cleaned.
pub(crate) fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    super::require_file_exists(path)?;
    let file = File::open(path)
        .with_context(|| format!("[common::csv] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[common::csv] Failed to read CSV from {:?}", path))
}

/// Write a DataFrame to CSV bytes.
pub(crate) fn write_csv_bytes(df: &mut DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    CsvWriter::new(&mut out)
        .finish(df)
        .context("[common::csv] Failed to write CSV to bytes")?;
    Ok(out)
}
