use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, ensure};
use polars::{frame::DataFrame, prelude::StringChunked};

use crate::{common, map::CountyFips};
use super::{Crop, ProductionRecord};

/// Location of the production table for one crop and year.
pub fn production_file(dir: &Path, crop: Crop, year: u16) -> PathBuf {
    dir.join(format!("{}_county_production_{year}.csv", crop.as_str()))
}

/// Parse a production value that may carry thousands separators, e.g. "1,234" -> 1234.0.
pub fn parse_value(raw: &str) -> Result<f64> {
    let cleaned = raw.trim().replace(',', "");
    ensure!(!cleaned.is_empty(), "empty value");
    let value = cleaned.parse::<f64>()
        .with_context(|| format!("value {raw:?} is not a number"))?;
    ensure!(value.is_finite(), "value {raw:?} is not finite");
    Ok(value)
}

/// Load `{dir}/{crop}_county_production_{year}.csv`.
/// Any malformed row fails the whole file; duplicate counties are not checked here.
pub fn load_production(dir: &Path, crop: Crop, year: u16) -> Result<Vec<ProductionRecord>> {
    let path = production_file(dir, crop, year);
    let df = common::read_csv_as_strings(&path)?;
    let records = records_from_dataframe(&df, crop)
        .with_context(|| format!("Malformed production table {}", path.display()))?;
    tracing::debug!("{}: {} rows", path.display(), records.len());
    Ok(records)
}

/// Convert a string-typed NASS export into records.
pub(crate) fn records_from_dataframe(df: &DataFrame, crop: Crop) -> Result<Vec<ProductionRecord>> {
    /// Get a required string column.
    fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
        df.column(name)
            .with_context(|| format!("missing column {name:?}"))?
            .str()
            .with_context(|| format!("column {name:?} is not a string column"))
    }

    /// Get an optional string column.
    fn optional<'a>(df: &'a DataFrame, name: &str) -> Result<Option<&'a StringChunked>> {
        match df.column(name) {
            Ok(column) => Ok(Some(column.str()
                .with_context(|| format!("column {name:?} is not a string column"))?)),
            Err(_) => Ok(None),
        }
    }

    let states = required(df, "state_fips_code")?;
    let counties = required(df, "county_code")?;
    let years = required(df, "year")?;
    let values = required(df, "Value")?;
    let county_names = optional(df, "county_name")?;
    let state_names = optional(df, "state_name")?;

    /// Get a non-null cell.
    fn cell<'a>(column: &'a StringChunked, row: usize, name: &str) -> Result<&'a str> {
        column.get(row).ok_or_else(|| anyhow!("null {name}"))
    }

    (0..df.height())
        .map(|row| {
            let parse = || -> Result<ProductionRecord> {
                let fips = CountyFips::from_codes(
                    cell(states, row, "state_fips_code")?,
                    cell(counties, row, "county_code")?,
                )?;
                let year = cell(years, row, "year")?.trim().parse::<u16>()
                    .context("year is not an integer")?;
                let value = parse_value(cell(values, row, "Value")?)?;

                Ok(ProductionRecord {
                    crop,
                    year,
                    fips,
                    value,
                    county_name: county_names.and_then(|c| c.get(row)).map(|s| s.trim().to_string()),
                    state_name: state_names.and_then(|c| c.get(row)).map(|s| s.trim().to_string()),
                })
            };

            // Header is line 1
            parse().with_context(|| format!("at line {}", row + 2))
        })
        .collect()
}
