//! USDA NASS Quick Stats client for county production tables.

use std::{path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use polars::prelude::{Column, DataFrame};
use reqwest::{StatusCode, blocking::Client};
use serde_json::Value;

use crate::{
    common,
    config::DashboardConfig,
    production::{Crop, parse_value, production_file},
};
use super::{Failure, RetryPolicy};

pub const QUICK_STATS_URL: &str = "https://quickstats.nass.usda.gov/api/api_GET/";
pub const API_KEY_ENV: &str = "NASS_API_KEY";

/// Columns kept in the written production tables, in order.
pub const COLUMNS: [&str; 7] = ["state_name", "county_name", "year", "Value", "unit_desc", "state_fips_code", "county_code"];

pub struct NassClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl NassClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("graindash/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url: QUICK_STATS_URL.to_string(), api_key: api_key.into(), retry: RetryPolicy::default() })
    }

    /// Client keyed from the config, falling back to the `NASS_API_KEY` environment variable.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let key = config.nass_api_key.clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| anyhow!("No NASS API key: set `nass_api_key` in the config or {API_KEY_ENV}"))?;
        Self::new(key)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Quick Stats query for annual county-level production, in bushels.
    fn query(&self, crop: Crop, year: u16) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("source_desc", "SURVEY".into()),
            ("sector_desc", "CROPS".into()),
            ("group_desc", "FIELD CROPS".into()),
            ("commodity_desc", crop.commodity().into()),
            ("statisticcat_desc", "PRODUCTION".into()),
            ("unit_desc", "BU".into()),
            ("freq_desc", "ANNUAL".into()),
            ("agg_level_desc", "COUNTY".into()),
            ("year", year.to_string()),
            ("format", "JSON".into()),
        ]
    }

    /// Fetch the raw response body for one crop and year.
    pub fn get(&self, crop: Crop, year: u16) -> Result<Vec<u8>> {
        let label = format!("GET {} {crop} {year}", self.base_url);
        let query = self.query(crop, year);

        self.retry.run(&label, || {
            let response = self.http.get(&self.base_url).query(&query).send()
                .map_err(|err| {
                    let transient = err.is_connect() || err.is_timeout();
                    let err = anyhow::Error::new(err);
                    if transient { Failure::Retryable(err) } else { Failure::Fatal(err) }
                })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                return Err(Failure::Retryable(anyhow!("server returned {status}")));
            }
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(Failure::Fatal(anyhow!("server returned {status}: {}", body.trim())));
            }

            response.bytes()
                .map(|bytes| bytes.to_vec())
                .map_err(|err| Failure::Retryable(anyhow::Error::new(err).context("Failed to read response body")))
        })
    }

    /// Fetch one crop and year and write `{dir}/{crop}_county_production_{year}.csv`.
    pub fn fetch_production(&self, dir: &Path, crop: Crop, year: u16) -> Result<PathBuf> {
        let body = self.get(crop, year)?;
        let rows = rows_from_response(&body)
            .with_context(|| format!("Unexpected Quick Stats response for {crop} {year}"))?;

        common::ensure_dir_exists(dir)?;
        let path = production_file(dir, crop, year);
        common::write_atomic(&path, &rows_to_csv_bytes(&rows)?)?;
        tracing::info!("wrote {} {crop} rows for {year} to {}", rows.len(), path.display());
        Ok(path)
    }
}

/// Extract the kept columns from a Quick Stats JSON response.
/// Rows whose value is suppressed or otherwise not numeric (e.g. "(D)") are dropped.
pub(crate) fn rows_from_response(bytes: &[u8]) -> Result<Vec<[String; 7]>> {
    let json: Value = serde_json::from_slice(bytes).context("Response is not JSON")?;
    if let Some(error) = json.get("error") {
        bail!("Quick Stats error: {error}");
    }
    let data = json.get("data").and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Response has no `data` array"))?;

    /// Render a JSON scalar as it would appear in a CSV cell.
    fn cell(row: &Value, column: &str) -> Result<String> {
        match row.get(column) {
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Null) | None => bail!("missing field {column:?}"),
            Some(other) => bail!("field {column:?} has unexpected value {other}"),
        }
    }

    let mut rows = Vec::with_capacity(data.len());
    let mut suppressed = 0usize;
    for (i, row) in data.iter().enumerate() {
        let mut cells: [String; 7] = Default::default();
        for (slot, column) in cells.iter_mut().zip(COLUMNS) {
            *slot = cell(row, column).with_context(|| format!("at data[{i}]"))?;
        }
        if parse_value(&cells[3]).is_err() {
            suppressed += 1;
            continue;
        }
        rows.push(cells);
    }

    if suppressed > 0 {
        tracing::warn!("dropped {suppressed} rows with suppressed or non-numeric values");
    }
    Ok(rows)
}

/// Write rows as CSV with a header of [`COLUMNS`].
pub(crate) fn rows_to_csv_bytes(rows: &[[String; 7]]) -> Result<Vec<u8>> {
    let columns = COLUMNS.iter().enumerate()
        .map(|(i, &name)| Column::new(name.into(), rows.iter().map(|row| row[i].as_str()).collect::<Vec<_>>()))
        .collect::<Vec<_>>();
    let mut df = DataFrame::new(columns).context("Failed to build production table")?;
    common::write_csv_bytes(&mut df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::ProductionTable;

    const RESPONSE: &str = r#"{"data": [
        {"state_name": "ARKANSAS", "county_name": "ARKANSAS", "year": 2023, "Value": "12,345,000",
         "unit_desc": "BU", "state_fips_code": "05", "county_code": "001", "commodity_desc": "CORN"},
        {"state_name": "ARKANSAS", "county_name": "ASHLEY", "year": 2023, "Value": "(D)",
         "unit_desc": "BU", "state_fips_code": "05", "county_code": "003", "commodity_desc": "CORN"},
        {"state_name": "IOWA", "county_name": "ADAIR", "year": 2023, "Value": "0",
         "unit_desc": "BU", "state_fips_code": "19", "county_code": "001", "commodity_desc": "CORN"}
    ]}"#;

    #[test]
    fn response_rows_keep_columns_and_drop_suppressed() {
        let rows = rows_from_response(RESPONSE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["ARKANSAS", "ARKANSAS", "2023", "12,345,000", "BU", "05", "001"].map(String::from));
        assert_eq!(rows[1][1], "ADAIR");
    }

    #[test]
    fn error_responses_are_reported() {
        assert!(rows_from_response(br#"{"error": ["bad request - invalid query"]}"#).is_err());
        assert!(rows_from_response(b"<html>").is_err());
        assert!(rows_from_response(br#"{"data": [{"year": 2023}]}"#).is_err());
    }

    #[test]
    fn written_table_loads_as_production() {
        let dir = tempfile::tempdir().unwrap();
        let rows = rows_from_response(RESPONSE.as_bytes()).unwrap();
        std::fs::write(production_file(dir.path(), Crop::Corn, 2023), rows_to_csv_bytes(&rows).unwrap()).unwrap();

        let table = ProductionTable::load_dir(dir.path(), Crop::Corn).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].fips.as_str(), "05001");
        assert_eq!(table.records()[0].value, 12_345_000.0);
        assert_eq!(table.records()[1].value, 0.0);
    }

    #[test]
    fn api_key_from_config() {
        let config = DashboardConfig { nass_api_key: Some("secret".into()), ..Default::default() };
        let client = NassClient::from_config(&config).unwrap();
        let query = client.query(Crop::Soybeans, 2019);
        assert!(query.contains(&("key", "secret".to_string())));
        assert!(query.contains(&("commodity_desc", "SOYBEANS".to_string())));
        assert!(query.contains(&("year", "2019".to_string())));
        assert!(query.contains(&("agg_level_desc", "COUNTY".to_string())));
    }
}
