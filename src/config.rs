//! Dashboard configuration: input locations, filtering parameters and map defaults.
//!
//! Every field has a default, so a config file only needs the keys it changes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Attribute names in the county boundary shapefile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountyFields {
    pub state: String,
    pub county: String,
    pub name: String,
}

impl Default for CountyFields {
    fn default() -> Self {
        Self {
            state: "STATEFP".to_string(),
            county: "COUNTYFP".to_string(),
            name: "NAME".to_string(),
        }
    }
}

/// Inclusive range of selectable years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub first: u16,
    pub last: u16,
}

impl YearRange {
    #[inline] pub fn contains(&self, year: u16) -> bool { (self.first..=self.last).contains(&year) }

    pub fn iter(&self) -> impl Iterator<Item = u16> { self.first..=self.last }
}

impl Default for YearRange {
    fn default() -> Self { Self { first: 2010, last: 2023 } }
}

/// Base map settings for the interactive (plotly) figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub style: String,
    pub zoom: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub opacity: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            style: "open-street-map".to_string(),
            zoom: 3.5,
            center_lat: 39.5,
            center_lon: -98.35,
            opacity: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// County boundary polygons (Census cartographic boundary shapefile).
    pub county_shapefile: PathBuf,
    /// Raw waterway network lines, read by `prepare-rivers`.
    pub river_shapefile: PathBuf,
    /// Filtered and simplified rivers, written by `prepare-rivers` and read at startup.
    pub rivers_geojson: PathBuf,
    /// Directory of `{crop}_county_production_{year}.csv` files.
    pub production_dir: PathBuf,
    pub county_fields: CountyFields,
    pub river_name_field: String,
    /// Allow-list of waterway names, matched case-insensitively as substrings.
    pub major_rivers: Vec<String>,
    /// Douglas-Peucker tolerance in degrees.
    pub simplify_tolerance: f64,
    pub years: YearRange,
    pub map: MapStyle,
    /// USDA NASS Quick Stats key; `NASS_API_KEY` is used when unset.
    pub nass_api_key: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            county_shapefile: "data/cb_2018_us_county_5m/cb_2018_us_county_5m.shp".into(),
            river_shapefile: "data/water_geo_data/Navigable_Waterway_Network_Lines/Navigable_Waterway_Network_Lines.shp".into(),
            rivers_geojson: "data/water_geo_data/water_output/dash_ready_rivers.geojson".into(),
            production_dir: "data/production_data".into(),
            county_fields: CountyFields::default(),
            river_name_field: "RIVERNAME".to_string(),
            major_rivers: ["Mississippi", "Ohio", "Illinois", "Arkansas", "Tennessee", "Missouri", "Red", "Columbia"]
                .into_iter().map(str::to_string).collect(),
            simplify_tolerance: 0.3,
            years: YearRange::default(),
            map: MapStyle::default(),
            nass_api_key: None,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.years.first <= self.years.last,
            "year range is empty: {}..={}", self.years.first, self.years.last);
        ensure!(self.simplify_tolerance >= 0.0 && self.simplify_tolerance.is_finite(),
            "simplify_tolerance must be a non-negative number, got {}", self.simplify_tolerance);
        ensure!((0.0..=1.0).contains(&self.map.opacity),
            "map opacity must be in [0, 1], got {}", self.map.opacity);
        Ok(())
    }
}
