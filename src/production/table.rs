use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::{common, map::CountyFips};
use super::{Crop, load_production};

/// One county's production of one crop in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRecord {
    pub crop: Crop,
    pub year: u16,
    pub fips: CountyFips,
    pub value: f64,
    pub county_name: Option<String>,
    pub state_name: Option<String>,
}

/// All production records loaded for one crop, across years.
/// Duplicate (year, county) keys are kept as loaded; see [`crate::join`].
#[derive(Debug, Clone)]
pub struct ProductionTable {
    crop: Crop,
    records: Vec<ProductionRecord>,
}

impl ProductionTable {
    pub fn new(crop: Crop, records: Vec<ProductionRecord>) -> Self {
        Self { crop, records }
    }

    /// Load every `{crop}_county_production_{year}.csv` file in `dir`, in year order.
    /// Fails if there are none, or if any of them is malformed.
    pub fn load_dir(dir: &Path, crop: Crop) -> Result<Self> {
        common::require_dir_exists(dir)?;

        let prefix = format!("{}_county_production_", crop.as_str());
        let mut years = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let year = name.strip_prefix(&prefix)?.strip_suffix(".csv")?;
                (year.len() == 4).then(|| year.parse::<u16>().ok()).flatten()
            })
            .collect::<Vec<_>>();
        years.sort_unstable();

        if years.is_empty() {
            bail!("no {prefix}YYYY.csv files in {}", dir.display());
        }

        let mut records = Vec::new();
        for year in years {
            records.extend(load_production(dir, crop, year)?);
        }
        tracing::info!("loaded {} {crop} production records from {}", records.len(), dir.display());

        Ok(Self { crop, records })
    }

    #[inline] pub fn crop(&self) -> Crop { self.crop }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn records(&self) -> &[ProductionRecord] { &self.records }

    /// Records whose `year` column equals `year`.
    pub fn for_year(&self, year: u16) -> impl Iterator<Item = &ProductionRecord> + '_ {
        self.records.iter().filter(move |record| record.year == year)
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<u16> {
        let mut years = self.records.iter().map(|record| record.year).collect::<Vec<_>>();
        years.sort_unstable();
        years.dedup();
        years
    }
}
