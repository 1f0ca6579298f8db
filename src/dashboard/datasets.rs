use anyhow::{Context, Result};

use crate::{
    config::DashboardConfig,
    map::{CountyLayer, NameFilter, RiverNetwork},
    production::{Crop, ProductionTable},
};

/// Everything the dashboard reads, loaded once and shared by reference.
#[derive(Debug)]
pub struct Datasets {
    pub counties: CountyLayer,
    pub rivers: RiverNetwork,
    corn: ProductionTable,
    soybeans: ProductionTable,
}

impl Datasets {
    /// Assemble datasets; crops without a table get an empty one.
    pub fn new(counties: CountyLayer, rivers: RiverNetwork, tables: impl IntoIterator<Item = ProductionTable>) -> Self {
        let mut corn = ProductionTable::new(Crop::Corn, Vec::new());
        let mut soybeans = ProductionTable::new(Crop::Soybeans, Vec::new());
        for table in tables {
            match table.crop() {
                Crop::Corn => corn = table,
                Crop::Soybeans => soybeans = table,
            }
        }
        Self { counties, rivers, corn, soybeans }
    }

    /// Load counties, prepared rivers and every crop's production tables.
    /// Any missing or malformed input is an error.
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let counties = CountyLayer::from_shapefile(&config.county_shapefile, &config.county_fields)?;
        let rivers = RiverNetwork::read_geojson(&config.rivers_geojson)
            .context("Prepared rivers are missing or unreadable; run `prepare-rivers` first")?;
        let tables = Crop::ALL.into_iter()
            .map(|crop| ProductionTable::load_dir(&config.production_dir, crop))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("datasets ready: {} counties, {} rivers", counties.len(), rivers.len());
        Ok(Self::new(counties, rivers, tables))
    }

    pub fn table(&self, crop: Crop) -> &ProductionTable {
        match crop {
            Crop::Corn => &self.corn,
            Crop::Soybeans => &self.soybeans,
        }
    }
}

/// Offline river preparation: read the raw waterway shapefile, keep allow-listed rivers
/// touching a county, simplify, and write the GeoJSON the dashboard loads.
pub fn prepare_rivers(config: &DashboardConfig) -> Result<RiverNetwork> {
    let counties = CountyLayer::from_shapefile(&config.county_shapefile, &config.county_fields)?;
    let names = NameFilter::new(&config.major_rivers)?;

    let rivers = RiverNetwork::from_shapefile(&config.river_shapefile, &config.river_name_field)?
        .filter(&counties, &names)
        .simplify(config.simplify_tolerance);

    rivers.write_geojson(&config.rivers_geojson)?;
    Ok(rivers)
}
