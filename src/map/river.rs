use std::path::Path;

use anyhow::{Context, Result};
use geo::{LineString, MultiLineString, Simplify};
use regex::{Regex, RegexBuilder};
use shapefile::{Shape, dbase::Record};

use crate::{common, geom::{Crs, Reprojector}};
use super::{CountyLayer, io};

/// A named waterway in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct River {
    pub name: Option<String>,
    pub geometry: MultiLineString<f64>,
}

impl River {
    /// Display name; unnamed rivers are labelled "River".
    pub fn label(&self) -> &str { self.name.as_deref().unwrap_or("River") }

    /// Contiguous parts of this river, one per line string.
    pub fn parts(&self) -> impl Iterator<Item = &LineString<f64>> { self.geometry.0.iter() }
}

/// Case-insensitive substring match against an allow-list of waterway names.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Option<Regex>,
}

impl NameFilter {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let alternatives = names.iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>();

        if alternatives.is_empty() { return Ok(Self { pattern: None }) }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .context("Failed to build river name pattern")?;
        Ok(Self { pattern: Some(pattern) })
    }

    /// Whether `name` contains any allow-listed name. An empty allow-list matches nothing.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().is_some_and(|pattern| pattern.is_match(name))
    }
}

/// The set of river geometries drawn as overlays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiverNetwork {
    rivers: Vec<River>,
}

impl RiverNetwork {
    pub fn new(rivers: Vec<River>) -> Self { Self { rivers } }

    /// Load line geometries from a shapefile and reproject them to WGS84 lon/lat.
    pub fn from_shapefile(path: &Path, name_field: &str) -> Result<Self> {
        let crs = Crs::from_shapefile(path)?;
        let items = common::read_shapefile(path)?;
        tracing::info!("read {} river shapes from {} (EPSG:{})", items.len(), path.display(), crs.epsg());

        Self::from_shapes_and_records(items, name_field, crs)
            .with_context(|| format!("Error loading rivers from {}", path.display()))
    }

    pub(crate) fn from_shapes_and_records(items: Vec<(Shape, Record)>, name_field: &str, crs: Crs) -> Result<Self> {
        let reproject = Reprojector::to_wgs84(crs)?;

        let rivers = items.into_iter().enumerate()
            .filter(|(_, (shape, _))| !matches!(shape, Shape::NullShape))
            .map(|(row, (shape, record))| {
                let load = || -> Result<River> {
                    let name = common::get_character_field(&record, name_field)?;
                    let geometry = common::shape_to_multilinestring(shape)?;
                    let geometry = match &reproject {
                        Some(reproject) => reproject.geometry(&geometry)?,
                        None => geometry,
                    };
                    Ok(River { name, geometry })
                };
                load().with_context(|| format!("at shape record {row}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rivers })
    }

    /// Read a prepared river file written by [`RiverNetwork::write_geojson`].
    pub fn read_geojson(path: &Path) -> Result<Self> {
        common::require_file_exists(path)?;
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let rivers = io::read_rivers_from_geojson_bytes(&bytes)
            .with_context(|| format!("Failed to parse river GeoJSON {}", path.display()))?;
        tracing::info!("read {} rivers from {}", rivers.len(), path.display());
        Ok(Self { rivers })
    }

    /// Write the network as a GeoJSON FeatureCollection, replacing `path` atomically.
    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        let bytes = io::write_rivers_to_geojson_bytes(&self.rivers)?;
        common::write_atomic(path, &bytes)?;
        tracing::info!("wrote {} rivers to {}", self.rivers.len(), path.display());
        Ok(())
    }

    #[inline] pub fn len(&self) -> usize { self.rivers.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rivers.is_empty() }

    #[inline] pub fn rivers(&self) -> &[River] { &self.rivers }

    /// Keep rivers whose name matches `names` and whose geometry touches a county.
    /// Unnamed rivers never match.
    pub fn filter(self, counties: &CountyLayer, names: &NameFilter) -> Self {
        let before = self.rivers.len();
        let rivers = self.rivers.into_iter()
            .filter(|river| river.name.as_deref().is_some_and(|name| names.matches(name)))
            .filter(|river| counties.intersects(&river.geometry))
            .collect::<Vec<_>>();
        tracing::debug!("river filter kept {} of {before}", rivers.len());
        Self { rivers }
    }

    /// Douglas-Peucker simplification of every part. Parts that collapse are dropped:
    /// fewer than two distinct points, or a closed part left with fewer than four points.
    /// Self-crossings introduced by simplification are not repaired.
    pub fn simplify(self, tolerance: f64) -> Self {
        if tolerance <= 0.0 { return self }

        let rivers = self.rivers.into_iter()
            .map(|river| River {
                geometry: MultiLineString(river.geometry.0.iter()
                    .map(|line| (line.is_closed(), line.simplify(&tolerance)))
                    .filter(|(closed, line)| !is_degenerate(line, *closed))
                    .map(|(_, line)| line)
                    .collect()),
                ..river
            })
            .filter(|river| !river.geometry.0.is_empty())
            .collect();
        Self { rivers }
    }
}

/// Whether a simplified part no longer describes a line (or, if it was closed, a loop).
fn is_degenerate(line: &LineString<f64>, was_closed: bool) -> bool {
    let Some(first) = line.0.first() else { return true };
    if line.0.iter().all(|coord| coord == first) { return true }
    was_closed && line.0.len() < 4
}
