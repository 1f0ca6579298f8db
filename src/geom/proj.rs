use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// Coordinate reference systems the loaders know how to bring to WGS84 lon/lat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// EPSG:4326, the target of every reprojection.
    Wgs84,
    /// EPSG:4269, used by Census cartographic boundary files.
    Nad83,
    /// EPSG:3857, common for web-oriented line datasets.
    WebMercator,
}

impl Crs {
    pub fn epsg(self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Nad83 => 4269,
            Crs::WebMercator => 3857,
        }
    }

    #[inline]
    fn is_geographic(self) -> bool { !matches!(self, Crs::WebMercator) }

    fn proj4(self) -> &'static str {
        match self {
            Crs::Wgs84 => "+proj=longlat +datum=WGS84 +no_defs +type=crs",
            Crs::Nad83 => "+proj=longlat +datum=NAD83 +no_defs +type=crs",
            Crs::WebMercator => "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs",
        }
    }

    /// Identify the CRS described by an ESRI `.prj` WKT string.
    pub fn from_wkt(wkt: &str) -> Result<Self> {
        let wkt = wkt.to_ascii_uppercase();

        if wkt.trim_start().starts_with("PROJCS") {
            if ["WEB_MERCATOR", "MERCATOR_AUXILIARY_SPHERE", "PSEUDO-MERCATOR", "POPULAR VISUALISATION"]
                .iter().any(|key| wkt.contains(key))
            {
                return Ok(Crs::WebMercator);
            }
            bail!("unsupported projected CRS: {}", wkt.chars().take(80).collect::<String>());
        }

        if wkt.contains("NORTH_AMERICAN_1983") || wkt.contains("NAD83") || wkt.contains("NAD_1983") {
            Ok(Crs::Nad83)
        } else if wkt.contains("WGS_1984") || wkt.contains("WGS 84") || wkt.contains("WGS84") {
            Ok(Crs::Wgs84)
        } else {
            bail!("unsupported geographic CRS: {}", wkt.chars().take(80).collect::<String>())
        }
    }

    /// Read the `.prj` sidecar of a shapefile. Without one, coordinates are assumed
    /// to be NAD83 lon/lat, the Census default.
    pub fn from_shapefile(path: &Path) -> Result<Self> {
        let prj = path.with_extension("prj");
        if !prj.exists() {
            tracing::debug!("no .prj next to {}, assuming NAD83 lon/lat", path.display());
            return Ok(Crs::Nad83);
        }
        let wkt = std::fs::read_to_string(&prj)
            .with_context(|| format!("Failed to read projection file {}", prj.display()))?;
        Self::from_wkt(&wkt)
            .with_context(|| format!("in projection file {}", prj.display()))
    }
}

/// Transforms coordinates from a source CRS into WGS84 degrees.
pub(crate) struct Reprojector {
    source: Crs,
    from: Proj4,
    to: Proj4,
}

impl Reprojector {
    /// Build a transform to WGS84, or `None` if `source` already is WGS84.
    pub(crate) fn to_wgs84(source: Crs) -> Result<Option<Self>> {
        if source == Crs::Wgs84 { return Ok(None) }

        let build = |crs: Crs| Proj4::from_proj_string(crs.proj4())
            .map_err(|e| anyhow!("failed to build PROJ.4 for EPSG:{}: {e:?}", crs.epsg()));

        Ok(Some(Self { source, from: build(source)?, to: build(Crs::Wgs84)? }))
    }

    /// Transform a single coordinate; input in source units, output in degrees.
    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = if self.source.is_geographic() {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("CRS transform failed at ({}, {}): {e:?}", coord.x, coord.y))?;
        Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }

    /// Transform every coordinate of a geometry.
    pub(crate) fn geometry<G>(&self, geom: &G) -> Result<G::Output>
    where
        G: MapCoords<f64, f64>,
    {
        geom.try_map_coords(|coord| self.coord(coord))
    }
}
