use std::path::Path;

use ahash::AHashMap;
use anyhow::{Context, Result, bail};
use geo::{BoundingRect, Intersects, MultiLineString, MultiPolygon, Rect};
use shapefile::{Shape, dbase::Record};

use crate::{common, config::CountyFields, geom::{BoxIndex, Crs, Reprojector}};
use super::CountyFips;

/// A county boundary tagged with its composite identifier.
#[derive(Debug, Clone)]
pub struct County {
    pub fips: CountyFips,
    pub name: String,
    pub geometry: MultiPolygon<f64>, // lon/lat degrees (EPSG:4326)
}

impl County {
    pub fn state_name(&self) -> Option<&'static str> { self.fips.state_name() }
}

/// All county polygons, in file order, with a FIPS lookup and a bounding-box index.
#[derive(Debug)]
pub struct CountyLayer {
    counties: Vec<County>,
    index: AHashMap<CountyFips, usize>,
    boxes: BoxIndex,
}

impl CountyLayer {
    /// Build a layer from counties already in lon/lat. Fails on duplicate identifiers.
    pub fn new(counties: Vec<County>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(counties.len());
        for (i, county) in counties.iter().enumerate() {
            if index.insert(county.fips.clone(), i).is_some() {
                bail!("duplicate county identifier {} in boundary data", county.fips);
            }
        }

        let boxes = BoxIndex::new(counties.iter().map(|county| &county.geometry));

        Ok(Self { counties, index, boxes })
    }

    /// Load county polygons from a shapefile and reproject them to WGS84 lon/lat.
    pub fn from_shapefile(path: &Path, fields: &CountyFields) -> Result<Self> {
        let crs = Crs::from_shapefile(path)?;
        let items = common::read_shapefile(path)?;
        tracing::info!("read {} county shapes from {} (EPSG:{})", items.len(), path.display(), crs.epsg());

        Self::from_shapes_and_records(items, fields, crs)
            .with_context(|| format!("Error loading counties from {}", path.display()))
    }

    /// Build the layer from raw shapefile items in `crs`.
    pub(crate) fn from_shapes_and_records(items: Vec<(Shape, Record)>, fields: &CountyFields, crs: Crs) -> Result<Self> {
        let reproject = Reprojector::to_wgs84(crs)?;

        let counties = items.into_iter().enumerate()
            .map(|(row, (shape, record))| {
                let load = || -> Result<County> {
                    let fips = CountyFips::from_codes(
                        &common::get_code_field(&record, &fields.state)?,
                        &common::get_code_field(&record, &fields.county)?,
                    )?;
                    let name = common::get_character_field(&record, &fields.name)?
                        .unwrap_or_default();

                    let geometry = common::shape_to_multipolygon(shape)?;
                    let geometry = match &reproject {
                        Some(reproject) => reproject.geometry(&geometry)?,
                        None => geometry,
                    };

                    Ok(County { fips, name, geometry })
                };
                load().with_context(|| format!("at shape record {row}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(counties)
    }

    #[inline] pub fn len(&self) -> usize { self.counties.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.counties.is_empty() }

    #[inline] pub fn counties(&self) -> &[County] { &self.counties }

    pub fn get(&self, fips: &CountyFips) -> Option<&County> {
        self.index.get(fips).map(|&i| &self.counties[i])
    }

    /// Bounding rectangle of all counties.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.boxes.bounds() }

    /// Whether `lines` touches any county polygon; the reference boundary for river filtering.
    pub fn intersects(&self, lines: &MultiLineString<f64>) -> bool {
        let Some(rect) = lines.bounding_rect() else { return false };
        self.boxes.candidates(&rect)
            .any(|i| lines.intersects(&self.counties[i].geometry))
    }
}
