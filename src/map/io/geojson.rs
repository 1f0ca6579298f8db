use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, MultiLineString, MultiPolygon};
use serde_json::{Map, Value, json};

use crate::map::{County, River};

/// GeoJSON coordinate array for a line string: [[x, y], ...]
fn line_coords(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

/// GeoJSON MultiPolygon geometry: [[exterior, hole, ...], ...]
pub(crate) fn multipolygon_geometry(mp: &MultiPolygon<f64>) -> Value {
    let polygons = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(line_coords)
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

/// County polygons as a FeatureCollection whose feature ids are the FIPS codes.
pub(crate) fn counties_to_geojson<'a>(counties: impl IntoIterator<Item = &'a County>) -> Value {
    let features = counties.into_iter()
        .map(|county| json!({
            "type": "Feature",
            "id": county.fips.as_str(),
            "geometry": multipolygon_geometry(&county.geometry),
            "properties": { "name": county.name },
        }))
        .collect::<Vec<_>>();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Write rivers to GeoJSON bytes, one MultiLineString feature per river.
pub(crate) fn write_rivers_to_geojson_bytes(rivers: &[River]) -> Result<Vec<u8>> {
    let features = rivers.iter()
        .map(|river| {
            let mut properties = Map::new();
            if let Some(name) = &river.name {
                properties.insert("name".to_string(), json!(name));
            }
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": river.geometry.0.iter().map(line_coords).collect::<Vec<_>>(),
                },
                "properties": properties,
            })
        })
        .collect::<Vec<_>>();

    let feature_collection = json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
        "features": features,
    });

    serde_json::to_vec(&feature_collection).context("Failed to serialize GeoJSON to bytes")
}

/// Read rivers from GeoJSON bytes. Accepts LineString and MultiLineString features;
/// the `name` property (or `RIVERNAME`, as exported from the source shapefile) labels each river.
pub(crate) fn read_rivers_from_geojson_bytes(bytes: &[u8]) -> Result<Vec<River>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("GeoJSON is not a FeatureCollection"))?;

    features.iter().enumerate()
        .filter(|(_, feature)| !feature["geometry"].is_null())
        .map(|(i, feature)| {
            let geometry = &feature["geometry"];
            let coords = geometry["coordinates"].as_array()
                .ok_or_else(|| anyhow!("feature {i}: missing coordinates"))?;

            let lines = match geometry["type"].as_str() {
                Some("LineString") => vec![parse_line_coords(coords)?],
                Some("MultiLineString") => coords.iter()
                    .map(|part| part.as_array()
                        .ok_or_else(|| anyhow!("invalid MultiLineString part"))
                        .and_then(|part| parse_line_coords(part)))
                    .collect::<Result<Vec<_>>>()?,
                other => bail!("feature {i}: unsupported geometry type {other:?}"),
            };

            let properties = &feature["properties"];
            let name = properties["name"].as_str()
                .or_else(|| properties["RIVERNAME"].as_str())
                .map(str::to_string);

            Ok(River { name, geometry: MultiLineString(lines) })
        })
        .collect()
}

/// Parse a line from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...], extra ordinates are ignored.
fn parse_line_coords(coords: &[Value]) -> Result<LineString<f64>> {
    coords.iter()
        .map(|pair| {
            let x = pair[0].as_f64()
                .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64()
                .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString)
}
