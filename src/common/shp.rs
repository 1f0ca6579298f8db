use std::path::Path;

use anyhow::{Context, Result, bail};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use shapefile::{Reader, Shape, dbase::{FieldValue, Record}};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    super::require_file_exists(path)?;
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("Error reading shape+record in {}", path.display()))?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Get the trimmed value of a character field, `None` when the field is null or blank.
pub(crate) fn get_character_field(record: &Record, field: &str) -> Result<Option<String>> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(FieldValue::Character(None)) => Ok(None),
        Some(other) => bail!("field {field} is not a character field: {other:?}"),
        None => bail!("missing field: {field}"),
    }
}

/// Get a numeric code field as text, accepting either character or numeric storage.
pub(crate) fn get_code_field(record: &Record, field: &str) -> Result<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        Some(FieldValue::Numeric(Some(n))) if n.fract() == 0.0 && *n >= 0.0 => Ok(format!("{}", *n as u64)),
        _ => bail!("missing or invalid code field: {field}"),
    }
}

/// Convert a polygon-type shape to `geo::MultiPolygon<f64>`.
pub(crate) fn shape_to_multipolygon(shape: Shape) -> Result<MultiPolygon<f64>> {
    let rings: Vec<Vec<Coord<f64>>> = match shape {
        Shape::Polygon(p) => p.rings().iter()
            .map(|ring| ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
            .collect(),
        Shape::PolygonM(p) => p.rings().iter()
            .map(|ring| ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
            .collect(),
        Shape::PolygonZ(p) => p.rings().iter()
            .map(|ring| ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
            .collect(),
        other => bail!("found non-Polygon shape in layer: {:?}", other.shapetype()),
    };
    Ok(rings_to_multipolygon(rings.into_iter().map(close_ring).collect()))
}

/// Convert a polyline-type shape to `geo::MultiLineString<f64>`, one line per part.
pub(crate) fn shape_to_multilinestring(shape: Shape) -> Result<MultiLineString<f64>> {
    fn parts<P>(parts: &[Vec<P>], xy: impl Fn(&P) -> Coord<f64>) -> MultiLineString<f64> {
        MultiLineString(parts.iter()
            .filter(|part| part.len() >= 2)
            .map(|part| LineString(part.iter().map(&xy).collect()))
            .collect())
    }

    match shape {
        Shape::Polyline(l) => Ok(parts(l.parts(), |pt| Coord { x: pt.x, y: pt.y })),
        Shape::PolylineM(l) => Ok(parts(l.parts(), |pt| Coord { x: pt.x, y: pt.y })),
        Shape::PolylineZ(l) => Ok(parts(l.parts(), |pt| Coord { x: pt.x, y: pt.y })),
        other => bail!("found non-Polyline shape in layer: {:?}", other.shapetype()),
    }
}

/// Ensure first and last are the same for geo::LineString coords
fn close_ring(mut coords: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last { coords.push(first) }
    }
    coords
}

/// Get the signed area of a ring (negative for clockwise).
fn signed_area(pts: &[Coord<f64>]) -> f64 {
    pts.windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum::<f64>() / 2.0
}

/// Group rings into polygons: each clockwise exterior followed by its holes (Shapefile ordering).
fn rings_to_multipolygon(rings: Vec<Vec<Coord<f64>>>) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in rings.into_iter().filter(|ring| ring.len() >= 4) {
        let is_exterior = signed_area(&ring) < 0.0;
        let ring = LineString(ring);
        if is_exterior {
            if let Some(ext) = exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ring);
        } else if exterior.is_some() {
            holes.push(ring);
        } else {
            // Counter-clockwise ring with no preceding exterior: treat as its own shell.
            polys.push(Polygon::new(ring, Vec::new()));
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::{Point, PolygonRing, Polyline};

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point> {
        // Clockwise, as Shapefile stores exteriors
        vec![
            Point { x: x0, y: y0 },
            Point { x: x0, y: y0 + size },
            Point { x: x0 + size, y: y0 + size },
            Point { x: x0 + size, y: y0 },
            Point { x: x0, y: y0 },
        ]
    }

    #[test]
    fn polygon_with_hole_groups_rings() {
        let mut hole = square(1.0, 1.0, 1.0);
        hole.reverse();
        let polygon = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 4.0)),
            PolygonRing::Inner(hole),
            PolygonRing::Outer(square(10.0, 10.0, 1.0)),
        ]);

        let mp = shape_to_multipolygon(Shape::Polygon(polygon)).unwrap();
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[1].interiors().is_empty());
    }

    #[test]
    fn polyline_parts_become_lines() {
        let line = Polyline::with_parts(vec![
            vec![Point { x: 0.0, y: 0.0 }, Point { x: 1.0, y: 1.0 }],
            vec![Point { x: 2.0, y: 2.0 }, Point { x: 3.0, y: 3.0 }, Point { x: 4.0, y: 3.0 }],
        ]);

        let mls = shape_to_multilinestring(Shape::Polyline(line)).unwrap();
        assert_eq!(mls.0.len(), 2);
        assert_eq!(mls.0[1].0.len(), 3);
    }

    #[test]
    fn wrong_shape_kind_is_rejected() {
        assert!(shape_to_multipolygon(Shape::Point(Point { x: 0.0, y: 0.0 })).is_err());
        assert!(shape_to_multilinestring(Shape::Point(Point { x: 0.0, y: 0.0 })).is_err());
    }
}
