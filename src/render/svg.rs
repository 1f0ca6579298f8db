//! Static SVG export of a figure.

use std::{io::Write, path::Path};

use anyhow::{Context, Result, anyhow};
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

use crate::common;
use super::{Figure, color::NO_DATA, html::escape};

/// Space reserved above the map for the title.
const TITLE_HEIGHT: f64 = 40.0;
/// Space reserved below the map for the legend.
const LEGEND_HEIGHT: f64 = 50.0;
const MARGIN: f64 = 10.0;

/// Projection function: lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// In-memory SVG writer.
struct SvgWriter {
    buffer: Vec<u8>,
}

impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl SvgWriter {
    fn new() -> Self { Self { buffer: Vec::new() } }

    fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer).context("SVG output is not valid UTF-8")
    }

    /// Write the XML declaration, the opening <svg> tag and a white background.
    fn write_header(&mut self, width: f64, height: f64, bounds: &Rect<f64>) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width:.0}" height="{height:.0}"
        viewBox="0 0 {width:.0} {height:.0}"
        data-lon-min="{lon_min}" data-lon-max="{lon_max}"
        data-lat-min="{lat_min}" data-lat-max="{lat_max}">"##,
            lon_min = bounds.min().x,
            lon_max = bounds.max().x,
            lat_min = bounds.min().y,
            lat_max = bounds.max().y,
        )?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    fn write_styles(&mut self, opacity: f64) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .county {{ stroke: #ffffff; stroke-width: 0.2; fill-opacity: {opacity}; }}
    .nodata {{ fill: {NO_DATA}; }}
    .river {{ fill: none; stroke: blue; stroke-width: 1.5; vector-effect: non-scaling-stroke; }}
    .title {{ font-family: sans-serif; font-size: 18px; text-anchor: middle; }}
    .legend {{ font-family: sans-serif; font-size: 11px; }}
</style>
</defs>"##)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }
    out
}

/// Build a compact SVG path string for a closed ring.
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();
    let mut coords = ring.coords_iter().map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }
    out
}

/// Build an SVG `points` string for an open line.
fn line_to_points(line: &LineString<f64>, project: &Projection) -> String {
    line.coords_iter()
        .map(|coord| {
            let (x, y) = project(&coord);
            format!("{x:.3},{y:.3}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Figure<'_> {
    /// Render as SVG `width` pixels wide; the map keeps the lon/lat aspect ratio.
    pub fn to_svg_string(&self, width: u32) -> Result<String> {
        let bounds = self.bounds()
            .ok_or_else(|| anyhow!("Could not determine bounds; nothing to draw"))?;

        let width = width as f64;
        let scale = (width - 2.0 * MARGIN) / bounds.width().max(f64::EPSILON);
        let map_height = bounds.height() * scale;
        let height = TITLE_HEIGHT + map_height + LEGEND_HEIGHT + 2.0 * MARGIN;

        // Y down
        let top = MARGIN + TITLE_HEIGHT;
        let project = move |coord: &Coord<f64>| -> (f64, f64) {
            let x = MARGIN + (coord.x - bounds.min().x) * scale;
            let y = top + (bounds.max().y - coord.y) * scale;
            (x, y)
        };

        let mut writer = SvgWriter::new();
        writer.write_header(width, height, &bounds)?;
        writer.write_styles(self.style.opacity)?;

        writeln!(writer, r#"<text class="title" x="{:.1}" y="{:.1}">{}</text>"#,
            width / 2.0, MARGIN + TITLE_HEIGHT * 0.6, escape(&self.title))?;

        writeln!(writer, r#"<g id="counties">"#)?;
        for region in &self.regions {
            let path = multipolygon_to_path(&region.county.geometry, &project);
            match region.value {
                Some(_) => writeln!(writer, r#"<path class="county" id="c{}" d="{path}" style="fill:{}"><title>{}</title></path>"#,
                    region.county.fips, region.fill.color(), escape(&region.hover))?,
                None => writeln!(writer, r#"<path class="county nodata" id="c{}" d="{path}"><title>{}</title></path>"#,
                    region.county.fips, escape(&region.hover))?,
            }
        }
        writeln!(writer, "</g>")?;

        if !self.lines.is_empty() {
            writeln!(writer, r#"<g id="rivers">"#)?;
            for trace in &self.lines {
                writeln!(writer, r#"<polyline class="river" points="{}"><title>{}</title></polyline>"#,
                    line_to_points(trace.line, &project), escape(trace.name))?;
            }
            writeln!(writer, "</g>")?;
        }

        self.write_legend(&mut writer, MARGIN, top + map_height + MARGIN)?;
        writer.write_footer()?;
        writer.into_string()
    }

    /// Write the SVG to `path`, replacing it atomically.
    pub fn write_svg(&self, path: &Path, width: u32) -> Result<()> {
        common::write_atomic(path, self.to_svg_string(width)?.as_bytes())
    }

    /// Gradient bar labelled with the value range, plus a "No data" swatch.
    fn write_legend(&self, writer: &mut impl Write, x: f64, y: f64) -> Result<()> {
        const BAR_WIDTH: f64 = 200.0;
        const BAR_HEIGHT: f64 = 12.0;

        writeln!(writer, r#"<linearGradient id="scale">"#)?;
        for (offset, color) in self.scale.plotly_stops() {
            writeln!(writer, r#"<stop offset="{offset:.3}" stop-color="{color}"/>"#)?;
        }
        writeln!(writer, "</linearGradient>")?;

        writeln!(writer, r#"<g class="legend">"#)?;
        writeln!(writer, r#"<rect x="{x:.1}" y="{y:.1}" width="{BAR_WIDTH}" height="{BAR_HEIGHT}" fill="url(#scale)"/>"#)?;
        if let Some((lo, hi)) = self.range {
            let label_y = y + BAR_HEIGHT + 14.0;
            writeln!(writer, r#"<text x="{x:.1}" y="{label_y:.1}">{}</text>"#, super::format_value(lo))?;
            writeln!(writer, r#"<text x="{:.1}" y="{label_y:.1}" text-anchor="end">{}</text>"#,
                x + BAR_WIDTH, super::format_value(hi))?;
        }
        let swatch_x = x + BAR_WIDTH + 30.0;
        writeln!(writer, r#"<rect class="nodata" x="{swatch_x:.1}" y="{y:.1}" width="{BAR_HEIGHT}" height="{BAR_HEIGHT}"/>"#)?;
        writeln!(writer, r#"<text x="{:.1}" y="{:.1}">No data</text>"#, swatch_x + BAR_HEIGHT + 6.0, y + BAR_HEIGHT - 2.0)?;
        writeln!(writer, "</g>")?;
        Ok(())
    }
}
