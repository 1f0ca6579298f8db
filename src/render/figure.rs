use geo::{BoundingRect, LineString, Rect};

use crate::{
    config::MapStyle,
    dashboard::Selection,
    join::JoinedView,
    map::{County, RiverNetwork},
};
use super::{ColorScale, Rgb, color::NO_DATA};

/// How a county is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Color from the sequential scale.
    Value(Rgb),
    /// No production record for this county.
    Missing,
}

impl Fill {
    pub fn color(&self) -> Rgb {
        match self {
            Fill::Value(color) => *color,
            Fill::Missing => NO_DATA,
        }
    }
}

/// One county as drawn.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    pub county: &'a County,
    pub value: Option<f64>,
    pub fill: Fill,
    pub hover: String,
}

/// One contiguous river part, drawn as its own line trace.
#[derive(Debug, Clone, Copy)]
pub struct LineTrace<'a> {
    pub name: &'a str,
    pub line: &'a LineString<f64>,
}

/// A rendered choropleth of one crop and year, with optional river overlays.
#[derive(Debug, Clone)]
pub struct Figure<'a> {
    pub title: String,
    pub regions: Vec<Region<'a>>,
    pub lines: Vec<LineTrace<'a>>,
    /// Min/max of present values; the color scale is normalized on it.
    pub range: Option<(f64, f64)>,
    pub scale: ColorScale,
    pub style: MapStyle,
}

impl<'a> Figure<'a> {
    pub fn build(view: &JoinedView<'a>, rivers: &'a RiverNetwork, selection: &Selection, style: &MapStyle) -> Self {
        let scale = ColorScale::yl_gn();
        let range = view.value_range();

        let regions = view.rows().iter()
            .map(|row| {
                let place = match row.state_name() {
                    Some(state) => format!("{}, {state}", row.county_name()),
                    None => row.county_name().to_string(),
                };
                let (fill, hover) = match (row.value(), range) {
                    (Some(value), Some((lo, hi))) => (
                        Fill::Value(scale.color_for(value, lo, hi)),
                        format!("{place}: {}", format_value(value)),
                    ),
                    _ => (Fill::Missing, format!("{place}: no data")),
                };
                Region { county: row.county, value: row.value(), fill, hover }
            })
            .collect();

        let lines = if selection.overlays.rivers {
            rivers.rivers().iter()
                .flat_map(|river| river.parts().map(move |line| LineTrace { name: river.label(), line }))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            title: format!("{} Production by County ({})", view.crop.label(), view.year),
            regions,
            lines,
            range,
            scale,
            style: style.clone(),
        }
    }

    /// Counties with a value, in county order.
    pub fn data_regions(&self) -> impl Iterator<Item = &Region<'a>> {
        self.regions.iter().filter(|region| region.value.is_some())
    }

    /// Counties without a value, in county order.
    pub fn missing_regions(&self) -> impl Iterator<Item = &Region<'a>> {
        self.regions.iter().filter(|region| region.value.is_none())
    }

    /// Bounding box of every county polygon.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.regions.iter()
            .filter_map(|region| region.county.geometry.bounding_rect())
            .reduce(|a, b| Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            ))
    }
}

/// Format a production value with thousands separators: 1234567 -> "1,234,567", 12.5 -> "12.50".
pub fn format_value(value: f64) -> String {
    let text = if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.2}") };
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let mut out = String::from(sign);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 { out.push(',') }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use geo::{MultiLineString, MultiPolygon, line_string, polygon};

    use super::*;
    use crate::{
        dashboard::Overlays,
        join::join,
        map::{CountyLayer, River},
        production::{Crop, ProductionRecord, ProductionTable},
    };

    fn county(fips: &str, name: &str, x: f64) -> County {
        County {
            fips: fips.parse().unwrap(),
            name: name.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0), (x: x, y: 0.0),
            ]]),
        }
    }

    fn record(fips: &str, value: f64) -> ProductionRecord {
        ProductionRecord {
            crop: Crop::Corn,
            year: 2023,
            fips: fips.parse().unwrap(),
            value,
            county_name: None,
            state_name: None,
        }
    }

    fn fixture() -> (CountyLayer, ProductionTable, RiverNetwork) {
        let counties = CountyLayer::new(vec![
            county("05001", "Arkansas", 0.0),
            county("05003", "Ashley", 1.0),
            county("05005", "Baxter", 2.0),
        ]).unwrap();
        let table = ProductionTable::new(Crop::Corn, vec![record("05001", 0.0), record("05003", 1_500_000.0)]);
        let rivers = RiverNetwork::new(vec![River {
            name: Some("Arkansas River".to_string()),
            geometry: MultiLineString(vec![
                line_string![(x: 0.5, y: 0.5), (x: 1.5, y: 0.5)],
                line_string![(x: 2.0, y: 0.2), (x: 2.5, y: 0.8)],
            ]),
        }]);
        (counties, table, rivers)
    }

    fn selection(rivers: bool) -> Selection {
        Selection { crop: Crop::Corn, year: 2023, overlays: Overlays { rivers } }
    }

    #[test]
    fn zero_is_drawn_at_low_end_and_missing_is_gray() {
        let (counties, table, rivers) = fixture();
        let view = join(&counties, &table, 2023);
        let figure = Figure::build(&view, &rivers, &selection(true), &MapStyle::default());

        assert_eq!(figure.regions[0].fill, Fill::Value(figure.scale.low()));
        assert_eq!(figure.regions[1].fill, Fill::Value(figure.scale.high()));
        assert_eq!(figure.regions[2].fill, Fill::Missing);
        assert_eq!(figure.data_regions().count(), 2);
        assert_eq!(figure.missing_regions().count(), 1);
    }

    #[test]
    fn hover_text_and_title() {
        let (counties, table, rivers) = fixture();
        let view = join(&counties, &table, 2023);
        let figure = Figure::build(&view, &rivers, &selection(true), &MapStyle::default());

        assert_eq!(figure.title, "Corn Production by County (2023)");
        assert_eq!(figure.regions[1].hover, "Ashley, Arkansas: 1,500,000");
        assert_eq!(figure.regions[2].hover, "Baxter, Arkansas: no data");
    }

    #[test]
    fn one_line_trace_per_river_part() {
        let (counties, table, rivers) = fixture();
        let view = join(&counties, &table, 2023);

        let on = Figure::build(&view, &rivers, &selection(true), &MapStyle::default());
        assert_eq!(on.lines.len(), 2);
        assert!(on.lines.iter().all(|trace| trace.name == "Arkansas River"));

        let off = Figure::build(&view, &rivers, &selection(false), &MapStyle::default());
        assert!(off.lines.is_empty());
        assert_eq!(
            on.regions.iter().map(|r| r.fill).collect::<Vec<_>>(),
            off.regions.iter().map(|r| r.fill).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn bounds_cover_all_counties() {
        let (counties, table, rivers) = fixture();
        let view = join(&counties, &table, 2023);
        let figure = Figure::build(&view, &rivers, &selection(false), &MapStyle::default());

        let bounds = figure.bounds().unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.max().x, 3.0);
        assert_eq!(bounds.max().y, 1.0);
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(1234.0), "1,234");
        assert_eq!(format_value(12_345_678.0), "12,345,678");
        assert_eq!(format_value(-4500.0), "-4,500");
        assert_eq!(format_value(1234.5), "1,234.50");
    }
}
