//! Plotly figure JSON: `choroplethmapbox` traces for counties, `scattermapbox` lines for rivers.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::{common, map::io::counties_to_geojson};
use super::{Figure, color::NO_DATA};

const RIVER_COLOR: &str = "blue";
const RIVER_WIDTH: f64 = 1.5;

impl Figure<'_> {
    /// Figure as a plotly `{ "data": [...], "layout": {...} }` object.
    ///
    /// Trace order: valued counties, then counties without data, then one trace per river part.
    pub fn to_plotly_json(&self) -> Value {
        let mut data = Vec::with_capacity(2 + self.lines.len());
        data.push(self.value_trace());
        if self.missing_regions().next().is_some() {
            data.push(self.missing_trace());
        }
        data.extend(self.lines.iter().map(|trace| {
            let (lon, lat): (Vec<f64>, Vec<f64>) = trace.line.coords().map(|c| (c.x, c.y)).unzip();
            json!({
                "type": "scattermapbox",
                "mode": "lines",
                "lon": lon,
                "lat": lat,
                "name": trace.name,
                "hoverinfo": "name",
                "line": { "color": RIVER_COLOR, "width": RIVER_WIDTH },
                "showlegend": false,
            })
        }));

        json!({
            "data": data,
            "layout": {
                "title": { "text": self.title, "x": 0.5 },
                "mapbox": {
                    "style": self.style.style,
                    "zoom": self.style.zoom,
                    "center": { "lat": self.style.center_lat, "lon": self.style.center_lon },
                },
                "margin": { "r": 0, "t": 40, "l": 0, "b": 0 },
            },
        })
    }

    /// Write the plotly JSON to `path`, replacing it atomically.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.to_plotly_json()).context("Failed to serialize figure")?;
        common::write_atomic(path, &bytes)
    }

    fn value_trace(&self) -> Value {
        let regions = self.data_regions().collect::<Vec<_>>();
        let (zmin, zmax) = self.range.unwrap_or((0.0, 0.0));
        let colorscale = self.scale.plotly_stops().into_iter()
            .map(|(t, color)| json!([t, color]))
            .collect::<Vec<_>>();

        json!({
            "type": "choroplethmapbox",
            "name": "Production",
            "geojson": counties_to_geojson(regions.iter().map(|region| region.county)),
            "featureidkey": "id",
            "locations": regions.iter().map(|region| region.county.fips.as_str()).collect::<Vec<_>>(),
            "z": regions.iter().map(|region| region.value.unwrap_or_default()).collect::<Vec<_>>(),
            "zmin": zmin,
            "zmax": zmax,
            "colorscale": colorscale,
            "colorbar": { "title": { "text": "Value" } },
            "text": regions.iter().map(|region| region.hover.as_str()).collect::<Vec<_>>(),
            "hoverinfo": "text",
            "marker": { "opacity": self.style.opacity, "line": { "width": 0 } },
        })
    }

    fn missing_trace(&self) -> Value {
        let regions = self.missing_regions().collect::<Vec<_>>();
        let gray = NO_DATA.to_string();

        json!({
            "type": "choroplethmapbox",
            "name": "No data",
            "geojson": counties_to_geojson(regions.iter().map(|region| region.county)),
            "featureidkey": "id",
            "locations": regions.iter().map(|region| region.county.fips.as_str()).collect::<Vec<_>>(),
            "z": vec![0; regions.len()],
            "colorscale": [[0.0, gray], [1.0, gray]],
            "showscale": false,
            "text": regions.iter().map(|region| region.hover.as_str()).collect::<Vec<_>>(),
            "hoverinfo": "text",
            "marker": { "opacity": self.style.opacity, "line": { "width": 0 } },
        })
    }
}

#[cfg(test)]
mod tests {
    use geo::{MultiLineString, MultiPolygon, line_string, polygon};

    use super::*;
    use crate::{
        config::MapStyle,
        dashboard::{Overlays, Selection},
        join::join,
        map::{County, CountyLayer, River, RiverNetwork},
        production::{Crop, ProductionRecord, ProductionTable},
    };

    fn fixture() -> (CountyLayer, ProductionTable, RiverNetwork) {
        let square = |x: f64| MultiPolygon(vec![polygon![
            (x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0), (x: x, y: 0.0),
        ]]);
        let counties = CountyLayer::new(vec![
            County { fips: "19001".parse().unwrap(), name: "Adair".into(), geometry: square(0.0) },
            County { fips: "19003".parse().unwrap(), name: "Adams".into(), geometry: square(1.0) },
        ]).unwrap();
        let table = ProductionTable::new(Crop::Soybeans, vec![ProductionRecord {
            crop: Crop::Soybeans,
            year: 2020,
            fips: "19001".parse().unwrap(),
            value: 250.0,
            county_name: None,
            state_name: None,
        }]);
        let rivers = RiverNetwork::new(vec![River {
            name: Some("Missouri River".into()),
            geometry: MultiLineString(vec![
                line_string![(x: 0.0, y: 0.5), (x: 1.0, y: 0.5)],
                line_string![(x: 1.0, y: 0.5), (x: 2.0, y: 0.9)],
                line_string![(x: 3.0, y: 0.5), (x: 4.0, y: 0.5)],
            ]),
        }]);
        (counties, table, rivers)
    }

    #[test]
    fn traces_and_layout() {
        let (counties, table, rivers) = fixture();
        let view = join(&counties, &table, 2020);
        let selection = Selection { crop: Crop::Soybeans, year: 2020, overlays: Overlays { rivers: true } };
        let json = Figure::build(&view, &rivers, &selection, &MapStyle::default()).to_plotly_json();

        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2 + 3);
        assert_eq!(data[0]["type"], "choroplethmapbox");
        assert_eq!(data[0]["locations"], json!(["19001"]));
        assert_eq!(data[0]["geojson"]["features"][0]["id"], "19001");
        assert_eq!(data[1]["name"], "No data");
        assert_eq!(data[1]["locations"], json!(["19003"]));
        assert_eq!(data[2]["type"], "scattermapbox");
        assert_eq!(data[2]["line"]["width"], 1.5);
        assert_eq!(data[2]["showlegend"], false);

        let layout = &json["layout"];
        assert_eq!(layout["title"]["text"], "Soybeans Production by County (2020)");
        assert_eq!(layout["mapbox"]["style"], "open-street-map");
        assert_eq!(layout["mapbox"]["zoom"], 3.5);
        assert_eq!(layout["mapbox"]["center"]["lat"], 39.5);
        assert_eq!(data[0]["marker"]["opacity"], 0.7);
    }

    #[test]
    fn rivers_off_leaves_choropleth_untouched() {
        let (counties, table, rivers) = fixture();
        let view = join(&counties, &table, 2020);
        let mut selection = Selection { crop: Crop::Soybeans, year: 2020, overlays: Overlays { rivers: true } };
        let on = Figure::build(&view, &rivers, &selection, &MapStyle::default()).to_plotly_json();
        selection.overlays.rivers = false;
        let off = Figure::build(&view, &rivers, &selection, &MapStyle::default()).to_plotly_json();

        let off_data = off["data"].as_array().unwrap();
        assert_eq!(off_data.len(), 2);
        assert_eq!(off_data[..], on["data"].as_array().unwrap()[..2]);
    }
}
