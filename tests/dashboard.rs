use std::path::Path;

use approx::assert_relative_eq;
use geo::{MultiLineString, MultiPolygon, line_string, polygon};
use graindash::{
    Command, County, CountyLayer, Crop, Dashboard, DashboardConfig, Datasets, Fill, Outcome, ProductionTable,
    River, RiverNetwork, join, production_file,
};

const HEADER: &str = "state_name,county_name,year,Value,unit_desc,state_fips_code,county_code\n";

fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0), (x: x, y: y),
    ]])
}

fn counties() -> CountyLayer {
    CountyLayer::new(vec![
        County { fips: "05001".parse().unwrap(), name: "Arkansas".into(), geometry: square(-91.5, 34.0) },
        County { fips: "05003".parse().unwrap(), name: "Ashley".into(), geometry: square(-92.5, 33.0) },
        County { fips: "05005".parse().unwrap(), name: "Baxter".into(), geometry: square(-92.5, 36.0) },
    ]).unwrap()
}

fn rivers() -> RiverNetwork {
    RiverNetwork::new(vec![
        River {
            name: Some("Arkansas River".into()),
            geometry: MultiLineString(vec![
                line_string![(x: -91.4, y: 34.5), (x: -90.6, y: 34.5)],
                line_string![(x: -92.4, y: 33.2), (x: -91.6, y: 33.8)],
            ]),
        },
        River {
            name: Some("Mississippi River".into()),
            geometry: MultiLineString(vec![line_string![(x: -91.0, y: 33.0), (x: -91.0, y: 35.0), (x: -90.8, y: 36.0)]]),
        },
    ])
}

fn write_production(dir: &Path, crop: Crop, year: u16, rows: &[&str]) {
    let mut text = HEADER.to_string();
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    std::fs::write(production_file(dir, crop, year), text).unwrap();
}

fn fixture_tables(dir: &Path) -> Vec<ProductionTable> {
    write_production(dir, Crop::Corn, 2023, &[
        r#"ARKANSAS,ARKANSAS,2023,"1,234",BU,05,001"#,
        r#"ARKANSAS,ASHLEY,2023,0,BU,5,3"#,
    ]);
    write_production(dir, Crop::Corn, 2022, &[r#"ARKANSAS,BAXTER,2022,"12,000",BU,05,005"#]);
    write_production(dir, Crop::Soybeans, 2023, &[r#"ARKANSAS,ARKANSAS,2023,"98,765",BU,05,001"#]);

    Crop::ALL.into_iter()
        .map(|crop| ProductionTable::load_dir(dir, crop).unwrap())
        .collect()
}

#[test]
fn production_csv_joins_onto_counties() {
    let dir = tempfile::tempdir().unwrap();
    let table = ProductionTable::load_dir(dir.path(), Crop::Corn).err();
    assert!(table.is_some(), "empty directory must fail");

    let tables = fixture_tables(dir.path());
    let corn = &tables[0];
    assert_eq!(corn.years(), vec![2022, 2023]);

    let counties = counties();
    let view = join(&counties, corn, 2023);
    assert_eq!(view.len(), counties.len());

    let rows = view.rows();
    assert_eq!(rows[0].fips().as_str(), "05001");
    assert_relative_eq!(rows[0].value().unwrap(), 1234.0);
    assert_eq!(rows[1].value(), Some(0.0));
    assert_eq!(rows[2].value(), None);
    assert_eq!(rows[0].county_name(), "ARKANSAS");
    assert_eq!(rows[2].county_name(), "Baxter");
}

#[test]
fn malformed_production_value_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    write_production(dir.path(), Crop::Corn, 2019, &[r#"IOWA,ADAIR,2019,(D),BU,19,001"#]);

    let err = ProductionTable::load_dir(dir.path(), Crop::Corn).unwrap_err();
    assert!(format!("{err:#}").contains("corn_county_production_2019.csv"));
}

#[test]
fn river_geojson_preserves_names_and_parts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/dash_ready_rivers.geojson");

    let original = rivers();
    original.write_geojson(&path).unwrap();
    let loaded = RiverNetwork::read_geojson(&path).unwrap();

    assert_eq!(loaded.len(), original.len());
    for (a, b) in loaded.rivers().iter().zip(original.rivers()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.geometry.0.len(), b.geometry.0.len());
    }
}

#[test]
fn shell_session_recomputes_on_every_change() {
    let dir = tempfile::tempdir().unwrap();
    let datasets = Datasets::new(counties(), rivers(), fixture_tables(dir.path()));
    let config = DashboardConfig::default();
    let mut dashboard = Dashboard::new(&datasets, &config);

    let figure = dashboard.render();
    assert_eq!(figure.title, "Corn Production by County (2023)");
    assert_eq!(figure.lines.len(), 3);
    assert_eq!(figure.regions[2].fill, Fill::Missing);

    for line in ["crop soybeans", "overlay rivers off"] {
        let command = Command::parse(line).unwrap().unwrap();
        assert_eq!(dashboard.apply(command), Ok(Outcome::Rerender));
    }
    let figure = dashboard.render();
    assert_eq!(figure.title, "Soybeans Production by County (2023)");
    assert!(figure.lines.is_empty());
    assert_eq!(figure.data_regions().count(), 1);

    assert!(dashboard.apply(Command::parse("year 1999").unwrap().unwrap()).is_err());
    assert_eq!(dashboard.selection().year, 2023);
}

#[test]
fn overlay_toggle_only_changes_line_traces() {
    let dir = tempfile::tempdir().unwrap();
    let datasets = Datasets::new(counties(), rivers(), fixture_tables(dir.path()));
    let config = DashboardConfig::default();
    let mut dashboard = Dashboard::new(&datasets, &config);

    let on = dashboard.render().to_plotly_json();
    dashboard.apply(Command::Rivers(false)).unwrap();
    let off = dashboard.render().to_plotly_json();

    let on = on["data"].as_array().unwrap();
    let off = off["data"].as_array().unwrap();
    let choropleths = |data: &[serde_json::Value]| data.iter()
        .filter(|trace| trace["type"] == "choroplethmapbox")
        .cloned()
        .collect::<Vec<_>>();

    assert_eq!(choropleths(on.as_slice()), choropleths(off.as_slice()));
    assert_eq!(on.len() - off.len(), 3);
}

#[test]
fn figure_exports_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let datasets = Datasets::new(counties(), rivers(), fixture_tables(dir.path()));
    let config = DashboardConfig::default();
    let figure = Dashboard::new(&datasets, &config).render();

    let html = dir.path().join("figure.html");
    let svg = dir.path().join("figure.svg");
    let json = dir.path().join("figure.json");
    figure.write_html(&html).unwrap();
    figure.write_svg(&svg, 800).unwrap();
    figure.write_json(&json).unwrap();

    let html = std::fs::read_to_string(html).unwrap();
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("Corn Production by County (2023)"));

    let svg = std::fs::read_to_string(svg).unwrap();
    assert_eq!(svg.matches("<polyline").count(), 3);

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(json).unwrap()).unwrap();
    assert_eq!(json["layout"]["mapbox"]["center"]["lon"], -98.35);
}
