pub mod prepare_rivers;
pub mod render;
pub mod shell;
#[cfg(feature = "download")]
pub mod fetch;

use anyhow::Result;
use graindash::{DashboardConfig, Figure};

use crate::cli::{Cli, FigureArgs, Format};

/// Load the config file (if any) and apply path overrides from the command line.
pub fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.counties { config.county_shapefile = path.clone() }
    if let Some(path) = &cli.rivers { config.rivers_geojson = path.clone() }
    if let Some(path) = &cli.production_dir { config.production_dir = path.clone() }
    config.validate()?;
    Ok(config)
}

/// Format from `--format`, else from the output extension, else HTML.
pub fn figure_format(args: &FigureArgs) -> Format {
    args.format.unwrap_or_else(|| {
        match args.output.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Format::Json,
            Some("svg") => Format::Svg,
            _ => Format::Html,
        }
    })
}

pub fn write_figure(figure: &Figure, args: &FigureArgs) -> Result<()> {
    match figure_format(args) {
        Format::Html => figure.write_html(&args.output)?,
        Format::Svg => figure.write_svg(&args.output, args.width)?,
        Format::Json => figure.write_json(&args.output)?,
    }
    tracing::info!("wrote {}", args.output.display());
    Ok(())
}
