use std::path::PathBuf;

use graindash::Crop;

/// County crop-production dashboard
#[derive(clap::Parser, Debug)]
#[command(name = "graindash", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file; defaults apply to every missing key
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// County boundary shapefile (overrides the config)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub counties: Option<PathBuf>,

    /// Prepared rivers GeoJSON (overrides the config)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub rivers: Option<PathBuf>,

    /// Directory of production CSV files (overrides the config)
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub production_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Filter and simplify the raw waterway shapefile into the rivers GeoJSON
    PrepareRivers(PrepareRiversArgs),

    /// Render one crop and year to a figure file
    Render(RenderArgs),

    /// Interactive selector shell that re-renders a figure file after each change
    Shell(ShellArgs),

    /// Download production tables from USDA NASS Quick Stats
    #[cfg(feature = "download")]
    Fetch(FetchArgs),
}

/// Figure file format.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
    Svg,
}

#[derive(clap::Args, Debug)]
pub struct PrepareRiversArgs {
    /// Raw waterway network shapefile (overrides the config)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Douglas-Peucker tolerance in degrees (overrides the config)
    #[arg(short, long)]
    pub tolerance: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct FigureArgs {
    /// Output figure file
    #[arg(short, long, default_value = "graindash.html", value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Output format, inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// SVG width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// corn or soybeans
    #[arg(long, default_value = "corn")]
    pub crop: Crop,

    /// Defaults to the last configured year
    #[arg(long)]
    pub year: Option<u16>,

    /// Leave out the river overlay
    #[arg(long)]
    pub no_rivers: bool,

    #[command(flatten)]
    pub figure: FigureArgs,
}

#[derive(clap::Args, Debug)]
pub struct ShellArgs {
    #[command(flatten)]
    pub figure: FigureArgs,
}

#[cfg(feature = "download")]
#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Crop to fetch; both when omitted
    #[arg(long)]
    pub crop: Option<Crop>,

    /// Years to fetch (repeatable); every configured year when omitted
    #[arg(long = "year")]
    pub years: Vec<u16>,
}
