#![doc = "graindash: county crop-production choropleths with river overlays"]
mod common;
mod config;
mod dashboard;
#[cfg(feature = "download")]
mod fetch;
mod geom;
mod join;
mod map;
mod production;
mod render;

#[doc(inline)]
pub use config::{CountyFields, DashboardConfig, MapStyle, YearRange};

#[doc(inline)]
pub use dashboard::{Command, CommandError, Dashboard, Datasets, HELP, Outcome, Overlays, Selection, prepare_rivers};

#[cfg(feature = "download")]
#[doc(inline)]
pub use fetch::{API_KEY_ENV, COLUMNS, NassClient, QUICK_STATS_URL, RetryPolicy};

#[doc(inline)]
pub use geom::Crs;

#[doc(inline)]
pub use join::{JoinedRow, JoinedView, join};

#[doc(inline)]
pub use map::{County, CountyFips, CountyLayer, NameFilter, River, RiverNetwork, state_name};

#[doc(inline)]
pub use production::{Crop, ProductionRecord, ProductionTable, UnknownCrop, load_production, parse_value, production_file};

#[doc(inline)]
pub use render::{ColorScale, Figure, Fill, LineTrace, NO_DATA, Region, Rgb, format_value};
