mod crop;
mod read;
mod table;

pub use crop::{Crop, UnknownCrop};
pub use read::{load_production, parse_value, production_file};
pub use table::{ProductionRecord, ProductionTable};
