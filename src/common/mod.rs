mod csv;
mod fs;
mod shp;

pub(crate) use csv::*;
pub(crate) use fs::*;
pub(crate) use shp::*;
