mod geojson;

pub(crate) use geojson::*;
