mod geom;
mod proj;

pub(crate) use geom::BoxIndex;
pub use proj::Crs;
pub(crate) use proj::Reprojector;
