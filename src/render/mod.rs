//! Figure construction and export (plotly JSON, HTML, SVG).

mod color;
mod figure;
mod html;
mod plotly;
mod svg;

pub use color::{ColorScale, NO_DATA, Rgb};
pub use figure::{Figure, Fill, LineTrace, Region, format_value};
