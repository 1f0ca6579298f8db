//! Sequential color scale for choropleth fills.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Linear interpolation between two colors, `t` in [0, 1].
    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb { r: mix(self.r, other.r), g: mix(self.g, other.g), b: mix(self.b, other.b) }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Fill for counties without a production record.
pub const NO_DATA: Rgb = Rgb::new(204, 204, 204);

/// Evenly spaced color stops, interpolated linearly.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    stops: Vec<Rgb>,
}

impl ColorScale {
    /// ColorBrewer YlGn, 9 classes, light yellow (low) to dark green (high).
    pub fn yl_gn() -> Self {
        Self {
            stops: vec![
                Rgb::new(255, 255, 229),
                Rgb::new(247, 252, 185),
                Rgb::new(217, 240, 163),
                Rgb::new(173, 221, 142),
                Rgb::new(120, 198, 121),
                Rgb::new(65, 171, 93),
                Rgb::new(35, 132, 67),
                Rgb::new(0, 104, 55),
                Rgb::new(0, 69, 41),
            ],
        }
    }

    /// Color at position `t`; values outside [0, 1] are clamped and NaN maps to the low end.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last.saturating_sub(1));
        if last == 0 { return self.stops[0] }
        self.stops[i].lerp(self.stops[i + 1], pos - i as f64)
    }

    /// Color for `value` normalized over `[lo, hi]`; a degenerate range maps to the low end.
    pub fn color_for(&self, value: f64, lo: f64, hi: f64) -> Rgb {
        let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
        self.color_at(t)
    }

    /// Stops as plotly colorscale pairs: [[0.0, "rgb(..)"], ..., [1.0, "rgb(..)"]]
    pub fn plotly_stops(&self) -> Vec<(f64, String)> {
        let last = (self.stops.len() - 1).max(1) as f64;
        self.stops.iter().enumerate()
            .map(|(i, color)| (i as f64 / last, color.to_string()))
            .collect()
    }

    #[inline] pub fn low(&self) -> Rgb { self.stops[0] }

    #[inline] pub fn high(&self) -> Rgb { self.stops[self.stops.len() - 1] }
}
