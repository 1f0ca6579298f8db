use crate::{config::YearRange, production::Crop};

/// Overlay toggles. Overlays only add line traces; they never change the choropleth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlays {
    pub rivers: bool,
}

impl Default for Overlays {
    fn default() -> Self { Self { rivers: true } }
}

/// Current state of the three selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub crop: Crop,
    pub year: u16,
    pub overlays: Overlays,
}

impl Selection {
    /// Corn, the most recent year of `years`, rivers on.
    pub fn latest(years: YearRange) -> Self {
        Self { crop: Crop::Corn, year: years.last, overlays: Overlays::default() }
    }
}

impl Default for Selection {
    fn default() -> Self { Self::latest(YearRange::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_corn_2023_with_rivers() {
        let selection = Selection::default();
        assert_eq!(selection.crop, Crop::Corn);
        assert_eq!(selection.year, 2023);
        assert!(selection.overlays.rivers);
    }
}
