use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Crops with county production tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Corn,
    Soybeans,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crop {0:?} (expected one of: corn, soybeans)")]
pub struct UnknownCrop(pub String);

impl Crop {
    pub const ALL: [Crop; 2] = [Crop::Corn, Crop::Soybeans];

    /// Lowercase key used in file names and selectors.
    pub fn as_str(self) -> &'static str {
        match self {
            Crop::Corn => "corn",
            Crop::Soybeans => "soybeans",
        }
    }

    /// Capitalized label for titles and dropdowns.
    pub fn label(self) -> &'static str {
        match self {
            Crop::Corn => "Corn",
            Crop::Soybeans => "Soybeans",
        }
    }

    /// Commodity name in the NASS Quick Stats API.
    pub fn commodity(self) -> &'static str {
        match self {
            Crop::Corn => "CORN",
            Crop::Soybeans => "SOYBEANS",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Crop {
    type Err = UnknownCrop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crop::ALL.into_iter()
            .find(|crop| crop.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCrop(s.trim().to_string()))
    }
}
