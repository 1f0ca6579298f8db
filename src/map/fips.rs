use std::{fmt, str::FromStr};

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

/// Composite county identifier: 2-digit state FIPS followed by 3-digit county FIPS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountyFips(String);

impl CountyFips {
    /// Build the identifier from separate state and county codes, zero-padding each.
    /// Accepts codes that are already padded ("05", "001") or not ("5", "1").
    pub fn from_codes(state: &str, county: &str) -> Result<Self> {
        fn pad(code: &str, width: usize, what: &str) -> Result<String> {
            let code = code.trim();
            ensure!(!code.is_empty(), "empty {what} code");
            ensure!(code.bytes().all(|b| b.is_ascii_digit()), "{what} code {code:?} is not numeric");

            // Tolerate extra leading zeros, but not codes that are genuinely too wide.
            let digits = code.trim_start_matches('0');
            ensure!(digits.len() <= width, "{what} code {code:?} is wider than {width} digits");
            Ok(format!("{digits:0>width$}"))
        }

        Ok(Self(format!("{}{}", pad(state, 2, "state")?, pad(county, 3, "county")?)))
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// The 2-digit state part.
    #[inline] pub fn state(&self) -> &str { &self.0[..2] }

    /// The 3-digit county part.
    #[inline] pub fn county(&self) -> &str { &self.0[2..] }

    /// Name of the state this county belongs to, if the state code is known.
    pub fn state_name(&self) -> Option<&'static str> { state_name(self.state()) }
}

impl fmt::Display for CountyFips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for CountyFips {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
            bail!("county FIPS must be exactly 5 digits, got {s:?}");
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CountyFips {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> { value.parse() }
}

impl From<CountyFips> for String {
    fn from(value: CountyFips) -> Self { value.0 }
}

/// Return the state name for a two-digit state FIPS code.
/// Includes 50 states + DC + PR.
pub fn state_name(fips: &str) -> Option<&'static str> {
    match fips {
        "01" => Some("Alabama"),
        "02" => Some("Alaska"),
        "04" => Some("Arizona"),
        "05" => Some("Arkansas"),
        "06" => Some("California"),
        "08" => Some("Colorado"),
        "09" => Some("Connecticut"),
        "10" => Some("Delaware"),
        "11" => Some("District of Columbia"),
        "12" => Some("Florida"),
        "13" => Some("Georgia"),
        "15" => Some("Hawaii"),
        "16" => Some("Idaho"),
        "17" => Some("Illinois"),
        "18" => Some("Indiana"),
        "19" => Some("Iowa"),
        "20" => Some("Kansas"),
        "21" => Some("Kentucky"),
        "22" => Some("Louisiana"),
        "23" => Some("Maine"),
        "24" => Some("Maryland"),
        "25" => Some("Massachusetts"),
        "26" => Some("Michigan"),
        "27" => Some("Minnesota"),
        "28" => Some("Mississippi"),
        "29" => Some("Missouri"),
        "30" => Some("Montana"),
        "31" => Some("Nebraska"),
        "32" => Some("Nevada"),
        "33" => Some("New Hampshire"),
        "34" => Some("New Jersey"),
        "35" => Some("New Mexico"),
        "36" => Some("New York"),
        "37" => Some("North Carolina"),
        "38" => Some("North Dakota"),
        "39" => Some("Ohio"),
        "40" => Some("Oklahoma"),
        "41" => Some("Oregon"),
        "42" => Some("Pennsylvania"),
        "44" => Some("Rhode Island"),
        "45" => Some("South Carolina"),
        "46" => Some("South Dakota"),
        "47" => Some("Tennessee"),
        "48" => Some("Texas"),
        "49" => Some("Utah"),
        "50" => Some("Vermont"),
        "51" => Some("Virginia"),
        "53" => Some("Washington"),
        "54" => Some("West Virginia"),
        "55" => Some("Wisconsin"),
        "56" => Some("Wyoming"),
        "72" => Some("Puerto Rico"),
        _ => None,
    }
}
