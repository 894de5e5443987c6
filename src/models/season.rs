use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Meteorological seasons, named for the Northern hemisphere.
///
/// | Northern | Southern | Start | End                |
/// |----------|----------|-------|--------------------|
/// | Winter   | Summer   | 1 Dec | 28 Feb (29 leap)   |
/// | Spring   | Autumn   | 1 Mar | 31 May             |
/// | Summer   | Winter   | 1 Jun | 31 Aug             |
/// | Autumn   | Spring   | 1 Sep | 30 Nov             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
    Year,
}

impl Season {
    /// Inclusive `(start_month, end_month)`; winter wraps past December.
    pub fn month_range(&self) -> (u32, u32) {
        match self {
            Season::Winter => (12, 2),
            Season::Spring => (3, 5),
            Season::Summer => (6, 8),
            Season::Autumn => (9, 11),
            Season::Year => (1, 12),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Year => "year",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Season {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "winter" | "djf" => Ok(Season::Winter),
            "spring" | "mam" => Ok(Season::Spring),
            "summer" | "jja" => Ok(Season::Summer),
            "autumn" | "fall" | "son" => Ok(Season::Autumn),
            "year" | "annual" => Ok(Season::Year),
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Unknown season: '{}'",
                s
            ))),
        }
    }
}
