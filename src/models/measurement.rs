use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Core GHCN-Daily elements.
///
/// Values are stored as integers in tenths of the natural unit:
/// PRCP (0.1 mm), SNOW (0.1 mm), SNWD (0.1 mm), TMAX (0.1 °C), TMIN (0.1 °C).
/// Element codes outside this set decode to `Unknown`; such records are kept
/// but never take part in a type-filtered aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Element {
    Prcp,
    Snow,
    Snwd,
    Tmax,
    Tmin,
    Unknown,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Prcp,
        Element::Snow,
        Element::Snwd,
        Element::Tmax,
        Element::Tmin,
    ];

    /// Decode an element code. Unrecognised codes map to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "PRCP" => Element::Prcp,
            "SNOW" => Element::Snow,
            "SNWD" => Element::Snwd,
            "TMAX" => Element::Tmax,
            "TMIN" => Element::Tmin,
            _ => Element::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Element::Prcp => "PRCP",
            Element::Snow => "SNOW",
            Element::Snwd => "SNWD",
            Element::Tmax => "TMAX",
            Element::Tmin => "TMIN",
            Element::Unknown => "UNKNOWN",
        }
    }

    /// Factor converting stored integer units to natural units.
    ///
    /// `None` for `Unknown`, which has no defined unit.
    pub fn scaling(&self) -> Option<f64> {
        match self {
            Element::Prcp | Element::Snow | Element::Snwd | Element::Tmax | Element::Tmin => {
                Some(0.1)
            }
            Element::Unknown => None,
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Element::Tmax | Element::Tmin => "°C",
            Element::Prcp | Element::Snow | Element::Snwd => "mm",
            Element::Unknown => "",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Element {
    type Err = ProcessingError;

    /// Strict parse used for user input: unknown codes are rejected instead of
    /// degrading to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Element::from_code(&s.to_ascii_uppercase()) {
            Element::Unknown => Err(ProcessingError::InvalidFormat(format!(
                "Unknown element code: '{}'",
                s
            ))),
            element => Ok(element),
        }
    }
}

/// One daily observation of one element at one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub date: NaiveDate,
    /// Raw value as stored, unscaled.
    pub value: i32,
    pub element: Element,
}

impl Measurement {
    pub fn new(date: NaiveDate, value: i32, element: Element) -> Self {
        Self {
            date,
            value,
            element,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_codes() {
        for element in Element::ALL {
            assert_eq!(Element::from_code(element.code()), element);
            assert_eq!(element.scaling(), Some(0.1));
        }
        assert_eq!(Element::from_code("TAVG"), Element::Unknown);
        assert_eq!(Element::from_code("tmax"), Element::Unknown);
        assert_eq!(Element::Unknown.scaling(), None);
    }

    #[test]
    fn test_element_from_str() {
        assert_eq!("tmax".parse::<Element>().unwrap(), Element::Tmax);
        assert_eq!("PRCP".parse::<Element>().unwrap(), Element::Prcp);
        assert!("WSFG".parse::<Element>().is_err());
    }

    #[test]
    fn test_measurement_accessors() {
        let date = NaiveDate::from_ymd_opt(1960, 12, 24).unwrap();
        let m = Measurement::new(date, -43, Element::Tmax);

        assert_eq!(m.year(), 1960);
        assert_eq!(m.month(), 12);
        assert_eq!(m.day(), 24);
        assert_eq!(m.value, -43);
    }
}
