use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::constants::MISSING_ELEVATION;

/// Station metadata as listed in `ghcnd-stations.txt`.
///
/// The id is an opaque 11-character code: FIPS country code (2), network
/// code (1), then the station number within that network (8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[validate(length(min = 1))]
    pub id: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Metres above sea level; `None` when the file carries the -999.9 sentinel.
    pub elevation: Option<f64>,

    pub name: String,
}

impl Station {
    pub fn new(
        id: String,
        latitude: f64,
        longitude: f64,
        elevation: Option<f64>,
        name: String,
    ) -> Self {
        Self {
            id,
            latitude,
            longitude,
            elevation,
            name,
        }
    }

    /// Render the station back into the fixed-width column layout it was read from.
    ///
    /// Columns not modelled here (state, flags, WMO id) are left blank.
    pub fn to_fixed_width(&self) -> String {
        format!(
            "{:<11} {:>8.4} {:>9.4} {:>6.1}    {:<30}",
            self.id,
            self.latitude,
            self.longitude,
            self.elevation.unwrap_or(MISSING_ELEVATION),
            self.name
        )
    }
}
