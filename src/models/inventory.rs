use serde::{Deserialize, Serialize};

use super::Element;

/// One line of `ghcnd-inventory.txt`: the span of years for which a station
/// reports a given element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub element: Element,
    pub first_year: i32,
    pub last_year: i32,
}

impl InventoryEntry {
    pub fn covers(&self, start_year: i32, end_year: i32) -> bool {
        self.first_year <= start_year && self.last_year >= end_year
    }
}
