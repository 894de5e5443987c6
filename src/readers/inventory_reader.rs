use crate::config::MalformedLinePolicy;
use crate::error::Result;
use crate::models::{Element, InventoryEntry};
use crate::readers::{fixed_field, parse_fixed_field, parse_lines};
use crate::utils::constants::inventory_columns;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reader for the fixed-width `ghcnd-inventory.txt` format.
///
/// ```text
/// Variable   Columns   Type
/// ID            1-11   Character
/// LATITUDE     13-20   Real
/// LONGITUDE    22-30   Real
/// ELEMENT      32-35   Character
/// FIRSTYEAR    37-40   Integer
/// LASTYEAR     42-45   Integer
/// ```
pub struct InventoryReader {
    policy: MalformedLinePolicy,
}

impl InventoryReader {
    pub fn new() -> Self {
        Self {
            policy: MalformedLinePolicy::default(),
        }
    }

    pub fn with_policy(policy: MalformedLinePolicy) -> Self {
        Self { policy }
    }

    pub fn read_inventory(&self, path: &Path) -> Result<Vec<InventoryEntry>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let entries = parse_lines(reader.split(b'\n'), self.policy, path, parse_inventory_line)?;
        debug!("Read {} inventory entries from {}", entries.len(), path.display());
        Ok(entries)
    }
}

impl Default for InventoryReader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_inventory_line(line: &str) -> Result<InventoryEntry> {
    Ok(InventoryEntry {
        station_id: fixed_field(line, inventory_columns::ID, "station id")?.to_string(),
        latitude: parse_fixed_field(line, inventory_columns::LATITUDE, "latitude")?,
        longitude: parse_fixed_field(line, inventory_columns::LONGITUDE, "longitude")?,
        element: Element::from_code(
            fixed_field(line, inventory_columns::ELEMENT, "element")?.trim(),
        ),
        first_year: parse_fixed_field(line, inventory_columns::FIRST_YEAR, "first year")?,
        last_year: parse_fixed_field(line, inventory_columns::LAST_YEAR, "last year")?,
    })
}
