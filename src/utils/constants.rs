/// File names
pub const STATIONS_FILE: &str = "ghcnd-stations.txt";
pub const INVENTORY_FILE: &str = "ghcnd-inventory.txt";
pub const CSV_EXTENSION: &str = "csv";

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6378.388;

/// Elevation value marking a missing elevation in the station file
pub const MISSING_ELEVATION: f64 = -999.9;

/// Default search radius for nearby stations
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Fixed-width column ranges in `ghcnd-stations.txt` (0-based, end exclusive)
pub mod station_columns {
    use std::ops::Range;

    pub const ID: Range<usize> = 0..11;
    pub const LATITUDE: Range<usize> = 12..20;
    pub const LONGITUDE: Range<usize> = 21..30;
    pub const ELEVATION: Range<usize> = 31..37;
    pub const NAME: Range<usize> = 41..71;
}

/// Fixed-width column ranges in `ghcnd-inventory.txt` (0-based, end exclusive)
pub mod inventory_columns {
    use std::ops::Range;

    pub const ID: Range<usize> = 0..11;
    pub const LATITUDE: Range<usize> = 12..20;
    pub const LONGITUDE: Range<usize> = 21..30;
    pub const ELEMENT: Range<usize> = 31..35;
    pub const FIRST_YEAR: Range<usize> = 36..40;
    pub const LAST_YEAR: Range<usize> = 41..45;
}
