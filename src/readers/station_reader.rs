use crate::config::MalformedLinePolicy;
use crate::error::{ProcessingError, Result};
use crate::models::Station;
use crate::readers::{fixed_field, parse_fixed_field, parse_lines};
use crate::utils::constants::{station_columns, MISSING_ELEVATION};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Reader for the fixed-width `ghcnd-stations.txt` format.
///
/// ```text
/// Variable   Columns   Type
/// ID            1-11   Character
/// LATITUDE     13-20   Real
/// LONGITUDE    22-30   Real
/// ELEVATION    32-37   Real
/// STATE        39-40   Character
/// NAME         42-71   Character
/// GSN FLAG     73-75   Character
/// HCN/CRN FLAG 77-79   Character
/// WMO ID       81-85   Character
/// ```
pub struct StationReader {
    policy: MalformedLinePolicy,
}

impl StationReader {
    pub fn new() -> Self {
        Self {
            policy: MalformedLinePolicy::default(),
        }
    }

    pub fn with_policy(policy: MalformedLinePolicy) -> Self {
        Self { policy }
    }

    /// Read all stations, preserving file order.
    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let stations = parse_lines(reader.split(b'\n'), self.policy, path, parse_station_line)?;
        debug!("Read {} stations from {}", stations.len(), path.display());
        Ok(stations)
    }

}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single line from the stations file.
///
/// The name column is clipped to the line length, so lines that end right
/// after the name are accepted. Numeric columns must be present.
pub fn parse_station_line(line: &str) -> Result<Station> {
    let id = fixed_field(line, station_columns::ID, "station id")?.to_string();
    let latitude: f64 = parse_fixed_field(line, station_columns::LATITUDE, "latitude")?;
    let longitude: f64 = parse_fixed_field(line, station_columns::LONGITUDE, "longitude")?;
    let elevation: f64 = parse_fixed_field(line, station_columns::ELEVATION, "elevation")?;

    let name_end = station_columns::NAME.end.min(line.len());
    let name = line
        .get(station_columns::NAME.start..name_end)
        .unwrap_or("")
        .trim_end()
        .to_string();

    let elevation = if (elevation - MISSING_ELEVATION).abs() < 1e-6 {
        None
    } else {
        Some(elevation)
    };

    let station = Station::new(id, latitude, longitude, elevation, name);
    station.validate().map_err(|e| {
        ProcessingError::InvalidFormat(format!("Station {} out of range: {}", station.id, e))
    })?;
    Ok(station)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const JOHNS: &str =
        "ACW00011604  17.1167  -61.7833   10.1    ST JOHNS COOLIDGE FLD                       ";
    const SHARJAH: &str =
        "AE000041196  25.3330   55.5170   34.0    SHARJAH INTER. AIRP            GSN     41196";

    #[test]
    fn test_parse_station_line() {
        let station = parse_station_line(JOHNS).unwrap();

        assert_eq!(station.id, "ACW00011604");
        assert_eq!(station.latitude, 17.1167);
        assert_eq!(station.longitude, -61.7833);
        assert_eq!(station.elevation, Some(10.1));
        assert_eq!(station.name, "ST JOHNS COOLIDGE FLD");
    }

    #[test]
    fn test_trailing_columns_ignored() {
        let station = parse_station_line(SHARJAH).unwrap();
        assert_eq!(station.id, "AE000041196");
        assert_eq!(station.name, "SHARJAH INTER. AIRP");
    }

    #[test]
    fn test_missing_elevation_sentinel() {
        let line = "USC00000001  40.0000 -100.0000 -999.9    PLAINS";
        let station = parse_station_line(line).unwrap();
        assert_eq!(station.elevation, None);
        assert_eq!(station.name, "PLAINS");
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_station_line("ACW00011604  17.1167").is_err());
        let bad_lat = "ACW00011604  17.1X67  -61.7833   10.1    ST JOHNS";
        assert!(matches!(
            parse_station_line(bad_lat),
            Err(ProcessingError::InvalidFormat(_))
        ));

        let bad_range = "XXW00000001  97.1167  -61.7833   10.1    NOWHERE";
        assert!(matches!(
            parse_station_line(bad_range),
            Err(ProcessingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_round_trip_fixed_width() {
        let station = parse_station_line(JOHNS).unwrap();
        let reparsed = parse_station_line(&station.to_fixed_width()).unwrap();

        assert_eq!(reparsed.id, station.id);
        assert!((reparsed.latitude - station.latitude).abs() < 1e-9);
        assert!((reparsed.longitude - station.longitude).abs() < 1e-9);
        assert_eq!(reparsed.elevation, station.elevation);
        assert_eq!(reparsed.name, station.name);
    }

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", JOHNS)?;
        writeln!(temp_file)?;
        writeln!(temp_file, "{}", SHARJAH)?;

        let stations = StationReader::new().read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "ACW00011604");
        assert_eq!(stations[1].id, "AE000041196");
        Ok(())
    }

    #[test]
    fn test_read_stations_policy() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", JOHNS)?;
        writeln!(temp_file, "garbage")?;
        writeln!(temp_file, "{}", SHARJAH)?;

        let aborted = StationReader::new().read_stations(temp_file.path());
        assert!(matches!(
            aborted,
            Err(ProcessingError::InvalidLine { line: 2, .. })
        ));

        let skipped = StationReader::with_policy(MalformedLinePolicy::Skip)
            .read_stations(temp_file.path())?;
        assert_eq!(skipped.len(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_station_line_is_skipped() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", JOHNS)?;
        temp_file.write_all(b"AE000041196  25.3330   55.5170   34.0    SHARJAH \xe9\n")?;
        writeln!(temp_file, "{}", SHARJAH)?;

        assert!(matches!(
            StationReader::new().read_stations(temp_file.path()),
            Err(ProcessingError::InvalidLine { line: 2, .. })
        ));

        let stations = StationReader::with_policy(MalformedLinePolicy::Skip)
            .read_stations(temp_file.path())?;
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].name, "SHARJAH INTER. AIRP");
        Ok(())
    }
}
