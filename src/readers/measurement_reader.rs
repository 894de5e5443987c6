use crate::config::MalformedLinePolicy;
use crate::error::{ProcessingError, Result};
use crate::models::{Element, Measurement};
use crate::readers::parse_lines;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use chrono::NaiveDate;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Reader for per-station GHCN-Daily CSV files.
///
/// Each line is `STATION,YYYYMMDD,ELEMENT,VALUE[,...]`. Only the first four
/// comma-delimited tokens are decoded; anything after them is ignored.
pub struct MeasurementReader {
    policy: MalformedLinePolicy,
    use_mmap: bool,
}

impl MeasurementReader {
    pub fn new() -> Self {
        Self {
            policy: MalformedLinePolicy::default(),
            use_mmap: false,
        }
    }

    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read a station's measurement series in chronological order.
    pub fn read_measurements(&self, path: &Path) -> Result<Vec<Measurement>> {
        let mut measurements = if self.use_mmap {
            self.read_measurements_mmap(path)?
        } else {
            self.read_measurements_buffered(path)?
        };

        ensure_chronological(&mut measurements, path);
        debug!(
            "Read {} measurements from {}",
            measurements.len(),
            path.display()
        );
        Ok(measurements)
    }

    fn read_measurements_buffered(&self, path: &Path) -> Result<Vec<Measurement>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        parse_lines(reader.split(b'\n'), self.policy, path, parse_measurement_line)
    }

    /// Memory-mapped variant for large files
    fn read_measurements_mmap(&self, path: &Path) -> Result<Vec<Measurement>> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }
        // The mapping is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };

        parse_lines(
            mmap.split(|&b| b == b'\n').map(Ok::<_, std::io::Error>),
            self.policy,
            path,
            parse_measurement_line,
        )
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one measurement line.
///
/// Tokens are taken in order as the next non-empty run of characters between
/// commas, so the station id, date, element and value are located
/// positionally and trailing fields never influence the result.
pub fn parse_measurement_line(line: &str) -> Result<Measurement> {
    let mut tokens = line.split(',').filter(|token| !token.is_empty());

    let mut next_token = |name: &str| {
        tokens.next().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Missing {} in '{}'", name, line))
        })
    };

    let _station_id = next_token("station id")?;
    let date_str = next_token("date")?;
    let element = next_token("element")?;
    let value_str = next_token("value")?;

    let date_str = date_str.trim();
    if date_str.len() != 8 || !date_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Invalid date format: '{}'",
            date_str
        )));
    }
    let date = NaiveDate::parse_from_str(date_str, "%Y%m%d")
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid date: '{}'", date_str)))?;

    let value = value_str.trim().parse::<i32>().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Invalid value: '{}'", value_str))
    })?;

    Ok(Measurement::new(date, value, Element::from_code(element.trim())))
}

/// Restore chronological order if the file was not sorted by date.
///
/// The sort is stable, so records sharing a date keep their file order.
fn ensure_chronological(measurements: &mut [Measurement], path: &Path) {
    let sorted = measurements.windows(2).all(|w| w[0].date <= w[1].date);
    if !sorted {
        warn!(
            "Measurements in {} are not in chronological order; sorting",
            path.display()
        );
        measurements.sort_by_key(|m| m.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_measurement_line() {
        let line = "GME00102380,19600101,TMAX,23,,,E,";
        let m = parse_measurement_line(line).unwrap();

        assert_eq!(m.year(), 1960);
        assert_eq!(m.month(), 1);
        assert_eq!(m.day(), 1);
        assert_eq!(m.value, 23);
        assert_eq!(m.element, Element::Tmax);
    }

    #[test]
    fn test_trailing_fields_ignored() {
        let line = "GME00102380,20001223,TMIN,-43,\"unbalanced,quote,junk,,";
        let m = parse_measurement_line(line).unwrap();
        assert_eq!(m.value, -43);
        assert_eq!(m.element, Element::Tmin);
    }

    #[test]
    fn test_unknown_element_is_kept() {
        let m = parse_measurement_line("GME00102380,20001223,WT01,1,,,E,").unwrap();
        assert_eq!(m.element, Element::Unknown);
        assert_eq!(m.value, 1);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_measurement_line("GME00102380,20001223,TMAX").is_err());
        assert!(parse_measurement_line("GME00102380,2000122,TMAX,10").is_err());
        assert!(parse_measurement_line("GME00102380,20001232,TMAX,10").is_err());
        assert!(parse_measurement_line("GME00102380,20001223,TMAX,ten").is_err());
    }

    fn write_series(lines: &[&str]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_read_buffered_and_mmap() -> Result<()> {
        let temp_file = write_series(&[
            "GME00102380,19600101,TMAX,23,,,E,",
            "GME00102380,19600101,TMIN,-12,,,E,",
            "",
            "GME00102380,19600102,TMAX,31,,,E,",
        ]);

        let buffered = MeasurementReader::new().read_measurements(temp_file.path())?;
        let mapped = MeasurementReader::new()
            .with_mmap(true)
            .read_measurements(temp_file.path())?;

        assert_eq!(buffered.len(), 3);
        assert_eq!(buffered, mapped);
        Ok(())
    }

    #[test]
    fn test_empty_file() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        assert!(MeasurementReader::new()
            .read_measurements(temp_file.path())?
            .is_empty());
        assert!(MeasurementReader::new()
            .with_mmap(true)
            .read_measurements(temp_file.path())?
            .is_empty());
        Ok(())
    }

    #[test]
    fn test_unsorted_file_is_sorted_stably() -> Result<()> {
        let temp_file = write_series(&[
            "GME00102380,19600102,TMAX,31",
            "GME00102380,19600101,TMAX,23",
            "GME00102380,19600101,TMIN,-12",
        ]);

        let series = MeasurementReader::new().read_measurements(temp_file.path())?;

        let days: Vec<u32> = series.iter().map(|m| m.day()).collect();
        assert_eq!(days, vec![1, 1, 2]);
        assert_eq!(series[0].element, Element::Tmax);
        assert_eq!(series[1].element, Element::Tmin);
        Ok(())
    }

    #[test]
    fn test_malformed_line_policy() -> Result<()> {
        let temp_file = write_series(&[
            "GME00102380,19600101,TMAX,23",
            "GME00102380,19600102,TMAX,n/a",
            "GME00102380,19600103,TMAX,40",
        ]);

        let aborted = MeasurementReader::new().read_measurements(temp_file.path());
        assert!(matches!(
            aborted,
            Err(ProcessingError::InvalidLine { line: 2, .. })
        ));

        let skipped = MeasurementReader::new()
            .with_policy(MalformedLinePolicy::Skip)
            .read_measurements(temp_file.path())?;
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[1].value, 40);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_line_follows_policy() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"GME00102380,19600101,TMAX,23\n")?;
        temp_file.write_all(b"GME00102380,19600102,TMAX,\xff\xfe\n")?;
        temp_file.write_all(b"GME00102380,19600103,TMAX,40\r\n")?;

        for use_mmap in [false, true] {
            let reader = MeasurementReader::new().with_mmap(use_mmap);
            assert!(matches!(
                reader.read_measurements(temp_file.path()),
                Err(ProcessingError::InvalidLine { line: 2, .. })
            ));

            let skipped = reader
                .with_policy(MalformedLinePolicy::Skip)
                .read_measurements(temp_file.path())?;
            assert_eq!(skipped.len(), 2);
            assert_eq!(skipped[1].value, 40);
        }
        Ok(())
    }
}
