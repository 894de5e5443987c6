pub mod file_resolver;
pub mod inventory_reader;
pub mod measurement_reader;
pub mod station_reader;

pub use file_resolver::FileResolver;
pub use inventory_reader::InventoryReader;
pub use measurement_reader::MeasurementReader;
pub use station_reader::StationReader;

use crate::config::MalformedLinePolicy;
use crate::error::{ProcessingError, Result};
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Decode every non-empty line, applying `policy` to lines that fail to parse.
///
/// Lines arrive as raw bytes split on `\n`; invalid UTF-8 is a malformed line
/// like any other.
pub(crate) fn parse_lines<I, S, T, F>(
    lines: I,
    policy: MalformedLinePolicy,
    source: &Path,
    mut parse: F,
) -> Result<Vec<T>>
where
    I: Iterator<Item = std::io::Result<S>>,
    S: AsRef<[u8]>,
    F: FnMut(&str) -> Result<T>,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, line_result) in lines.enumerate() {
        let raw = line_result?;
        let line_number = index + 1;

        let parsed = decode_line(raw.as_ref()).and_then(|line| {
            // Skip empty lines
            if line.trim().is_empty() {
                Ok(None)
            } else {
                parse(line).map(Some)
            }
        });

        match parsed {
            Ok(None) => {}
            Ok(Some(record)) => records.push(record),
            Err(e) => match policy {
                MalformedLinePolicy::Abort => return Err(e.at_line(line_number)),
                MalformedLinePolicy::Skip => {
                    warn!(
                        "Skipping malformed line {} in {}: {}",
                        line_number,
                        source.display(),
                        e
                    );
                    skipped += 1;
                }
            },
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed lines in {}", skipped, source.display());
    }

    Ok(records)
}

fn decode_line(raw: &[u8]) -> Result<&str> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;
    Ok(line.strip_suffix('\r').unwrap_or(line))
}

/// Slice a fixed-width column, failing when the line is too short.
pub(crate) fn fixed_field<'a>(line: &'a str, columns: Range<usize>, name: &str) -> Result<&'a str> {
    line.get(columns.clone()).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!(
            "Missing {} field at columns {}-{} (line has {} characters)",
            name,
            columns.start,
            columns.end - 1,
            line.len()
        ))
    })
}

/// Slice and parse a fixed-width numeric column. Surrounding blanks are ignored.
pub(crate) fn parse_fixed_field<T: FromStr>(
    line: &str,
    columns: Range<usize>,
    name: &str,
) -> Result<T> {
    let raw = fixed_field(line, columns, name)?;
    raw.trim().parse::<T>().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Invalid {}: '{}'", name, raw.trim()))
    })
}
