use crate::error::Result;
use crate::models::Measurement;
use crate::readers::{FileResolver, MeasurementReader};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Parsed measurement series keyed by station id.
///
/// A station is read from disk at most once per successful load. Entries are
/// never evicted; the cache lives as long as its owner or until `clear`.
/// Failed or empty loads are not cached, so they are retried on the next query.
pub struct MeasurementCache {
    resolver: FileResolver,
    reader: MeasurementReader,
    series: HashMap<String, Vec<Measurement>>,
}

impl MeasurementCache {
    pub fn new(resolver: FileResolver, reader: MeasurementReader) -> Self {
        Self {
            resolver,
            reader,
            series: HashMap::new(),
        }
    }

    /// Make sure `station_id` is cached. Returns `false` when no usable series
    /// could be loaded.
    pub fn ensure_loaded(&mut self, station_id: &str) -> bool {
        if self.series.contains_key(station_id) {
            debug!("Cache hit for station {}", station_id);
            return true;
        }

        match self.load(station_id) {
            Ok(Some(series)) => {
                debug!(
                    "Cached {} measurements for station {}",
                    series.len(),
                    station_id
                );
                self.series.insert(station_id.to_string(), series);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to load measurements for station {}: {}", station_id, e);
                false
            }
        }
    }

    /// Cached series for `station_id`, loading it first if needed.
    pub fn series(&mut self, station_id: &str) -> Option<&[Measurement]> {
        if !self.ensure_loaded(station_id) {
            return None;
        }
        self.series.get(station_id).map(Vec::as_slice)
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.series.contains_key(station_id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    fn load(&self, station_id: &str) -> Result<Option<Vec<Measurement>>> {
        let path = match self.resolver.resolve(station_id) {
            Some(path) => path,
            None => {
                debug!("No measurement file for station {}", station_id);
                return Ok(None);
            }
        };

        let series = self.reader.read_measurements(&path)?;
        if series.is_empty() {
            debug!("No measurements in {}", path.display());
            return Ok(None);
        }
        Ok(Some(series))
    }
}
