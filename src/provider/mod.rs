//! Query façade over the station directory and per-station measurement series.
//!
//! Every aggregate query answers with an ordered mapping. A missing data
//! directory, station file, requested element or year all produce the same
//! result: an empty mapping. Causes are logged, never returned.

pub mod cache;

pub use cache::MeasurementCache;

use crate::config::ProviderConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Element, InventoryEntry, Season, Station};
use crate::processors::{extract_year_range, SegmentedAggregator, StationDirectory};
use crate::readers::{FileResolver, InventoryReader, MeasurementReader};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Owns the measurement cache and the station directory of one data directory.
///
/// Queries take `&mut self` because they may populate the cache; wrap the
/// provider in a mutex to share it between threads.
pub struct DataProvider {
    config: ProviderConfig,
    cache: MeasurementCache,
    directory: Option<StationDirectory>,
    inventory: Option<Vec<InventoryEntry>>,
}

impl DataProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let resolver = FileResolver::new(&config.data_dir, &config.csv_ext);
        let reader = MeasurementReader::new()
            .with_policy(config.malformed_lines)
            .with_mmap(config.use_mmap);

        Self {
            cache: MeasurementCache::new(resolver, reader),
            config,
            directory: None,
            inventory: None,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Average of `element` per year over `start_year..=end_year`.
    pub fn get_yearly_averages(
        &mut self,
        station_id: &str,
        start_year: i32,
        end_year: i32,
        element: Element,
    ) -> BTreeMap<i32, f64> {
        debug!(
            "Yearly {} averages for {} in {}-{}",
            element, station_id, start_year, end_year
        );
        let Some(series) = self.cache.series(station_id) else {
            return BTreeMap::new();
        };

        let interval = extract_year_range(series, start_year, end_year);
        SegmentedAggregator::new(interval, element).yearly_averages()
    }

    /// Average of `element` over `start_month..=end_month` for each year.
    ///
    /// Ranges wrapping past December (e.g. 12..=2) start in December of the
    /// preceding year and are keyed by the year of their final month.
    pub fn get_averages_for_month_range(
        &mut self,
        station_id: &str,
        start_year: i32,
        end_year: i32,
        start_month: u32,
        end_month: u32,
        element: Element,
    ) -> BTreeMap<i32, f64> {
        debug!(
            "{} averages for {} in {}-{}, months {}-{}",
            element, station_id, start_year, end_year, start_month, end_month
        );
        if !(1..=12).contains(&start_month) || !(1..=12).contains(&end_month) {
            warn!("Invalid month range {}-{}", start_month, end_month);
            return BTreeMap::new();
        }
        let Some(series) = self.cache.series(station_id) else {
            return BTreeMap::new();
        };

        let first_year = if start_month > end_month {
            start_year - 1
        } else {
            start_year
        };
        let interval = extract_year_range(series, first_year, end_year);
        SegmentedAggregator::new(interval, element).month_range_averages(start_month, end_month)
    }

    /// Average of `element` per meteorological season.
    pub fn get_season_averages(
        &mut self,
        station_id: &str,
        start_year: i32,
        end_year: i32,
        season: Season,
        element: Element,
    ) -> BTreeMap<i32, f64> {
        let (start_month, end_month) = season.month_range();
        self.get_averages_for_month_range(
            station_id,
            start_year,
            end_year,
            start_month,
            end_month,
            element,
        )
    }

    /// Average of `element` per month of `year`.
    pub fn get_monthly_averages(
        &mut self,
        station_id: &str,
        year: i32,
        element: Element,
    ) -> BTreeMap<u32, f64> {
        debug!("Monthly {} averages for {} in {}", element, station_id, year);
        let Some(series) = self.cache.series(station_id) else {
            return BTreeMap::new();
        };

        let interval = extract_year_range(series, year, year);
        SegmentedAggregator::new(interval, element).monthly_averages(year)
    }

    /// Scaled value of `element` per day of `year`-`month`.
    pub fn get_daily_values(
        &mut self,
        station_id: &str,
        year: i32,
        month: u32,
        element: Element,
    ) -> BTreeMap<u32, f64> {
        debug!(
            "Daily {} values for {} in {}-{:02}",
            element, station_id, year, month
        );
        let Some(series) = self.cache.series(station_id) else {
            return BTreeMap::new();
        };

        let interval = extract_year_range(series, year, year);
        SegmentedAggregator::new(interval, element).daily_values(year, month)
    }

    /// `(station_id, distance_km)` for stations within `radius_km`, nearest first.
    pub fn get_nearest_stations(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Vec<(String, f64)> {
        match self.load_stations() {
            Ok(directory) => directory.find_nearby(latitude, longitude, radius_km),
            Err(e) => {
                warn!("Station directory unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Load the station directory on first use and keep it for later queries.
    pub fn load_stations(&mut self) -> Result<&StationDirectory> {
        let directory = match self.directory.take() {
            Some(directory) => directory,
            None => {
                let path = self.config.station_path();
                let directory = StationDirectory::load(&path, self.config.malformed_lines)?
                    .with_clamp(self.config.haversine_clamp);
                info!(
                    "Loaded {} stations from {}",
                    directory.len(),
                    path.display()
                );
                directory
            }
        };
        Ok(self.directory.insert(directory))
    }

    pub fn get_station(&mut self, station_id: &str) -> Result<Station> {
        self.load_stations()?
            .get(station_id)
            .cloned()
            .ok_or_else(|| ProcessingError::StationNotFound {
                station_id: station_id.to_string(),
            })
    }

    /// Load the station inventory on first use and keep it for later queries.
    pub fn load_inventory(&mut self) -> Result<&[InventoryEntry]> {
        let inventory = match self.inventory.take() {
            Some(inventory) => inventory,
            None => {
                let path = self.config.inventory_path();
                let inventory = InventoryReader::with_policy(self.config.malformed_lines)
                    .read_inventory(&path)?;
                info!(
                    "Loaded {} inventory entries from {}",
                    inventory.len(),
                    path.display()
                );
                inventory
            }
        };
        Ok(self.inventory.insert(inventory).as_slice())
    }

    /// Whether the inventory lists `element` for the station over the whole range.
    pub fn has_measurements_for_year_range(
        &mut self,
        station_id: &str,
        start_year: i32,
        end_year: i32,
        element: Element,
    ) -> bool {
        match self.load_inventory() {
            Ok(inventory) => inventory.iter().any(|entry| {
                entry.station_id == station_id
                    && entry.element == element
                    && entry.covers(start_year, end_year)
            }),
            Err(e) => {
                warn!("Station inventory unavailable: {}", e);
                false
            }
        }
    }

    pub fn cached_station_count(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
