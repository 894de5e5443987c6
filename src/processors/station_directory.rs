use crate::config::MalformedLinePolicy;
use crate::error::Result;
use crate::models::Station;
use crate::readers::StationReader;
use crate::utils::{haversine_distance_with_clamp, HaversineClamp};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// In-memory station list in file order, with distance-based lookup.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
    /// Station id to position in `stations`; the first occurrence wins.
    index: HashMap<String, usize>,
    clamp: HaversineClamp,
}

impl StationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        let mut index = HashMap::with_capacity(stations.len());
        for (position, station) in stations.iter().enumerate() {
            index.entry(station.id.clone()).or_insert(position);
        }

        Self {
            stations,
            index,
            clamp: HaversineClamp::default(),
        }
    }

    pub fn load(path: &Path, policy: MalformedLinePolicy) -> Result<Self> {
        let stations = StationReader::with_policy(policy).read_stations(path)?;
        Ok(Self::new(stations))
    }

    pub fn with_clamp(mut self, clamp: HaversineClamp) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, station_id: &str) -> Option<&Station> {
        self.index.get(station_id).map(|&position| &self.stations[position])
    }

    /// `(index, distance_km)` of every station within `radius_km` of the
    /// point, nearest first. Ties may come out in any order.
    pub fn nearby_indices(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Vec<(usize, f64)> {
        let clamp = self.clamp;
        let mut nearby: Vec<(usize, f64)> = self
            .stations
            .par_iter()
            .enumerate()
            .filter_map(|(index, station)| {
                let distance = haversine_distance_with_clamp(
                    latitude,
                    longitude,
                    station.latitude,
                    station.longitude,
                    clamp,
                );
                (distance <= radius_km).then_some((index, distance))
            })
            .collect();

        nearby.sort_unstable_by(|a, b| a.1.total_cmp(&b.1));
        nearby
    }

    /// `(station_id, distance_km)` pairs within `radius_km`, nearest first.
    pub fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Vec<(String, f64)> {
        self.nearby_indices(latitude, longitude, radius_km)
            .into_iter()
            .map(|(index, distance)| (self.stations[index].id.clone(), distance))
            .collect()
    }
}
