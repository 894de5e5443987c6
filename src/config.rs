//! Configuration for a [`DataProvider`](crate::provider::DataProvider).
//!
//! Values are layered: built-in defaults, then an optional config file, then
//! `GHCN_*` environment variables (e.g. `GHCN_DATA_DIR=/data/ghcn`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::constants::{CSV_EXTENSION, INVENTORY_FILE, STATIONS_FILE};
use crate::utils::HaversineClamp;

/// What a reader does with a line it cannot decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Fail the whole load.
    #[default]
    Abort,
    /// Log a warning and continue with the next line.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Directory holding the station list, inventory and per-station CSV files.
    pub data_dir: PathBuf,
    pub station_file: String,
    pub inventory_file: String,
    /// Extension of per-station measurement files, without the leading dot.
    pub csv_ext: String,
    pub malformed_lines: MalformedLinePolicy,
    pub haversine_clamp: HaversineClamp,
    pub use_mmap: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            station_file: STATIONS_FILE.to_string(),
            inventory_file: INVENTORY_FILE.to_string(),
            csv_ext: CSV_EXTENSION.to_string(),
            malformed_lines: MalformedLinePolicy::default(),
            haversine_clamp: HaversineClamp::default(),
            use_mmap: false,
        }
    }
}

impl ProviderConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from an optional file layered with `GHCN_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("GHCN"))
            .build()?;

        let mut cfg: ProviderConfig = settings.try_deserialize()?;
        cfg.csv_ext = cfg.csv_ext.trim_start_matches('.').to_string();
        Ok(cfg)
    }

    pub fn with_station_file(mut self, station_file: impl Into<String>) -> Self {
        self.station_file = station_file.into();
        self
    }

    pub fn with_inventory_file(mut self, inventory_file: impl Into<String>) -> Self {
        self.inventory_file = inventory_file.into();
        self
    }

    pub fn with_malformed_lines(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }

    pub fn with_haversine_clamp(mut self, clamp: HaversineClamp) -> Self {
        self.haversine_clamp = clamp;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn station_path(&self) -> PathBuf {
        self.data_dir.join(&self.station_file)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir.join(&self.inventory_file)
    }
}
