use crate::error::Result;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Maps a station id to its measurement file.
///
/// Files are named `<stationId>_<snapshotDate>.<ext>`; a station may have
/// several snapshots, and the lexicographically last stem (the newest ISO
/// date) wins.
#[derive(Debug, Clone)]
pub struct FileResolver {
    data_dir: PathBuf,
    extension: String,
}

impl FileResolver {
    pub fn new(data_dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            data_dir: data_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Path of the newest file for `station_id`, or `None` when the data
    /// directory is missing or holds no matching file.
    pub fn resolve(&self, station_id: &str) -> Option<PathBuf> {
        if station_id.is_empty() {
            debug!("Empty station id never resolves");
            return None;
        }
        if !self.data_dir.is_dir() {
            warn!("Directory {} does not exist", self.data_dir.display());
            return None;
        }

        match self.candidate_stems(station_id) {
            Ok(mut stems) => {
                stems.sort();
                let stem = stems.pop()?;
                let path = self
                    .data_dir
                    .join(format!("{}.{}", stem, self.extension));
                debug!("Resolved station {} to {}", station_id, path.display());
                Some(path)
            }
            Err(e) => {
                warn!(
                    "Failed to list {}: {}",
                    self.data_dir.display(),
                    e
                );
                None
            }
        }
    }

    fn candidate_stems(&self, station_id: &str) -> Result<Vec<String>> {
        let mut stems = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }

            let path = entry.path();
            if path.extension() != Some(OsStr::new(&self.extension)) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem.starts_with(station_id) {
                    stems.push(stem.to_string());
                }
            }
        }

        Ok(stems)
    }
}
