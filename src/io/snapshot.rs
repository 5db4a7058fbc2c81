//! Read/write snapshot JSON files.
//!
//! A snapshot file is the portable form of one refresh: both datasets plus
//! their as-of timestamp, using the same column names as the remote tables.
//! It can be replayed later with `--data <FILE>`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::data::provider::{DatasetProvider, FetchFailure};
use crate::domain::{DataSource, Datasets};
use crate::error::AppError;

/// Write a snapshot JSON file.
pub fn write_snapshot_json(path: &Path, datasets: &Datasets) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create snapshot '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, datasets)
        .map_err(|e| AppError::usage(format!("Failed to write snapshot JSON: {e}")))?;
    Ok(())
}

/// Read a snapshot JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<Datasets, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open snapshot '{}': {e}", path.display())))?;
    let datasets: Datasets = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::usage(format!("Invalid snapshot JSON '{}': {e}", path.display())))?;
    Ok(datasets)
}

/// Provider replaying a snapshot file.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetProvider for SnapshotFile {
    fn fetch_datasets(&self) -> Result<Datasets, FetchFailure> {
        read_snapshot_json(&self.path).map_err(|e| FetchFailure::Request(e.to_string()))
    }

    fn source(&self) -> DataSource {
        DataSource::File(self.path.clone())
    }
}
