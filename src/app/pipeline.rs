//! Shared "load datasets" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the provider wiring:
//! snapshot file or remote tables -> fallback on failure -> view engine.

use crate::data::{DatasetProvider, FallbackProvider, SupabaseClient};
use crate::domain::{RadarConfig, Snapshot};
use crate::error::AppError;
use crate::io::SnapshotFile;
use crate::view::ViewState;

/// Pick the primary provider for `config` and wrap it in the fallback strategy.
///
/// A snapshot file takes precedence over the remote source; `offline` skips
/// the primary entirely.
pub fn build_provider(config: &RadarConfig) -> Result<FallbackProvider, AppError> {
    let primary: Option<Box<dyn DatasetProvider>> = match &config.data_file {
        Some(path) => Some(Box::new(SnapshotFile::new(path))),
        None if config.offline => None,
        None => Some(Box::new(SupabaseClient::from_env(config.timeout)?)),
    };
    Ok(FallbackProvider::new(primary, config.seed))
}

/// Load one snapshot. Always succeeds once the provider is built.
pub fn load_snapshot(config: &RadarConfig) -> Result<Snapshot, AppError> {
    Ok(build_provider(config)?.load())
}

/// Fresh view engine with the configured initial sort and search.
pub fn new_view_state(config: &RadarConfig) -> ViewState {
    ViewState::new(config.sort, config.search.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataSource;

    #[test]
    fn offline_config_loads_generated_data() {
        let config = RadarConfig {
            offline: true,
            ..RadarConfig::default()
        };
        let snap = load_snapshot(&config).unwrap();
        assert_eq!(snap.source, DataSource::Fallback { reason: None });
        assert!(!snap.datasets.instruments.is_empty());
    }

    #[test]
    fn unreadable_snapshot_file_falls_back_with_reason() {
        let config = RadarConfig {
            data_file: Some("no/such/snapshot.json".into()),
            ..RadarConfig::default()
        };
        let snap = load_snapshot(&config).unwrap();
        match snap.source {
            DataSource::Fallback { reason: Some(reason) } => assert!(reason.contains("snapshot")),
            other => panic!("unexpected source {other:?}"),
        }
    }
}
