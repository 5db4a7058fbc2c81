//! Dataset providers and the fallback strategy.
//!
//! The view engine only ever sees a `Snapshot`. Whether the datasets came from
//! the remote tables, a file, or the deterministic substitute is decided here
//! and forwarded as a display-only `DataSource`.

use tracing::{info, warn};

use crate::data::sample::generate_sample;
use crate::domain::{DataSource, Datasets, Snapshot};
use crate::error::AppError;

/// Why a provider could not deliver datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The source has no usable credentials/location; not worth reporting.
    NotConfigured(String),
    /// The source was configured but the request or payload failed.
    Request(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::NotConfigured(msg) => write!(f, "data source not configured: {msg}"),
            FetchFailure::Request(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FetchFailure {}

impl From<FetchFailure> for AppError {
    fn from(value: FetchFailure) -> Self {
        match value {
            FetchFailure::NotConfigured(_) => AppError::usage(value.to_string()),
            FetchFailure::Request(_) => AppError::data(value.to_string()),
        }
    }
}

/// A source of both datasets.
pub trait DatasetProvider: Send + Sync {
    fn fetch_datasets(&self) -> Result<Datasets, FetchFailure>;

    /// How datasets from this provider are labelled for display.
    fn source(&self) -> DataSource;
}

/// Primary provider with a deterministic substitute on failure.
///
/// `load` always produces a snapshot: a missing primary (offline mode) or a
/// failed fetch both yield generated data tagged `DataSource::Fallback`.
pub struct FallbackProvider {
    primary: Option<Box<dyn DatasetProvider>>,
    seed: u64,
}

impl FallbackProvider {
    pub fn new(primary: Option<Box<dyn DatasetProvider>>, seed: u64) -> Self {
        Self { primary, seed }
    }

    pub fn load(&self) -> Snapshot {
        let Some(primary) = &self.primary else {
            info!("no primary data source; using generated data");
            return self.fallback(None);
        };

        match primary.fetch_datasets() {
            Ok(datasets) => {
                info!(
                    indices = datasets.indices.len(),
                    instruments = datasets.instruments.len(),
                    "datasets loaded"
                );
                Snapshot {
                    datasets,
                    source: primary.source(),
                }
            }
            Err(FetchFailure::NotConfigured(msg)) => {
                info!(%msg, "data source not configured; using generated data");
                self.fallback(None)
            }
            Err(FetchFailure::Request(msg)) => {
                warn!(%msg, "data fetch failed; using generated data");
                self.fallback(Some(msg))
            }
        }
    }

    fn fallback(&self, reason: Option<String>) -> Snapshot {
        let as_of = chrono::Local::now().naive_local();
        Snapshot {
            datasets: generate_sample(self.seed, as_of),
            source: DataSource::Fallback { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IndexRecord;

    struct Fixed(Result<Datasets, FetchFailure>);

    impl DatasetProvider for Fixed {
        fn fetch_datasets(&self) -> Result<Datasets, FetchFailure> {
            self.0.clone()
        }

        fn source(&self) -> DataSource {
            DataSource::Remote
        }
    }

    fn one_index() -> Datasets {
        Datasets {
            indices: vec![IndexRecord {
                code: "XU100".into(),
                name: "BIST 100".into(),
                category: None,
                last_price: None,
                change1d: None,
                change1w: None,
                change1m: None,
                change3m: None,
                volume: None,
                updated_at: None,
            }],
            instruments: Vec::new(),
            as_of: None,
        }
    }

    #[test]
    fn primary_success_is_passed_through() {
        let p = FallbackProvider::new(Some(Box::new(Fixed(Ok(one_index())))), 1);
        let snap = p.load();
        assert_eq!(snap.source, DataSource::Remote);
        assert_eq!(snap.datasets, one_index());
    }

    #[test]
    fn request_failure_falls_back_with_reason() {
        let failure = FetchFailure::Request("status 503".into());
        let p = FallbackProvider::new(Some(Box::new(Fixed(Err(failure)))), 1);
        let snap = p.load();
        assert_eq!(
            snap.source,
            DataSource::Fallback {
                reason: Some("status 503".into())
            }
        );
        assert!(!snap.datasets.indices.is_empty());
    }

    #[test]
    fn missing_configuration_falls_back_silently() {
        let failure = FetchFailure::NotConfigured("API keys not set".into());
        let p = FallbackProvider::new(Some(Box::new(Fixed(Err(failure)))), 1);
        assert_eq!(p.load().source, DataSource::Fallback { reason: None });

        let offline = FallbackProvider::new(None, 1);
        assert!(offline.load().source.is_fallback());
    }
}
