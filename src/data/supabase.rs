//! Remote datasets from the Supabase (PostgREST) tables filled by the daily
//! fetcher: `bist_indices` and `bist_stocks`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::data::provider::{DatasetProvider, FetchFailure};
use crate::domain::{DataSource, Datasets, IndexRecord, InstrumentRecord};
use crate::error::AppError;

const INDICES_TABLE: &str = "bist_indices";
const INSTRUMENTS_TABLE: &str = "bist_stocks";

/// Marker left in template `.env` files; such a URL counts as unset.
const PLACEHOLDER_MARKER: &str = "YOUR_PROJECT_ID";

#[derive(Debug, Clone)]
struct Credentials {
    base_url: String,
    api_key: String,
}

pub struct SupabaseClient {
    client: Client,
    credentials: Option<Credentials>,
}

impl SupabaseClient {
    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY` (or `SUPABASE_KEY`) from the
    /// environment / `.env`. Missing credentials are not an error here; they
    /// surface as `FetchFailure::NotConfigured` on fetch.
    pub fn from_env(timeout: Duration) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let url = std::env::var("SUPABASE_URL").ok();
        let key = std::env::var("SUPABASE_ANON_KEY")
            .or_else(|_| std::env::var("SUPABASE_KEY"))
            .ok();
        Self::new(url, key, timeout)
    }

    pub fn new(url: Option<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::data(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            credentials: credentials(url, api_key),
        })
    }

    fn fetch_table<T: DeserializeOwned>(&self, creds: &Credentials, table: &str) -> Result<Vec<T>, FetchFailure> {
        let url = format!("{}/rest/v1/{table}", creds.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("select", "*")])
            .header("apikey", &creds.api_key)
            .bearer_auth(&creds.api_key)
            .send()
            .map_err(|e| FetchFailure::Request(format!("Supabase request for {table} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(FetchFailure::Request(format!(
                "Supabase request for {table} failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| FetchFailure::Request(format!("Failed to parse {table} response: {e}")))
    }
}

impl DatasetProvider for SupabaseClient {
    fn fetch_datasets(&self) -> Result<Datasets, FetchFailure> {
        let Some(creds) = &self.credentials else {
            return Err(FetchFailure::NotConfigured("API keys not set".to_string()));
        };

        let indices: Vec<IndexRecord> = self.fetch_table(creds, INDICES_TABLE)?;
        let instruments: Vec<InstrumentRecord> = self.fetch_table(creds, INSTRUMENTS_TABLE)?;

        let as_of = indices
            .first()
            .and_then(|i| i.updated_at)
            .or_else(|| Some(chrono::Local::now().naive_local()));

        Ok(Datasets {
            indices,
            instruments,
            as_of,
        })
    }

    fn source(&self) -> DataSource {
        DataSource::Remote
    }
}

fn credentials(url: Option<String>, api_key: Option<String>) -> Option<Credentials> {
    let base_url = url
        .map(|u| u.trim().trim_end_matches('/').to_string())
        .filter(|u| !u.is_empty() && !u.contains(PLACEHOLDER_MARKER))?;
    let api_key = api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())?;
    Some(Credentials { base_url, api_key })
}
