//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - deserialized straight from the remote tables
//! - written to / reloaded from snapshot files
//! - projected into row view-models for the CLI and the TUI

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::normalize;

/// An aggregate market benchmark (one row of `bist_indices`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub code: String,
    #[serde(default, deserialize_with = "normalize::text_or_empty")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub last_price: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change1d: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change1w: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change1m: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change3m: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "normalize::lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

/// A tradable instrument (one row of `bist_stocks`).
///
/// `membership` is the comma-joined list of index codes the instrument belongs
/// to (`parent_index` in the remote table), e.g. `"XU100,XULAS"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    pub symbol: String,
    #[serde(rename = "parent_index", default)]
    pub membership: Option<String>,
    #[serde(default, deserialize_with = "normalize::text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change1d: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change1w: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change1m: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_f64")]
    pub change3m: Option<f64>,
    #[serde(default, deserialize_with = "normalize::lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

/// The four precomputed percentage-change windows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Changes {
    pub d1: Option<f64>,
    pub w1: Option<f64>,
    pub m1: Option<f64>,
    pub m3: Option<f64>,
}

impl IndexRecord {
    pub fn changes(&self) -> Changes {
        Changes {
            d1: self.change1d,
            w1: self.change1w,
            m1: self.change1m,
            m3: self.change3m,
        }
    }
}

impl InstrumentRecord {
    pub fn changes(&self) -> Changes {
        Changes {
            d1: self.change1d,
            w1: self.change1w,
            m1: self.change1m,
            m3: self.change3m,
        }
    }
}

/// Table column a projection can be ordered by.
///
/// Every key compares numerically. Text columns (code, category, volume
/// labels) only order rows when their text is itself numeric; otherwise they
/// compare as `0` and the projection keeps input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Code,
    Category,
    Price,
    #[value(name = "change1d")]
    Change1d,
    #[value(name = "change1w")]
    Change1w,
    #[value(name = "change1m")]
    Change1m,
    #[value(name = "change3m")]
    Change3m,
    Volume,
}

impl SortKey {
    /// Columns shown in the index overview, in display order.
    pub const INDEX_COLUMNS: [SortKey; 8] = [
        SortKey::Code,
        SortKey::Category,
        SortKey::Price,
        SortKey::Change1d,
        SortKey::Change1w,
        SortKey::Change1m,
        SortKey::Change3m,
        SortKey::Volume,
    ];

    /// Columns shown in the instrument detail view, in display order.
    pub const INSTRUMENT_COLUMNS: [SortKey; 6] = [
        SortKey::Code,
        SortKey::Price,
        SortKey::Change1d,
        SortKey::Change1w,
        SortKey::Change1m,
        SortKey::Change3m,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Code => "Code",
            SortKey::Category => "Category",
            SortKey::Price => "Price",
            SortKey::Change1d => "1D %",
            SortKey::Change1w => "1W %",
            SortKey::Change1m => "1M %",
            SortKey::Change3m => "3M %",
            SortKey::Volume => "Volume",
        }
    }

    pub fn is_change(self) -> bool {
        matches!(
            self,
            SortKey::Change1d | SortKey::Change1w | SortKey::Change1m | SortKey::Change3m
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// The (key, direction) pair applied to a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDirective {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortDirective {
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub const fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    /// Directive after a click on the `key` column header.
    ///
    /// Clicking the active column flips its direction; any other column starts
    /// descending.
    pub fn clicked(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.toggled())
        } else {
            Self::desc(key)
        }
    }
}

impl Default for SortDirective {
    fn default() -> Self {
        Self::desc(SortKey::Change1w)
    }
}

/// Both datasets from a single refresh, replaced wholesale every time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datasets {
    pub indices: Vec<IndexRecord>,
    pub instruments: Vec<InstrumentRecord>,
    #[serde(default)]
    pub as_of: Option<NaiveDateTime>,
}

/// Where a snapshot's datasets came from. Display-only; the view engine never
/// branches on it.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Remote,
    File(PathBuf),
    /// Deterministic substitute data. `reason` carries the failure text shown to
    /// the user; it is `None` when the remote source was simply not configured.
    Fallback { reason: Option<String> },
}

impl DataSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataSource::Fallback { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub datasets: Datasets,
    pub source: DataSource,
}

/// Presentation-facing row, produced from either record kind by an explicit
/// adapter step. Numbers stay raw; formatting is left to the front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: String,
    pub label: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub changes: Changes,
    pub volume: Option<String>,
    /// True only for index rows (they can be drilled into).
    pub has_detail: bool,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<&IndexRecord> for RowView {
    fn from(r: &IndexRecord) -> Self {
        Self {
            key: r.code.clone(),
            label: r.name.clone(),
            category: r.category.clone(),
            price: r.last_price,
            changes: r.changes(),
            volume: r.volume.clone(),
            has_detail: true,
            updated_at: r.updated_at,
        }
    }
}

impl From<&InstrumentRecord> for RowView {
    fn from(r: &InstrumentRecord) -> Self {
        Self {
            key: r.symbol.clone(),
            label: r.name.clone(),
            category: None,
            price: r.price,
            changes: r.changes(),
            volume: None,
            has_detail: false,
            updated_at: r.updated_at,
        }
    }
}

/// A full run's configuration as understood by the loading pipeline and the
/// front-ends. Derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RadarConfig {
    /// Skip the remote source entirely and use fallback data.
    pub offline: bool,
    /// Read datasets from a snapshot file instead of the remote source.
    pub data_file: Option<PathBuf>,
    /// Seed for the fallback data generator.
    pub seed: u64,
    /// Per-request timeout for the remote source.
    pub timeout: Duration,
    /// Initial sort directive.
    pub sort: SortDirective,
    /// Initial overview search term.
    pub search: String,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            offline: false,
            data_file: None,
            seed: 42,
            timeout: Duration::from_secs(15),
            sort: SortDirective::default(),
            search: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_active_column_toggles_direction() {
        let d = SortDirective::default();
        let once = d.clicked(SortKey::Change1w);
        assert_eq!(once, SortDirective::new(SortKey::Change1w, SortDirection::Asc));
        assert_eq!(once.clicked(SortKey::Change1w), d);
    }

    #[test]
    fn clicking_new_column_starts_descending() {
        let asc = SortDirective::new(SortKey::Change1w, SortDirection::Asc);
        assert_eq!(asc.clicked(SortKey::Price), SortDirective::desc(SortKey::Price));
    }

    #[test]
    fn instrument_rows_deserialize_from_remote_columns() {
        let json = r#"{
            "symbol": "THYAO",
            "parent_index": "XU030,XU100,XULAS",
            "price": "291.50",
            "change1d": -0.42,
            "change1w": null,
            "change2w": 1.1,
            "updated_at": "2025-03-14T18:05:00.5"
        }"#;
        let r: InstrumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.membership.as_deref(), Some("XU030,XU100,XULAS"));
        assert_eq!(r.price, Some(291.5));
        assert_eq!(r.change1w, None);
        assert_eq!(r.name, "");
        assert!(r.updated_at.is_some());
    }

    #[test]
    fn null_names_from_the_fetcher_read_as_empty() {
        let json = r#"[{"symbol":"THYAO","parent_index":"XU100,XULAS","name":null,"price":291.5}]"#;
        let rows: Vec<InstrumentRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].price, Some(291.5));

        let idx: IndexRecord = serde_json::from_str(r#"{"code":"XU100","name":null}"#).unwrap();
        assert_eq!(idx.name, "");
    }

    #[test]
    fn row_adapter_marks_only_indices_as_drillable() {
        let idx = IndexRecord {
            code: "XBANK".into(),
            name: "Bankacılık".into(),
            category: Some("Sektör".into()),
            last_price: Some(12000.0),
            change1d: Some(1.0),
            change1w: None,
            change1m: None,
            change3m: None,
            volume: Some("88.0M".into()),
            updated_at: None,
        };
        let row = RowView::from(&idx);
        assert!(row.has_detail);
        assert_eq!(row.key, "XBANK");
        assert_eq!(row.price, Some(12000.0));

        let inst = InstrumentRecord {
            symbol: "AKBNK".into(),
            membership: Some("XBANK".into()),
            name: String::new(),
            price: Some(60.0),
            change1d: None,
            change1w: None,
            change1m: None,
            change3m: None,
            updated_at: None,
        };
        let row = RowView::from(&inst);
        assert!(!row.has_detail);
        assert_eq!(row.category, None);
        assert_eq!(row.volume, None);
    }
}
