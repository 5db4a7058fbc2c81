//! Filtered, sorted read-only views over a dataset.

use std::cmp::Ordering;

use crate::domain::normalize::{coerce, coerce_text};
use crate::domain::{IndexRecord, InstrumentRecord, SortDirection, SortDirective, SortKey};

/// A record that can be searched and ordered by any `SortKey`.
pub trait Projectable {
    /// Numeric comparison value for `key`. Missing or non-numeric values are `0`.
    fn sort_value(&self, key: SortKey) -> f64;

    /// Case-insensitive match against an already lowercased needle.
    fn matches_search(&self, needle: &str) -> bool;
}

impl Projectable for IndexRecord {
    fn sort_value(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Code => coerce_text(Some(&self.code)),
            SortKey::Category => coerce_text(self.category.as_deref()),
            SortKey::Price => coerce(self.last_price),
            SortKey::Change1d => coerce(self.change1d),
            SortKey::Change1w => coerce(self.change1w),
            SortKey::Change1m => coerce(self.change1m),
            SortKey::Change3m => coerce(self.change3m),
            SortKey::Volume => coerce_text(self.volume.as_deref()),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.code.to_lowercase().contains(needle)
    }
}

impl Projectable for InstrumentRecord {
    fn sort_value(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Code => coerce_text(Some(&self.symbol)),
            SortKey::Price => coerce(self.price),
            SortKey::Change1d => coerce(self.change1d),
            SortKey::Change1w => coerce(self.change1w),
            SortKey::Change1m => coerce(self.change1m),
            SortKey::Change3m => coerce(self.change3m),
            SortKey::Category | SortKey::Volume => 0.0,
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}

/// Project `records` into a fresh ordered sequence.
///
/// `search`, when present and non-empty, keeps records whose display name or
/// key contains it (case-insensitive). The sort is stable, so ties keep input
/// order and repeated calls give identical output. The input is never touched.
pub fn project<R>(records: &[R], sort: SortDirective, search: Option<&str>) -> Vec<R>
where
    R: Projectable + Clone,
{
    let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
    let mut out: Vec<R> = match &needle {
        Some(needle) => records
            .iter()
            .filter(|r| r.matches_search(needle))
            .cloned()
            .collect(),
        None => records.to_vec(),
    };
    sort_records(&mut out, sort);
    out
}

fn sort_records<R: Projectable>(records: &mut [R], sort: SortDirective) {
    records.sort_by(|a, b| {
        let ord = a
            .sort_value(sort.key)
            .partial_cmp(&b.sort_value(sort.key))
            .unwrap_or(Ordering::Equal);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
