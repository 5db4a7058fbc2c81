//! Lenient field normalization for records arriving from the remote table or
//! a snapshot file.
//!
//! The remote columns are loosely typed: prices may come back as numbers or as
//! numeric strings, volume may be a number or a label like `"42.1M"`, and the
//! fetcher writes timestamps without an offset. These helpers accept all of
//! those shapes and map anything unusable to `None` instead of failing the
//! whole payload.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Parse a numeric-looking string, rejecting blanks and non-finite values.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Comparison value for an optional number: absent or non-finite sorts as `0`.
pub fn coerce(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Comparison value for a text field: numeric text compares by value, anything
/// else compares as `0`.
pub fn coerce_text(value: Option<&str>) -> f64 {
    value.and_then(parse_numeric).unwrap_or(0.0)
}

/// Parse `updated_at` values: RFC3339 (normalized to UTC) or naive ISO-8601.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(v)) if v.is_finite() => Some(v),
        Some(NumberOrText::Number(_)) => None,
        Some(NumberOrText::Text(s)) => parse_numeric(&s),
        None => None,
    })
}

pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(v)) => Some(format!("{v}")),
        Some(NumberOrText::Text(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// Display text that may be missing or `null`; both read as an empty string.
pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Text(s)) => parse_timestamp(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "lenient_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "lenient_string")]
        volume: Option<String>,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        updated_at: Option<NaiveDateTime>,
    }

    fn fields(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        assert_eq!(fields(r#"{"price": 12.5}"#).price, Some(12.5));
        assert_eq!(fields(r#"{"price": "4350.20"}"#).price, Some(4350.2));
        assert_eq!(fields(r#"{"price": " 7 "}"#).price, Some(7.0));
    }

    #[test]
    fn unusable_prices_become_none() {
        assert_eq!(fields(r#"{"price": null}"#).price, None);
        assert_eq!(fields(r#"{"price": "n/a"}"#).price, None);
        assert_eq!(fields(r#"{"price": ""}"#).price, None);
        assert_eq!(fields(r#"{}"#).price, None);
    }

    #[test]
    fn volume_keeps_labels_and_stringifies_numbers() {
        assert_eq!(fields(r#"{"volume": "42.1M"}"#).volume.as_deref(), Some("42.1M"));
        assert_eq!(fields(r#"{"volume": 1500}"#).volume.as_deref(), Some("1500"));
        assert_eq!(fields(r#"{"volume": "  "}"#).volume, None);
    }

    #[test]
    fn timestamps_accept_naive_and_offset_forms() {
        let naive = fields(r#"{"updated_at": "2025-03-14T09:30:00.123456"}"#).updated_at.unwrap();
        assert_eq!(naive.format("%Y-%m-%d %H:%M").to_string(), "2025-03-14 09:30");

        let offset = fields(r#"{"updated_at": "2025-03-14T12:30:00+03:00"}"#).updated_at.unwrap();
        assert_eq!(offset.format("%H:%M").to_string(), "09:30");

        assert_eq!(fields(r#"{"updated_at": "yesterday"}"#).updated_at, None);
    }

    #[test]
    fn coercion_maps_missing_and_text_to_zero() {
        assert_eq!(coerce(None), 0.0);
        assert_eq!(coerce(Some(f64::NAN)), 0.0);
        assert_eq!(coerce(Some(-1.5)), -1.5);
        assert_eq!(coerce_text(Some("42.1M")), 0.0);
        assert_eq!(coerce_text(Some("42.1")), 42.1);
        assert_eq!(coerce_text(None), 0.0);
    }
}
