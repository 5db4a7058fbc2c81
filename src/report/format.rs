//! Presentation formatting for row view-models.
//!
//! The view engine hands out raw numbers; everything about signs, decimals,
//! placeholders and colour tones lives here so the CLI and the TUI agree.

use chrono::NaiveDateTime;

use crate::domain::{DataSource, RowView, SortKey};
use crate::view::TableModel;

/// Placeholder for absent values. Never rendered as `0`.
pub const PLACEHOLDER: &str = "-";

/// Direction of a change value, used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Up,
    Down,
    Flat,
}

impl Tone {
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 => Tone::Up,
            Some(v) if v < 0.0 => Tone::Down,
            _ => Tone::Flat,
        }
    }
}

/// `+1.23%`, `-0.50%`, `0.00%`, or `-` when absent.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let sign = if v > 0.0 { "+" } else { "" };
            format!("{sign}{v:.2}%")
        }
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Fill ratio of the weekly momentum bar: `|change| * 5` percent, capped at 100.
pub fn momentum_fraction(change1w: Option<f64>) -> f64 {
    match change1w {
        Some(v) if v.is_finite() => (v.abs() * 5.0).min(100.0) / 100.0,
        _ => 0.0,
    }
}

/// One-line description of where the data came from, if worth showing.
pub fn source_banner(source: &DataSource) -> Option<String> {
    match source {
        DataSource::Remote => None,
        DataSource::File(path) => Some(format!("Snapshot file: {}", path.display())),
        DataSource::Fallback { reason: None } => Some(
            "Demo mode: showing generated data. Set SUPABASE_URL and SUPABASE_ANON_KEY for live data."
                .to_string(),
        ),
        DataSource::Fallback { reason: Some(reason) } => {
            Some(format!("Connection error: {reason}. Showing generated data."))
        }
    }
}

pub fn format_updated(as_of: Option<NaiveDateTime>) -> String {
    match as_of {
        Some(ts) => format!("Updated: {}", ts.format("%Y-%m-%d %H:%M:%S")),
        None => "Updated: -".to_string(),
    }
}

/// Cell text for `key` in `row`.
pub fn cell_text(row: &RowView, key: SortKey) -> String {
    match key {
        SortKey::Code => row.key.clone(),
        SortKey::Category => row.category.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        SortKey::Price => format_price(row.price),
        SortKey::Change1d => format_percent(row.changes.d1),
        SortKey::Change1w => format_percent(row.changes.w1),
        SortKey::Change1m => format_percent(row.changes.m1),
        SortKey::Change3m => format_percent(row.changes.m3),
        SortKey::Volume => row.volume.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// Header label with the sort arrow on the active column.
pub fn header_label(table: &TableModel, key: SortKey) -> String {
    if table.sort.key == key {
        format!("{} {}", key.label(), table.sort.direction.arrow())
    } else {
        key.label().to_string()
    }
}

/// Plain-text table for terminal output.
pub fn format_table(table: &TableModel) -> String {
    if table.rows.is_empty() {
        return "No data found.\n".to_string();
    }

    let name_width = table
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, 28);

    let mut out = String::new();
    for (i, &key) in table.columns.iter().enumerate() {
        let label = header_label(table, key);
        if key == SortKey::Code {
            out.push_str(&format!("{label:<12} {:<name_width$}", "Name"));
        } else {
            out.push_str(&format!(" {label:>12}"));
        }
        if i + 1 == table.columns.len() {
            out.push('\n');
        }
    }

    for row in &table.rows {
        for &key in table.columns {
            let text = cell_text(row, key);
            if key == SortKey::Code {
                let name: String = row.label.chars().take(name_width).collect();
                out.push_str(&format!("{text:<12} {name:<name_width$}"));
            } else {
                out.push_str(&format!(" {text:>12}"));
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Changes, SortDirective};

    fn row(key: &str, d1: Option<f64>) -> RowView {
        RowView {
            key: key.to_string(),
            label: format!("{key} name"),
            category: None,
            price: Some(1234.5),
            changes: Changes {
                d1,
                ..Changes::default()
            },
            volume: None,
            has_detail: true,
            updated_at: None,
        }
    }

    #[test]
    fn percent_formatting_signs_and_placeholder() {
        assert_eq!(format_percent(Some(1.234)), "+1.23%");
        assert_eq!(format_percent(Some(-0.5)), "-0.50%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn tones_follow_sign() {
        assert_eq!(Tone::of(Some(0.1)), Tone::Up);
        assert_eq!(Tone::of(Some(-0.1)), Tone::Down);
        assert_eq!(Tone::of(Some(0.0)), Tone::Flat);
        assert_eq!(Tone::of(None), Tone::Flat);
    }

    #[test]
    fn momentum_bar_caps_at_full() {
        assert_eq!(momentum_fraction(Some(-4.0)), 0.2);
        assert_eq!(momentum_fraction(Some(30.0)), 1.0);
        assert_eq!(momentum_fraction(None), 0.0);
    }

    #[test]
    fn table_marks_active_column_and_shows_placeholders() {
        let table = TableModel {
            columns: &SortKey::INSTRUMENT_COLUMNS,
            sort: SortDirective::desc(SortKey::Change1d),
            rows: vec![row("AKBNK", Some(2.0)), row("GARAN", None)],
        };
        let text = format_table(&table);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().contains("1D % ▼"));
        assert!(lines.next().unwrap().contains("+2.00%"));
        let garan = lines.next().unwrap();
        assert!(garan.starts_with("GARAN"));
        assert!(garan.contains(" -"));
        assert!(!garan.contains("0.00%"));
    }

    #[test]
    fn banner_distinguishes_demo_from_error() {
        assert_eq!(source_banner(&DataSource::Remote), None);
        let demo = source_banner(&DataSource::Fallback { reason: None }).unwrap();
        assert!(demo.starts_with("Demo mode"));
        let err = source_banner(&DataSource::Fallback {
            reason: Some("status 500".into()),
        })
        .unwrap();
        assert!(err.contains("status 500"));
    }

    #[test]
    fn empty_table_says_so() {
        let table = TableModel {
            columns: &SortKey::INDEX_COLUMNS,
            sort: SortDirective::default(),
            rows: Vec::new(),
        };
        assert_eq!(format_table(&table), "No data found.\n");
    }
}
