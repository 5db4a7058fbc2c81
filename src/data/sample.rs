//! Deterministic substitute datasets for when the remote tables are unavailable.
//!
//! The generated data honours the same field contract as the remote tables,
//! including multi-valued membership descriptors: every sector constituent is
//! also listed under the broad `XU100` index.

use chrono::NaiveDateTime;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{Datasets, IndexRecord, InstrumentRecord};

/// Broad index every generated instrument is also a member of.
const BROAD_INDEX: &str = "XU100";

/// Instruments generated per index.
const MEMBERS_PER_INDEX: usize = 5;

/// (code, name, category) of the generated indices.
const SAMPLE_INDICES: [(&str, &str, &str); 6] = [
    ("XU100", "BIST 100", "Genel"),
    ("XBANK", "Bankacılık", "Sektör"),
    ("XUSIN", "Sınai", "Sektör"),
    ("XUTEK", "Teknoloji", "Sektör"),
    ("XULAS", "Ulaştırma", "Sektör"),
    ("XGIDA", "Gıda İçecek", "Sektör"),
];

/// Generate a full substitute snapshot. Same seed, same data.
pub fn generate_sample(seed: u64, as_of: NaiveDateTime) -> Datasets {
    let mut rng = StdRng::seed_from_u64(seed);

    let indices: Vec<IndexRecord> = SAMPLE_INDICES
        .iter()
        .map(|&(code, name, category)| IndexRecord {
            code: code.to_string(),
            name: name.to_string(),
            category: Some(category.to_string()),
            last_price: Some(round2(rng.gen_range(2000.0..7000.0))),
            change1d: Some(rng.gen_range(-3.0..3.0)),
            change1w: Some(rng.gen_range(-5.0..5.0)),
            change1m: Some(rng.gen_range(-7.0..8.0)),
            change3m: Some(rng.gen_range(-10.0..10.0)),
            volume: Some(format!("{:.1}M", rng.gen_range(10.0..110.0))),
            updated_at: Some(as_of),
        })
        .collect();

    let mut instruments = Vec::with_capacity(indices.len() * MEMBERS_PER_INDEX);
    for idx in &indices {
        for i in 1..=MEMBERS_PER_INDEX {
            instruments.push(InstrumentRecord {
                symbol: format!("{}_HISSE{i}", idx.code),
                membership: Some(membership_for(&idx.code)),
                name: format!("{} Şirket {i}", idx.name),
                price: Some(round2(rng.gen_range(10.0..110.0))),
                change1d: jitter(&mut rng, idx.change1d, 1.0),
                change1w: jitter(&mut rng, idx.change1w, 2.0),
                change1m: jitter(&mut rng, idx.change1m, 3.0),
                change3m: jitter(&mut rng, idx.change3m, 4.0),
                updated_at: Some(as_of),
            });
        }
    }

    Datasets {
        indices,
        instruments,
        as_of: Some(as_of),
    }
}

fn membership_for(code: &str) -> String {
    if code == BROAD_INDEX {
        code.to_string()
    } else {
        format!("{code},{BROAD_INDEX}")
    }
}

fn jitter(rng: &mut StdRng, base: Option<f64>, spread: f64) -> Option<f64> {
    base.map(|b| b + rng.gen_range(-spread..spread))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::view::membership::{belongs_to, membership_codes};

    fn as_of() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate_sample(7, as_of()), generate_sample(7, as_of()));
        assert_ne!(generate_sample(7, as_of()), generate_sample(8, as_of()));
    }

    #[test]
    fn keys_are_unique() {
        let data = generate_sample(1, as_of());
        let codes: HashSet<_> = data.indices.iter().map(|i| &i.code).collect();
        let symbols: HashSet<_> = data.instruments.iter().map(|i| &i.symbol).collect();
        assert_eq!(codes.len(), data.indices.len());
        assert_eq!(symbols.len(), data.instruments.len());
    }

    #[test]
    fn sector_members_also_belong_to_the_broad_index() {
        let data = generate_sample(1, as_of());
        let bank: Vec<_> = data
            .instruments
            .iter()
            .filter(|i| belongs_to(i, "XBANK"))
            .collect();
        assert_eq!(bank.len(), MEMBERS_PER_INDEX);
        assert!(bank.iter().all(|i| belongs_to(i, BROAD_INDEX)));

        let broad = data
            .instruments
            .iter()
            .filter(|i| belongs_to(i, BROAD_INDEX))
            .count();
        assert_eq!(broad, data.instruments.len());
    }

    #[test]
    fn descriptors_list_only_known_codes() {
        let data = generate_sample(3, as_of());
        let codes: HashSet<_> = data.indices.iter().map(|i| i.code.as_str()).collect();
        for inst in &data.instruments {
            let descriptor = inst.membership.as_deref().unwrap();
            assert!(membership_codes(descriptor).all(|c| codes.contains(c)));
        }
    }

    #[test]
    fn generated_values_stay_in_range() {
        let data = generate_sample(11, as_of());
        for idx in &data.indices {
            let d1 = idx.change1d.unwrap();
            assert!((-3.0..3.0).contains(&d1));
            assert!(idx.volume.as_deref().unwrap().ends_with('M'));
            assert_eq!(idx.updated_at, Some(as_of()));
        }
        for inst in &data.instruments {
            let price = inst.price.unwrap();
            assert!((10.0..=110.0).contains(&price));
        }
    }
}
