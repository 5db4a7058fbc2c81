//! Index membership of instruments.
//!
//! An instrument's membership descriptor is a comma-joined list of index codes
//! (`"XU030,XU100,XULAS"`) in no particular order. Membership is a token test,
//! never a raw substring test: `"XU10"` is not a member of `"XU100"`.

use crate::domain::InstrumentRecord;

/// Index codes listed in a membership descriptor. Blank tokens are skipped.
pub fn membership_codes(descriptor: &str) -> impl Iterator<Item = &str> {
    descriptor.split(',').map(str::trim).filter(|c| !c.is_empty())
}

/// Whether `descriptor` lists `code` as one of its tokens.
///
/// Codes are compared exactly after trimming. A `code` that is blank or itself
/// contains a comma can never match.
pub fn descriptor_contains(descriptor: &str, code: &str) -> bool {
    let code = code.trim();
    if code.is_empty() || code.contains(',') {
        return false;
    }
    membership_codes(descriptor).any(|c| c == code)
}

/// Whether `instrument` belongs to the index `parent_code`.
///
/// Missing, empty or malformed descriptors mean "no membership".
pub fn belongs_to(instrument: &InstrumentRecord, parent_code: &str) -> bool {
    instrument
        .membership
        .as_deref()
        .is_some_and(|m| descriptor_contains(m, parent_code))
}

/// Instruments belonging to `parent_code`, in dataset order.
pub fn members_of(instruments: &[InstrumentRecord], parent_code: &str) -> Vec<InstrumentRecord> {
    instruments
        .iter()
        .filter(|i| belongs_to(i, parent_code))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(symbol: &str, membership: Option<&str>) -> InstrumentRecord {
        InstrumentRecord {
            symbol: symbol.to_string(),
            membership: membership.map(str::to_string),
            name: String::new(),
            price: None,
            change1d: None,
            change1w: None,
            change1m: None,
            change3m: None,
            updated_at: None,
        }
    }

    #[test]
    fn multi_membership_matches_every_listed_code() {
        let thy = instrument("THYAO", Some("XU100,XULAS"));
        assert!(belongs_to(&thy, "XU100"));
        assert!(belongs_to(&thy, "XULAS"));
    }

    #[test]
    fn partial_tokens_do_not_match() {
        let thy = instrument("THYAO", Some("XU100,XULAS"));
        assert!(!belongs_to(&thy, "XU10"));
        assert!(!belongs_to(&thy, "XULA"));
        assert!(!belongs_to(&thy, "U100"));
    }

    #[test]
    fn absent_or_empty_membership_is_no_membership() {
        assert!(!belongs_to(&instrument("A", None), "XU100"));
        assert!(!belongs_to(&instrument("B", Some("")), "XU100"));
        assert!(!belongs_to(&instrument("C", Some(",,")), "XU100"));
        assert!(!belongs_to(&instrument("D", Some("XU100")), ""));
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        let i = instrument("SISE", Some(" XU030 , XUSIN,"));
        assert!(belongs_to(&i, "XUSIN"));
        assert!(belongs_to(&i, "XU030"));
    }

    #[test]
    fn codes_containing_the_delimiter_never_match() {
        let i = instrument("THYAO", Some("XU100,XULAS"));
        assert!(!belongs_to(&i, "XU100,XULAS"));
        assert!(!belongs_to(&i, "XU100,"));
    }

    #[test]
    fn members_of_keeps_dataset_order() {
        let all = vec![
            instrument("AKBNK", Some("XU030,XBANK")),
            instrument("THYAO", Some("XULAS")),
            instrument("GARAN", Some("XBANK,XU100")),
        ];
        let symbols: Vec<_> = members_of(&all, "XBANK").into_iter().map(|i| i.symbol).collect();
        assert_eq!(symbols, vec!["AKBNK", "GARAN"]);
    }
}
