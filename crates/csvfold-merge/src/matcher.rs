//! Record identity under a match key set.

use csvfold_types::Record;

use crate::normalize::normalize;

/// Canonical form of one field of a record.
///
/// An absent field is its own sentinel: two records both missing a key agree
/// on it, but an empty present value never equals an absent one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Canonical {
    Missing,
    Present(String),
}

/// Canonical form of `record[key]`.
pub fn canonical_field(record: &Record, key: &str) -> Canonical {
    match record.get(key) {
        Some(value) => Canonical::Present(normalize(value)),
        None => Canonical::Missing,
    }
}

/// Canonical identity of a record: one [`Canonical`] per key, in key order.
pub fn identity<S: AsRef<str>>(keys: &[S], record: &Record) -> Vec<Canonical> {
    keys.iter()
        .map(|key| canonical_field(record, key.as_ref()))
        .collect()
}

/// Returns `true` if `a` and `b` agree on every key.
///
/// Stops at the first disagreeing key. An empty key set matches everything.
pub fn matches<S: AsRef<str>>(keys: &[S], a: &Record, b: &Record) -> bool {
    keys.iter().all(|key| {
        let key = key.as_ref();
        canonical_field(a, key) == canonical_field(b, key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvfold_types::record_from_pairs;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn rec(pairs: &[(&str, Value)]) -> Record {
        record_from_pairs(pairs.iter().cloned())
    }

    #[test]
    fn matches_across_case_and_accents() {
        let a = rec(&[("city", json!("Montréal")), ("region", json!("QC"))]);
        let b = rec(&[("city", json!("MONTREAL")), ("region", json!("qc"))]);
        assert!(matches(&["city", "region"], &a, &b));
    }

    #[test]
    fn text_and_number_are_equal() {
        let a = rec(&[("id", json!("7"))]);
        let b = rec(&[("id", json!(7))]);
        assert!(matches(&["id"], &a, &b));
    }

    #[test]
    fn any_key_mismatch_fails() {
        let a = rec(&[("city", json!("Paris")), ("region", json!("IDF"))]);
        let b = rec(&[("city", json!("Paris")), ("region", json!("PACA"))]);
        assert!(!matches(&["city", "region"], &a, &b));
        assert!(matches(&["city"], &a, &b));
    }

    #[test]
    fn both_missing_key_match() {
        let a = rec(&[("city", json!("Lyon"))]);
        let b = rec(&[("city", json!("lyon")), ("rate", json!("3"))]);
        assert!(matches(&["city", "region"], &a, &b));
    }

    #[test]
    fn empty_value_differs_from_missing() {
        let a = rec(&[("region", json!(""))]);
        let b = rec(&[]);
        assert!(!matches(&["region"], &a, &b));
        assert_eq!(canonical_field(&b, "region"), Canonical::Missing);
        assert_eq!(canonical_field(&a, "region"), Canonical::Present(String::new()));
    }

    #[test]
    fn empty_key_set_matches_everything() {
        let keys: [&str; 0] = [];
        let a = rec(&[("x", json!(1))]);
        let b = rec(&[("y", json!(2))]);
        assert!(matches(&keys, &a, &b));
    }

    #[test]
    fn identity_follows_key_order() {
        let a = rec(&[("city", json!("Nîmes")), ("zip", json!(30000))]);
        assert_eq!(
            identity(&["zip", "city", "region"], &a),
            vec![
                Canonical::Present("30000".into()),
                Canonical::Present("NIMES".into()),
                Canonical::Missing,
            ]
        );
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        proptest::collection::vec(
            (
                prop_oneof![Just("a"), Just("b"), Just("c")],
                prop_oneof![
                    Just(json!("x")),
                    Just(json!("X")),
                    Just(json!("é")),
                    Just(json!("E")),
                    Just(json!("")),
                    Just(json!(1)),
                    Just(json!("1")),
                ],
            ),
            0..4,
        )
        .prop_map(|pairs| record_from_pairs(pairs))
    }

    proptest! {
        #[test]
        fn symmetric(a in arb_record(), b in arb_record()) {
            let keys = ["a", "b"];
            prop_assert_eq!(matches(&keys, &a, &b), matches(&keys, &b, &a));
        }

        #[test]
        fn reflexive(a in arb_record()) {
            prop_assert!(matches(&["a", "b", "c"], &a, &a));
        }

        #[test]
        fn agrees_with_identity(a in arb_record(), b in arb_record()) {
            let keys = ["a", "c"];
            prop_assert_eq!(matches(&keys, &a, &b), identity(&keys, &a) == identity(&keys, &b));
        }
    }
}
