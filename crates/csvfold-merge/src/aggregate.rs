//! Grouping of a flat dataset into buckets.
//!
//! Buckets are keyed by the **raw** value of the group-by field (exact JSON
//! equality: `"1"` and `1` are different buckets) and are emitted in
//! first-seen order.

use csvfold_types::{Dataset, GroupBy, Record};
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, PartialEq, Eq, Hash)]
enum BucketKey {
    Missing,
    Value(String),
}

struct Bucket {
    value: Option<Value>,
    members: Vec<Value>,
}

/// Group `dataset` by `group_key`.
///
/// Each output record is `{ group_key: value, grouped_property: [members] }`
/// where members keep their relative order and lose the `group_key` field.
/// Records without `group_key` share one bucket whose output omits the key.
pub fn group_by(dataset: Dataset, group_key: &str, grouped_property: &str) -> Dataset {
    let mut buckets: IndexMap<BucketKey, Bucket> = IndexMap::new();

    for mut record in dataset {
        let value = record.shift_remove(group_key);
        let key = match &value {
            Some(v) => BucketKey::Value(v.to_string()),
            None => BucketKey::Missing,
        };
        buckets
            .entry(key)
            .or_insert_with(|| Bucket {
                value,
                members: Vec::new(),
            })
            .members
            .push(Value::Object(record));
    }

    buckets
        .into_values()
        .map(|bucket| {
            let mut out = Record::new();
            if let Some(value) = bucket.value {
                out.insert(group_key.to_string(), value);
            }
            out.insert(grouped_property.to_string(), Value::Array(bucket.members));
            out
        })
        .collect()
}

/// [`group_by`] driven by a [`GroupBy`] specification.
pub fn group_by_spec(dataset: Dataset, spec: &GroupBy) -> Dataset {
    group_by(dataset, &spec.group_by_key, &spec.grouped_array_property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvfold_types::record_from_pairs;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        match v {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn groups_members_in_order() {
        let data = vec![rec(json!({"a": 1, "b": 2})), rec(json!({"a": 1, "b": 3}))];
        let out = group_by(data, "a", "items");
        assert_eq!(out, vec![rec(json!({"a": 1, "items": [{"b": 2}, {"b": 3}]}))]);
    }

    #[test]
    fn first_seen_bucket_order() {
        let data = vec![
            rec(json!({"region": "PACA", "city": "Nice"})),
            rec(json!({"region": "IDF", "city": "Paris"})),
            rec(json!({"region": "PACA", "city": "Marseille"})),
        ];
        let out = group_by(data, "region", "cities");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["region"], json!("PACA"));
        assert_eq!(out[0]["cities"], json!([{"city": "Nice"}, {"city": "Marseille"}]));
        assert_eq!(out[1]["region"], json!("IDF"));
    }

    #[test]
    fn raw_values_not_normalized() {
        let data = vec![
            rec(json!({"k": "1", "v": "a"})),
            rec(json!({"k": 1, "v": "b"})),
            rec(json!({"k": "idf", "v": "c"})),
            rec(json!({"k": "IDF", "v": "d"})),
        ];
        let out = group_by(data, "k", "vs");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn missing_key_bucket_omits_field() {
        let data = vec![
            rec(json!({"v": 1})),
            rec(json!({"k": "x", "v": 2})),
            rec(json!({"v": 3})),
        ];
        let out = group_by(data, "k", "vs");
        assert_eq!(out.len(), 2);
        assert!(!out[0].contains_key("k"));
        assert_eq!(out[0]["vs"], json!([{"v": 1}, {"v": 3}]));
    }

    #[test]
    fn member_field_order_preserved() {
        let data = vec![record_from_pairs([
            ("z", json!(1)),
            ("g", json!("G")),
            ("a", json!(2)),
        ])];
        let out = group_by(data, "g", "m");
        let member = out[0]["m"][0].as_object().unwrap();
        let keys: Vec<&str> = member.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn empty_dataset() {
        assert!(group_by(Dataset::new(), "k", "vs").is_empty());
    }

    #[test]
    fn group_by_spec_delegates() {
        let data = vec![rec(json!({"a": 1, "b": 2}))];
        let out = group_by_spec(data, &GroupBy::new("a", "items"));
        assert_eq!(out[0]["items"], json!([{"b": 2}]));
    }
}
