//! Record and dataset model.
//!
//! A record is an open mapping from field name to JSON value. Field order is
//! the column order of the source file and survives serialization.

use serde_json::{Map, Value};

/// One row of source data.
pub type Record = Map<String, Value>;

/// An ordered sequence of records.
pub type Dataset = Vec<Record>;

/// Build a record from `(field, value)` pairs, keeping their order.
pub fn record_from_pairs<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
