//! Value canonicalization.
//!
//! The canonical form of a value is its text form, upper-cased, decomposed
//! (NFD), with combining diacritical marks removed. It is used both to
//! compare match keys and to rewrite merged field values.

use std::borrow::Cow;
use std::ops::RangeInclusive;

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block.
const COMBINING_DIACRITICS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Text form of a JSON value.
///
/// Strings are taken as-is, scalars use their JSON spelling (`7`, `true`,
/// `null`), and compound values use compact JSON.
pub fn text_form(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Canonicalize a piece of text.
pub fn canonicalize(text: &str) -> String {
    text.to_uppercase()
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .collect()
}

/// Canonical text form of a JSON value.
pub fn normalize(value: &Value) -> String {
    canonicalize(&text_form(value))
}
