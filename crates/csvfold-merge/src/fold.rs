//! Left fold of an incoming dataset into a base dataset.
//!
//! Each incoming record is matched against the base **as it stood when the
//! fold started**. Records created during the fold (overwrites and appends)
//! are never match candidates for later incoming records of the same call.
//!
//! Two regimes are selected by [`MergePolicy::replace_values`]:
//!
//! - `false`: every match is appended as a new row, nothing is overwritten.
//! - `true`: the first match against a base record overwrites it in place;
//!   any further match against that same base record is appended, so
//!   conflicting updates are kept side by side instead of dropped.

use std::collections::HashMap;

use csvfold_types::{Dataset, NormalizeScope, Record};
use serde_json::Value;
use tracing::{debug, info};

use crate::matcher::{identity, Canonical};
use crate::normalize::normalize;

/// Merge policy for one fold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergePolicy {
    /// Overwrite the first matching base record once, then duplicate.
    pub replace_values: bool,
    /// Which incoming fields are canonicalized in merged records.
    pub normalize_scope: NormalizeScope,
}

impl MergePolicy {
    /// Append every match as a duplicate row.
    pub fn append_all() -> Self {
        Self::default()
    }

    /// Overwrite once per base record, then duplicate.
    pub fn replace_once() -> Self {
        Self {
            replace_values: true,
            ..Self::default()
        }
    }

    pub fn with_normalize_scope(mut self, scope: NormalizeScope) -> Self {
        self.normalize_scope = scope;
        self
    }
}

/// Counters describing what a fold did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Base records overwritten in place.
    pub replaced: usize,
    /// Matches appended as additional rows.
    pub duplicated: usize,
    /// Unmatched incoming records appended verbatim.
    pub appended: usize,
}

impl FoldStats {
    /// Incoming records that matched a base record.
    pub fn matched(&self) -> usize {
        self.replaced + self.duplicated
    }
}

/// Result of [`fold_with_stats`].
#[derive(Clone, Debug, PartialEq)]
pub struct FoldOutcome {
    pub records: Dataset,
    pub stats: FoldStats,
}

/// Copy of `existing` with every field of `incoming` written over it.
///
/// Written values are canonicalized: all of them under
/// [`NormalizeScope::AllFields`], only the match keys under
/// [`NormalizeScope::MatchKeys`].
pub fn merge_record<S: AsRef<str>>(
    existing: &Record,
    incoming: &Record,
    keys: &[S],
    scope: NormalizeScope,
) -> Record {
    let mut merged = existing.clone();
    for (field, value) in incoming {
        let canonical = match scope {
            NormalizeScope::AllFields => true,
            NormalizeScope::MatchKeys => keys.iter().any(|k| k.as_ref() == field),
        };
        let value = if canonical {
            Value::String(normalize(value))
        } else {
            value.clone()
        };
        merged.insert(field.clone(), value);
    }
    merged
}

/// Fold `incoming` into `base`. See the module docs for the policy.
pub fn fold<S: AsRef<str>>(
    base: &[Record],
    incoming: &[Record],
    keys: &[S],
    policy: MergePolicy,
) -> Dataset {
    fold_with_stats(base, incoming, keys, policy).records
}

/// [`fold`], also reporting what happened to each incoming record.
pub fn fold_with_stats<S: AsRef<str>>(
    base: &[Record],
    incoming: &[Record],
    keys: &[S],
    policy: MergePolicy,
) -> FoldOutcome {
    // First base position per identity; later duplicates in the base are
    // never reached by a first-match search.
    let mut first_match: HashMap<Vec<Canonical>, usize> = HashMap::with_capacity(base.len());
    for (pos, record) in base.iter().enumerate() {
        first_match.entry(identity(keys, record)).or_insert(pos);
    }

    // Updated marker, scoped to this call and indexed by base position.
    let mut updated = vec![false; base.len()];
    let mut records = base.to_vec();
    let mut stats = FoldStats::default();

    for record in incoming {
        let Some(&pos) = first_match.get(&identity(keys, record)) else {
            records.push(record.clone());
            stats.appended += 1;
            continue;
        };

        let merged = merge_record(&base[pos], record, keys, policy.normalize_scope);
        if !policy.replace_values || updated[pos] {
            records.push(merged);
            stats.duplicated += 1;
        } else {
            updated[pos] = true;
            records[pos] = merged;
            stats.replaced += 1;
        }
    }

    debug!(
        base = base.len(),
        incoming = incoming.len(),
        replaced = stats.replaced,
        duplicated = stats.duplicated,
        appended = stats.appended,
        "fold complete"
    );
    FoldOutcome { records, stats }
}

/// Fold every source into the first, left to right.
///
/// `result0 = S0`, `resultk = fold(resultk-1, Sk)`. An empty source list
/// yields an empty dataset.
pub fn fold_all<S: AsRef<str>>(sources: Vec<Dataset>, keys: &[S], policy: MergePolicy) -> Dataset {
    let mut sources = sources.into_iter();
    let Some(mut result) = sources.next() else {
        return Dataset::new();
    };
    info!(index = 0, lines = result.len(), "seeded buffer from first source");

    for (offset, source) in sources.enumerate() {
        result = fold(&result, &source, keys, policy);
        info!(index = offset + 1, lines = result.len(), "folded source into buffer");
    }
    result
}
