//! Merge engine for csvfold.
//!
//! Reconciles records coming from several sources by a caller-specified
//! identity key, then optionally folds the result into grouped buckets.
//!
//! # Key Types
//!
//! - [`normalize`] -- Canonical text form used for comparison and merged values
//! - [`matches`] / [`Canonical`] -- Record identity under a key set
//! - [`fold`] / [`fold_all`] / [`MergePolicy`] -- Left fold of one source into another
//! - [`group_by`] -- First-seen-order bucketing by a raw field value

pub mod aggregate;
pub mod fold;
pub mod matcher;
pub mod normalize;

pub use aggregate::{group_by, group_by_spec};
pub use fold::{fold, fold_all, fold_with_stats, merge_record, FoldOutcome, FoldStats, MergePolicy};
pub use matcher::{canonical_field, identity, matches, Canonical};
pub use normalize::{canonicalize, normalize, text_form};
