//! Foundation types for csvfold.
//!
//! This crate provides the record model and the option types shared by every
//! other csvfold crate.
//!
//! # Key Types
//!
//! - [`Record`] -- Ordered field name → JSON value mapping (one CSV row)
//! - [`Dataset`] -- Ordered sequence of records
//! - [`MergeOptions`] -- Full configuration for one merge run
//! - [`GroupBy`] -- Optional grouping specification
//! - [`Encoding`] -- Text encoding of the persisted output
//! - [`NormalizeScope`] -- Which incoming fields are canonicalized on merge

pub mod error;
pub mod options;
pub mod record;

pub use error::{ConfigError, ConfigResult};
pub use options::{Encoding, GroupBy, MergeOptions, NormalizeScope, DEFAULT_OUTPUT_EXTENSION};
pub use record::{record_from_pairs, Dataset, Record};
