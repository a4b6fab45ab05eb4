//! High-level API for csvfold.
//!
//! Merges several delimited-text sources into one JSON collection,
//! reconciling overlapping records by a caller-specified identity key and
//! optionally grouping the result. This is the main entry point for
//! applications embedding csvfold.

pub mod error;
pub mod merger;

pub use error::{SdkError, SdkResult};
pub use merger::{get_json_array, merge_csv_files_to_json_array, CsvMerger};

// Re-export key types
pub use csvfold_io::{FsStorage, InMemoryStorage, RecordParser, Storage, StorageError};
pub use csvfold_merge::{FoldStats, MergePolicy};
pub use csvfold_types::{Dataset, Encoding, GroupBy, MergeOptions, NormalizeScope, Record};
