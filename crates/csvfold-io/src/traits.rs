use std::path::Path;

use async_trait::async_trait;
use csvfold_types::Dataset;

use crate::error::StorageResult;

/// Turns one delimited-text source into an ordered dataset.
///
/// Implementations must:
/// - Treat the first row as the header.
/// - Return records in row order, fields in column order.
/// - Propagate unreadable or malformed input as an error.
#[async_trait]
pub trait RecordParser: Send + Sync {
    async fn parse(&self, path: &Path, delimiter: char) -> StorageResult<Dataset>;
}

/// Byte-level file access.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check whether `path` exists. Never fails.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full contents of `path`.
    ///
    /// Returns [`StorageError::NotFound`](crate::StorageError::NotFound) if
    /// nothing is stored there.
    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Replace the contents of `path` with `data`.
    async fn write(&self, path: &Path, data: Vec<u8>) -> StorageResult<()>;
}
