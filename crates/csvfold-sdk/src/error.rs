use std::path::PathBuf;

use csvfold_io::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// A configured source is absent. Raised before any source is parsed.
    #[error("At least one file given in options does not exists.")]
    MissingInputFile(PathBuf),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
