use std::io;
use std::path::{Path, PathBuf};

use csvfold_types::Encoding;

/// Errors from parsing sources and reading or writing files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The path does not exist.
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// I/O error from the underlying backend.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source is not valid delimited text.
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The column delimiter is not a single ASCII character.
    #[error("invalid column delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(char),

    /// Text cannot be represented in the target encoding.
    #[error("cannot encode {character:?} as {encoding}")]
    Unencodable { encoding: Encoding, character: char },

    /// Bytes are not valid in the declared encoding.
    #[error("invalid {encoding} data: {reason}")]
    Decode { encoding: Encoding, reason: String },
}

impl StorageError {
    /// Wrap an I/O error, mapping `NotFound` to [`StorageError::NotFound`].
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result alias for storage and parse operations.
pub type StorageResult<T> = Result<T, StorageError>;
