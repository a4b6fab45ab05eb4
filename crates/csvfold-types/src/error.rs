use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading or validating options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
