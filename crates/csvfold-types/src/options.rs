//! Merge options and configuration loading.
//!
//! Field names serialize in camelCase so existing option files
//! (`inputDir`, `inputKeys`, `inputFileNameList`, ...) load unchanged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Extension appended to `output_file_name` for the persisted document.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "json";

/// Text encoding used for the persisted output document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Ascii,
    Utf16Le,
}

impl Encoding {
    /// Canonical lower-case label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Latin1 => "latin1",
            Self::Ascii => "ascii",
            Self::Utf16Le => "utf16le",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "binary" | "iso-8859-1" => Ok(Self::Latin1),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Self::Utf16Le),
            other => Err(ConfigError::UnknownEncoding(other.to_string())),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.label().to_string()
    }
}

/// Which incoming fields are canonicalized when a match is merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NormalizeScope {
    /// Every field carried by the incoming record is canonicalized.
    #[default]
    AllFields,
    /// Only the match keys are canonicalized; other fields are copied raw.
    MatchKeys,
}

/// Grouping specification applied after all folds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBy {
    /// Field whose raw value selects the bucket.
    pub group_by_key: String,
    /// Name of the produced array-of-members field.
    pub grouped_array_property: String,
}

impl GroupBy {
    pub fn new(group_by_key: impl Into<String>, grouped_array_property: impl Into<String>) -> Self {
        Self {
            group_by_key: group_by_key.into(),
            grouped_array_property: grouped_array_property.into(),
        }
    }
}

/// Configuration for one merge run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Directory holding the source files.
    pub input_dir: PathBuf,
    /// Ordered match-key field names defining record identity.
    pub input_keys: Vec<String>,
    /// Source file names; their order fixes the fold sequence.
    pub input_file_name_list: Vec<String>,
    /// Directory receiving the persisted document.
    pub output_dir: PathBuf,
    /// Output file name without the `.json` extension.
    pub output_file_name: String,
    /// Field separator of the source files.
    pub column_delimiter: char,
    pub encoding: Encoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_to_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_values: Option<bool>,
    pub normalize_scope: NormalizeScope,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            input_keys: Vec::new(),
            input_file_name_list: Vec::new(),
            output_dir: PathBuf::from("."),
            output_file_name: "output".into(),
            column_delimiter: ',',
            encoding: Encoding::default(),
            group_by: None,
            write_to_file: None,
            replace_values: None,
            normalize_scope: NormalizeScope::default(),
        }
    }
}

impl MergeOptions {
    pub fn new<K, F>(input_dir: impl Into<PathBuf>, input_keys: K, input_file_name_list: F) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            input_dir: input_dir.into(),
            input_keys: input_keys.into_iter().map(Into::into).collect(),
            input_file_name_list: input_file_name_list.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self.output_file_name = file_name.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.column_delimiter = delimiter;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn with_write_to_file(mut self, write: bool) -> Self {
        self.write_to_file = Some(write);
        self
    }

    pub fn with_replace_values(mut self, replace: bool) -> Self {
        self.replace_values = Some(replace);
        self
    }

    pub fn with_normalize_scope(mut self, scope: NormalizeScope) -> Self {
        self.normalize_scope = scope;
        self
    }

    /// Full paths of every source, in configured order.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.input_file_name_list
            .iter()
            .map(|name| self.input_dir.join(name))
            .collect()
    }

    /// Path of the persisted document: `<output_dir>/<output_file_name>.json`.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.output_file_name, DEFAULT_OUTPUT_EXTENSION
        ))
    }

    /// Unset means append-on-every-match.
    pub fn replaces_values(&self) -> bool {
        self.replace_values.unwrap_or(false)
    }

    /// Persistence happens only when explicitly requested.
    pub fn writes_to_file(&self) -> bool {
        self.write_to_file == Some(true)
    }

    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load options from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
