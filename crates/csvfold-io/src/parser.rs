//! Delimited-text parsing.
//!
//! Conventions:
//! - The first row names the columns.
//! - Headers and cells are trimmed; blank lines are skipped.
//! - Ragged rows are accepted: missing trailing cells are omitted, extra
//!   cells are named `field{N}` after their 1-based column.
//! - Every cell becomes a JSON string.

use std::path::Path;

use async_trait::async_trait;
use csvfold_types::{Dataset, Record};
use serde_json::Value;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::traits::RecordParser;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn delimiter_byte(delimiter: char) -> StorageResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(StorageError::InvalidDelimiter(delimiter))
    }
}

/// Parse in-memory delimited text. `source` is used for error context only.
pub fn parse_delimited(source: &Path, bytes: &[u8], delimiter: char) -> StorageResult<Dataset> {
    let delimiter = delimiter_byte(delimiter)?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let csv_err = |source_err: csv::Error| StorageError::Csv {
        path: source.to_path_buf(),
        source: source_err,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Dataset::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        let mut record = Record::new();
        for (column, cell) in row.iter().enumerate() {
            let name = headers
                .get(column)
                .cloned()
                .unwrap_or_else(|| format!("field{}", column + 1));
            record.insert(name, Value::String(cell.to_string()));
        }
        records.push(record);
    }

    debug!(path = %source.display(), columns = headers.len(), rows = records.len(), "parsed source");
    Ok(records)
}

/// Parses delimited-text files from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvFileParser;

impl CsvFileParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordParser for CsvFileParser {
    async fn parse(&self, path: &Path, delimiter: char) -> StorageResult<Dataset> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        parse_delimited(path, &bytes, delimiter)
    }
}
