use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use csvfold_io::encoding::{decode, encode};
use csvfold_io::{CsvFileParser, FsStorage, InMemoryStorage, RecordParser, Storage};
use csvfold_merge::{fold_all, group_by_spec, MergePolicy};
use csvfold_types::{Dataset, Encoding, MergeOptions};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{SdkError, SdkResult};

/// Merges configured sources into one dataset.
///
/// Parsing and file access go through the [`RecordParser`] and [`Storage`]
/// collaborators. Output writes are spawned and not awaited by the merge
/// call; [`flush`](Self::flush) waits for the ones still running.
pub struct CsvMerger {
    parser: Arc<dyn RecordParser>,
    storage: Arc<dyn Storage>,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
}

impl CsvMerger {
    pub fn new(parser: Arc<dyn RecordParser>, storage: Arc<dyn Storage>) -> Self {
        Self {
            parser,
            storage,
            pending_writes: Mutex::new(Vec::new()),
        }
    }

    /// Merger over the local filesystem.
    pub fn filesystem() -> Self {
        Self::new(Arc::new(CsvFileParser::new()), Arc::new(FsStorage::new()))
    }

    /// Merger whose sources and output both live in `storage`.
    pub fn in_memory(storage: Arc<InMemoryStorage>) -> Self {
        Self::new(storage.clone(), storage)
    }

    // ---- Merge ----

    /// Parse every source, fold them left to right, optionally group, and
    /// optionally persist.
    ///
    /// Fails with [`SdkError::MissingInputFile`] before parsing anything if
    /// any source is absent. A persistence failure is logged and does not
    /// affect the returned dataset.
    pub async fn merge_csv_files_to_json_array(&self, options: &MergeOptions) -> SdkResult<Dataset> {
        let sources = match self.import_sources(options).await {
            Ok(sources) => sources,
            Err(e) => {
                error!(error = %e, "merge failed");
                return Err(e);
            }
        };

        info!(files = sources.len(), "number of files to import");
        if sources.is_empty() {
            warn!("no input files configured; result is empty");
        }

        let policy = MergePolicy {
            replace_values: options.replaces_values(),
            normalize_scope: options.normalize_scope,
        };
        let merged = fold_all(sources, &options.input_keys, policy);

        let result = match &options.group_by {
            Some(spec) => group_by_spec(merged, spec),
            None => merged,
        };

        if options.writes_to_file() {
            self.write_output_file(options, &result).await;
        }
        Ok(result)
    }

    /// Check every source exists, then parse them all concurrently.
    /// Results keep the configured order.
    async fn import_sources(&self, options: &MergeOptions) -> SdkResult<Vec<Dataset>> {
        let paths = options.source_paths();

        if let Some(missing) = paths.iter().find(|p| !self.storage.exists(p)) {
            error!(path = %missing.display(), "file not found");
            return Err(SdkError::MissingInputFile(missing.clone()));
        }

        let delimiter = options.column_delimiter;
        let tasks: Vec<(PathBuf, JoinHandle<_>)> = paths
            .into_iter()
            .map(|path| {
                info!(path = %path.display(), "importing file");
                let parser = Arc::clone(&self.parser);
                let task_path = path.clone();
                let handle = tokio::spawn(async move { parser.parse(&task_path, delimiter).await });
                (path, handle)
            })
            .collect();

        let mut datasets = Vec::with_capacity(tasks.len());
        for (path, handle) in tasks {
            let parsed = handle
                .await
                .map_err(|e| SdkError::Internal(format!("parse task for {}: {e}", path.display())))?;
            let dataset = parsed.map_err(|source| SdkError::Parse { path, source })?;
            datasets.push(dataset);
        }
        Ok(datasets)
    }

    // ---- Persistence ----

    /// Spawn a write of `dataset` to the configured output path.
    ///
    /// Returns once the write is scheduled. Failures are logged only.
    pub async fn write_output_file(&self, options: &MergeOptions, dataset: &Dataset) {
        let path = options.output_path();
        let bytes = match render(dataset, options.encoding) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot render output file");
                return;
            }
        };

        let records = dataset.len();
        let storage = Arc::clone(&self.storage);
        let handle = tokio::spawn(async move {
            match storage.write(&path, bytes).await {
                Ok(()) => info!(path = %path.display(), records, "output file written"),
                Err(e) => error!(path = %path.display(), error = %e, "error writing output file"),
            }
        });
        let mut pending = self.pending_writes.lock().expect("lock poisoned");
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    #[cfg(test)]
    fn pending_write_count(&self) -> usize {
        self.pending_writes.lock().expect("lock poisoned").len()
    }

    /// Wait for every write spawned so far.
    pub async fn flush(&self) {
        let handles = std::mem::take(&mut *self.pending_writes.lock().expect("lock poisoned"));
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "output write task aborted");
            }
        }
    }

    // ---- Read-back ----

    /// Load a previously persisted result.
    ///
    /// Never fails: a missing, unreadable, or malformed document yields an
    /// empty dataset.
    pub async fn get_json_array(&self, options: &MergeOptions) -> Dataset {
        let path = options.output_path();
        match self.read_output(&path, options.encoding).await {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot read output file; was it generated by a merge first?"
                );
                Dataset::new()
            }
        }
    }

    async fn read_output(&self, path: &Path, encoding: Encoding) -> SdkResult<Dataset> {
        let bytes = self.storage.read(path).await?;
        let text = decode(&bytes, encoding)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn render(dataset: &Dataset, encoding: Encoding) -> SdkResult<Vec<u8>> {
    let text = serde_json::to_string(dataset)?;
    Ok(encode(&text, encoding)?)
}

/// Merge over the local filesystem.
///
/// A requested output write keeps running on the Tokio runtime after this
/// returns; use [`CsvMerger::flush`] to wait for it instead.
pub async fn merge_csv_files_to_json_array(options: &MergeOptions) -> SdkResult<Dataset> {
    CsvMerger::filesystem()
        .merge_csv_files_to_json_array(options)
        .await
}

/// Read back a result persisted on the local filesystem.
pub async fn get_json_array(options: &MergeOptions) -> Dataset {
    CsvMerger::filesystem().get_json_array(options).await
}
