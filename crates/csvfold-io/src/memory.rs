use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use csvfold_types::Dataset;

use crate::error::{StorageError, StorageResult};
use crate::parser::parse_delimited;
use crate::traits::{RecordParser, Storage};

/// In-memory, `HashMap`-based storage and parser.
///
/// Intended for tests and embedding. Files are held behind a `RwLock` and
/// cloned on read/write. Paths registered with [`fail_on`](Self::fail_on)
/// fail every read, write, and parse with an I/O error.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    failing: RwLock<HashSet<PathBuf>>,
    parse_calls: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryStorage {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `contents` at `path`, replacing anything already there.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.into(), contents.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Make every operation on `path` fail.
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing
            .write()
            .expect("lock poisoned")
            .insert(path.into());
    }

    /// Current contents of `path`.
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().expect("lock poisoned").get(path).cloned()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }

    /// Number of [`RecordParser::parse`] calls so far.
    pub fn parse_calls(&self) -> usize {
        self.parse_calls.load(Ordering::SeqCst)
    }

    /// Number of [`Storage::write`] calls so far, failed ones included.
    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_failing(&self, path: &Path) -> StorageResult<()> {
        if self.failing.read().expect("lock poisoned").contains(path) {
            return Err(StorageError::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().expect("lock poisoned").contains_key(path)
    }

    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.check_failing(path)?;
        self.get(path)
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    async fn write(&self, path: &Path, data: Vec<u8>) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_failing(path)?;
        self.insert(path, data);
        Ok(())
    }
}

#[async_trait]
impl RecordParser for InMemoryStorage {
    async fn parse(&self, path: &Path, delimiter: char) -> StorageResult<Dataset> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        let bytes = self.read(path).await?;
        parse_delimited(path, &bytes, delimiter)
    }
}
