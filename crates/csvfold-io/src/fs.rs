use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::traits::Storage;

/// Local filesystem storage backed by `tokio::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    async fn write(&self, path: &Path, data: Vec<u8>) -> StorageResult<()> {
        // Ensure parent directory exists.
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        let len = data.len();
        tokio::fs::write(path, data)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        debug!(path = %path.display(), bytes = len, "file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let storage = FsStorage::new();

        assert!(!storage.exists(&path));
        storage.write(&path, b"[]".to_vec()).await.unwrap();
        assert!(storage.exists(&path));
        assert_eq!(storage.read(&path).await.unwrap(), b"[]");
    }

    #[tokio::test]
    async fn write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let storage = FsStorage::new();

        storage.write(&path, b"[1,2,3]".to_vec()).await.unwrap();
        storage.write(&path, b"[]".to_vec()).await.unwrap();
        assert_eq!(storage.read(&path).await.unwrap(), b"[]");
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStorage::new()
            .read(&dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
