//! Storage for the uploaded certificate and key bytes.
//!
//! Keys are `/`-separated relative paths such as `01J.../server.crt`. Every
//! segment is checked so a key can never escape the store's root directory.

use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Write `bytes` under `key`, replacing any previous content.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError>;

    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

/// Reduce an uploaded file name to a safe single path segment: the directory
/// part is dropped, whitespace becomes `_`, and anything outside
/// `[A-Za-z0-9._-]` is removed along with leading dots and underscores. The
/// result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

fn check_key(key: &str) -> Result<(), BlobError> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });

    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

/// Blobs stored as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        check_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    fn not_found(key: &str, e: std::io::Error) -> BlobError {
        if e.kind() == std::io::ErrorKind::NotFound {
            BlobError::NotFound(key.to_string())
        } else {
            BlobError::Io(e)
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| Self::not_found(key, e))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| Self::not_found(key, e))?;

        // Drop the per-upload directory once it is empty.
        if let Some(parent) = path.parent().filter(|p| *p != self.root) {
            if let Err(e) = tokio::fs::remove_dir(parent).await {
                debug!("Keeping upload directory {}: {}", parent.display(), e);
            }
        }

        Ok(())
    }
}

/// Blobs held in memory. Used by tests and throwaway instances.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored key, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.blobs.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError> {
        check_key(key)?;
        self.blobs
            .write()
            .await
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        check_key(key)?;
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        check_key(key)?;
        self.blobs
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("server.crt"), "server.crt");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\certs\\my cert.pem"), "my_cert.pem");
        assert_eq!(sanitize_filename(".hidden.key"), "hidden.key");
        assert_eq!(sanitize_filename("wild*card?.crt"), "wildcard.crt");
        assert_eq!(sanitize_filename("../.."), "");
    }

    #[test]
    fn test_check_key_rejects_traversal() {
        assert!(check_key("01ABC/server.crt").is_ok());
        assert!(check_key("../server.crt").is_err());
        assert!(check_key("a//b").is_err());
        assert!(check_key("/etc/passwd").is_err());
        assert!(check_key("").is_err());
    }

    #[tokio::test]
    async fn test_fs_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("uploads")).await.unwrap();

        store.put("upload-1/server.crt", b"CERT").await.unwrap();
        assert_eq!(store.get("upload-1/server.crt").await.unwrap(), b"CERT");

        store.put("upload-1/server.crt", b"NEW").await.unwrap();
        assert_eq!(store.get("upload-1/server.crt").await.unwrap(), b"NEW");

        store.delete("upload-1/server.crt").await.unwrap();
        assert!(matches!(
            store.get("upload-1/server.crt").await,
            Err(BlobError::NotFound(_))
        ));
        let root = dir.path().join("uploads");
        assert!(!root.join("upload-1").exists());
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_fs_keeps_directory_with_remaining_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path()).await.unwrap();

        store.put("upload-1/server.crt", b"CERT").await.unwrap();
        store.put("upload-1/server.key", b"KEY").await.unwrap();
        store.delete("upload-1/server.crt").await.unwrap();

        assert_eq!(store.get("upload-1/server.key").await.unwrap(), b"KEY");
        assert!(dir.path().join("upload-1").is_dir());
    }

    #[tokio::test]
    async fn test_memory_keys() {
        let store = MemoryBlobStore::new();
        store.put("b/server.key", b"KEY").await.unwrap();
        store.put("a/server.crt", b"CERT").await.unwrap();
        store.delete("b/server.key").await.unwrap();

        assert_eq!(store.keys().await, vec!["a/server.crt".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_delete_missing_is_not_found() {
        let store = MemoryBlobStore::new();

        assert!(matches!(
            store.delete("nope/server.crt").await,
            Err(BlobError::NotFound(_))
        ));
    }
}
