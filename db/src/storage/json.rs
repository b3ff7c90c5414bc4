use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::{CertificateFilter, CertificateStore, Storage, StoreError, documents::Documents};
use crate::models::DbCertificate;

/// A single JSON document on disk holding the whole certificate table.
///
/// Every write rewrites the file through a temporary sibling and a rename, so
/// a crash mid-write leaves the previous version in place. The in-memory copy
/// is only replaced after the file has been written.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    documents: RwLock<Documents>,
}

impl JsonFileStorage {
    /// Open the database at `path`, creating parent directories and starting
    /// empty if the file does not exist yet.
    #[instrument]
    pub async fn open(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Creating new certificate database");
                Documents::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            documents: RwLock::new(documents),
        })
    }

    async fn persist(&self, documents: &Documents) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "Persisted certificate database");
        Ok(())
    }

    /// Apply `change` to a copy of the table, write it out, then publish it.
    async fn write<T>(
        &self,
        change: impl FnOnce(&mut Documents) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.documents.write().await;

        let mut next = guard.clone();
        let result = change(&mut next)?;
        self.persist(&next).await?;

        *guard = next;
        Ok(result)
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        tokio::fs::metadata(dir)
            .await
            .map(|_| ())
            .map_err(StoreError::Io)
    }
}

#[async_trait]
impl CertificateStore for JsonFileStorage {
    async fn insert(&self, certificate: DbCertificate) -> Result<DbCertificate, StoreError> {
        self.write(|documents| Ok(documents.insert(certificate)))
            .await
    }

    async fn get(&self, id: u64) -> Result<Option<DbCertificate>, StoreError> {
        Ok(self.documents.read().await.get(id))
    }

    async fn update(
        &self,
        id: u64,
        certificate: DbCertificate,
    ) -> Result<DbCertificate, StoreError> {
        self.write(|documents| documents.update(id, certificate))
            .await
    }

    async fn remove(&self, id: u64) -> Result<DbCertificate, StoreError> {
        self.write(|documents| documents.remove(id)).await
    }

    async fn list(&self, filter: CertificateFilter) -> Result<Vec<DbCertificate>, StoreError> {
        Ok(self.documents.read().await.list(&filter))
    }
}
