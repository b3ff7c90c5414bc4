use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CertificateFilter, CertificateStore, Storage, StoreError, documents::Documents};
use crate::models::DbCertificate;

/// Keeps every record in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<Documents>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CertificateStore for MemoryStorage {
    async fn insert(&self, certificate: DbCertificate) -> Result<DbCertificate, StoreError> {
        Ok(self.documents.write().await.insert(certificate))
    }

    async fn get(&self, id: u64) -> Result<Option<DbCertificate>, StoreError> {
        Ok(self.documents.read().await.get(id))
    }

    async fn update(
        &self,
        id: u64,
        certificate: DbCertificate,
    ) -> Result<DbCertificate, StoreError> {
        self.documents.write().await.update(id, certificate)
    }

    async fn remove(&self, id: u64) -> Result<DbCertificate, StoreError> {
        self.documents.write().await.remove(id)
    }

    async fn list(&self, filter: CertificateFilter) -> Result<Vec<DbCertificate>, StoreError> {
        Ok(self.documents.read().await.list(&filter))
    }
}
