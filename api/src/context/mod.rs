use std::sync::Arc;

use certvault_db::{
    blobs::{BlobStore, FsBlobStore},
    storage::{JsonFileStorage, Storage},
};

use crate::config::CertVaultConfig;

#[derive(Clone)]
pub struct ApiContext {
    pub db: Arc<dyn Storage>,
    pub blobs: Arc<dyn BlobStore>,
}

impl ApiContext {
    pub fn new(db: Arc<dyn Storage>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { db, blobs }
    }

    /// Open the on-disk stores named in the configuration.
    pub async fn from_config(config: &CertVaultConfig) -> anyhow::Result<Self> {
        let db = JsonFileStorage::open(&config.db_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to open {}: {}", config.db_path.display(), e))?;

        let blobs = FsBlobStore::new(&config.upload_dir).await.map_err(|e| {
            anyhow::anyhow!("failed to open {}: {}", config.upload_dir.display(), e)
        })?;

        Ok(Self::new(Arc::new(db), Arc::new(blobs)))
    }
}
