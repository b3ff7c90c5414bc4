use async_trait::async_trait;
use certvault_common::views::CertificateType;
use thiserror::Error;

use crate::models::DbCertificate;

mod documents;
pub mod json;
pub mod memory;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Record has not been stored yet")]
    Unsaved,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait Storage: CertificateStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Selects records by identifier and/or certificate type. Empty criteria
/// match everything.
#[derive(Debug, Default, Clone)]
pub struct CertificateFilter {
    pub id: Option<Vec<u64>>,
    pub certificate_type: Option<Vec<CertificateType>>,
}

impl CertificateFilter {
    /// Records that may be offered as the parent of another record.
    pub fn parents() -> Self {
        Self {
            id: None,
            certificate_type: Some(
                CertificateType::ALL
                    .into_iter()
                    .filter(|ty| ty.is_parent_eligible())
                    .collect(),
            ),
        }
    }

    pub fn matches(&self, certificate: &DbCertificate) -> bool {
        let id_matches = match (&self.id, certificate.id) {
            (Some(ids), Some(id)) => ids.contains(&id),
            (Some(_), None) => false,
            (None, _) => true,
        };

        let type_matches = self
            .certificate_type
            .as_ref()
            .is_none_or(|types| types.contains(&certificate.certificate_type));

        id_matches && type_matches
    }
}

#[async_trait]
pub trait CertificateStore {
    /// Store a new record, returning it with its assigned identifier.
    async fn insert(&self, certificate: DbCertificate) -> Result<DbCertificate, StoreError>;

    async fn get(&self, id: u64) -> Result<Option<DbCertificate>, StoreError>;

    /// Replace the record stored under `id`.
    async fn update(
        &self,
        id: u64,
        certificate: DbCertificate,
    ) -> Result<DbCertificate, StoreError>;

    /// Remove and return the record stored under `id`.
    async fn remove(&self, id: u64) -> Result<DbCertificate, StoreError>;

    /// All matching records, ordered by identifier.
    async fn list(&self, filter: CertificateFilter) -> Result<Vec<DbCertificate>, StoreError>;
}
