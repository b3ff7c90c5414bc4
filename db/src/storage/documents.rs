use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CertificateFilter, StoreError};
use crate::models::DbCertificate;

/// The certificate table shared by the storage backends. Identifiers start
/// at 1 and are never reused, even after the highest record is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Documents {
    next_id: u64,
    certificates: BTreeMap<u64, DbCertificate>,
}

impl Default for Documents {
    fn default() -> Self {
        Self {
            next_id: 1,
            certificates: BTreeMap::new(),
        }
    }
}

impl Documents {
    pub(crate) fn insert(&mut self, mut certificate: DbCertificate) -> DbCertificate {
        let id = self.next_id;
        self.next_id += 1;

        certificate.id = Some(id);
        self.certificates.insert(id, certificate.clone());
        certificate
    }

    pub(crate) fn get(&self, id: u64) -> Option<DbCertificate> {
        self.certificates.get(&id).cloned()
    }

    pub(crate) fn update(
        &mut self,
        id: u64,
        mut certificate: DbCertificate,
    ) -> Result<DbCertificate, StoreError> {
        let slot = self.certificates.get_mut(&id).ok_or(StoreError::NotFound)?;

        certificate.id = Some(id);
        *slot = certificate.clone();
        Ok(certificate)
    }

    pub(crate) fn remove(&mut self, id: u64) -> Result<DbCertificate, StoreError> {
        self.certificates.remove(&id).ok_or(StoreError::NotFound)
    }

    pub(crate) fn list(&self, filter: &CertificateFilter) -> Vec<DbCertificate> {
        self.certificates
            .values()
            .filter(|certificate| filter.matches(certificate))
            .cloned()
            .collect()
    }
}
