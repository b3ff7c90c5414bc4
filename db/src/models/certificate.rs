use std::fmt::Display;

use certvault_common::views::{Certificate, CertificateType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbCertificate {
    /// Assigned by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub title: String,

    /// Sanitized file names as uploaded
    pub cert_filename: String,
    pub key_filename: String,

    /// Blob store keys of the certificate and key PEM
    pub cert_path: String,
    pub key_path: String,

    /// Derived from the stored certificate on every write
    pub expiration_date: Option<NaiveDate>,

    pub uploaded_at: DateTime<Utc>,

    #[serde(rename = "type")]
    pub certificate_type: CertificateType,

    /// Advisory reference to the issuing record
    pub parent_id: Option<u64>,
}

impl Display for DbCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DbCertificate {{ id: {:?}, title: {}, type: {} }}",
            self.id, self.title, self.certificate_type
        )
    }
}

impl TryFrom<DbCertificate> for Certificate {
    type Error = StoreError;

    /// Only stored records carry an identifier and can be shown.
    fn try_from(value: DbCertificate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.ok_or(StoreError::Unsaved)?,
            title: value.title,
            cert_filename: value.cert_filename,
            key_filename: value.key_filename,
            expiration_date: value.expiration_date,
            certificate_type: value.certificate_type,
            parent_id: value.parent_id,
            uploaded_at: value.uploaded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::record;

    #[test]
    fn test_unsaved_record_has_no_view() {
        let unsaved = record("draft", CertificateType::SslTls);
        assert!(matches!(
            Certificate::try_from(unsaved),
            Err(StoreError::Unsaved)
        ));
    }

    #[test]
    fn test_stored_record_keeps_its_id() {
        let mut stored = record("stored", CertificateType::RootCa);
        stored.id = Some(7);

        let view = Certificate::try_from(stored).unwrap();
        assert_eq!(view.id, 7);
        assert_eq!(view.certificate_type, CertificateType::RootCa);
    }
}
