use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CertificateMetadata;

/// The kind of certificate a stored pair holds. This is chosen by the user at
/// upload time and is not derived from the certificate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, ToSchema)]
pub enum CertificateType {
    #[default]
    #[serde(rename = "Not Specified")]
    Unspecified,

    #[serde(rename = "SSL/TLS")]
    SslTls,

    #[serde(rename = "Wildcard")]
    Wildcard,

    #[serde(rename = "Self-Signed")]
    SelfSigned,

    #[serde(rename = "Multi-Domain")]
    MultiDomain,

    #[serde(rename = "Intermediate CA")]
    IntermediateCa,

    #[serde(rename = "Root CA")]
    RootCa,
}

impl CertificateType {
    pub const ALL: [CertificateType; 7] = [
        CertificateType::Unspecified,
        CertificateType::SslTls,
        CertificateType::Wildcard,
        CertificateType::SelfSigned,
        CertificateType::MultiDomain,
        CertificateType::IntermediateCa,
        CertificateType::RootCa,
    ];

    /// Whether a record of this type may be offered as the parent of another
    /// record.
    pub fn is_parent_eligible(self) -> bool {
        match self {
            CertificateType::IntermediateCa | CertificateType::RootCa => true,
            CertificateType::Unspecified
            | CertificateType::SslTls
            | CertificateType::Wildcard
            | CertificateType::SelfSigned
            | CertificateType::MultiDomain => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CertificateType::Unspecified => "Not Specified",
            CertificateType::SslTls => "SSL/TLS",
            CertificateType::Wildcard => "Wildcard",
            CertificateType::SelfSigned => "Self-Signed",
            CertificateType::MultiDomain => "Multi-Domain",
            CertificateType::IntermediateCa => "Intermediate CA",
            CertificateType::RootCa => "Root CA",
        }
    }
}

impl Display for CertificateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A certificate/private-key pair stored in the repository.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct Certificate {
    /// The identifier assigned by the record store.
    pub id: u64,

    /// Display title. Defaults to the certificate's Common Name when the
    /// uploader did not provide one.
    pub title: String,

    pub cert_filename: String,
    pub key_filename: String,

    /// The certificate's "not valid after" date, if it could be decoded.
    pub expiration_date: Option<NaiveDate>,

    pub certificate_type: CertificateType,

    /// The record this certificate was issued by. This reference is advisory
    /// and may point at a record that no longer exists.
    pub parent_id: Option<u64>,

    pub uploaded_at: DateTime<Utc>,
}

/// Everything known about a stored pair: the record, the record it names as
/// its parent, the decoded certificate metadata and the stored PEM text.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CertificateDetails {
    pub certificate: Certificate,

    /// The parent record, when `parent_id` resolves to an existing record.
    pub parent: Option<Certificate>,

    pub metadata: CertificateMetadata,

    pub cert_pem: String,
    pub key_pem: String,
}
