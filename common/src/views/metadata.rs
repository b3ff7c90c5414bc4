use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured view of a decoded X.509 certificate.
///
/// Every `Option` field is `None` when the underlying attribute or extension
/// is missing from the certificate. A missing extension is never reported as
/// an empty list or a `false` flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CertificateMetadata {
    /// X.509 version, e.g. `v3`.
    pub version: String,

    pub issuer: IssuerName,
    pub subject: SubjectName,

    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,

    pub public_key_algorithm: PublicKeyAlgorithm,

    /// Key size in bits. Only reported for RSA and elliptic-curve keys.
    pub public_key_bits: Option<u32>,

    /// DNS names from the Subject Alternative Name extension, in the order
    /// the certificate declares them.
    pub subject_alternative_names: Option<Vec<String>>,

    /// The CA flag of the Basic Constraints extension.
    pub is_certificate_authority: Option<bool>,

    pub key_usage: Option<KeyUsageFlags>,
}

impl CertificateMetadata {
    /// True only when the certificate carries Basic Constraints with the CA
    /// flag set.
    pub fn is_ca(&self) -> bool {
        self.is_certificate_authority == Some(true)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_to
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct IssuerName {
    pub common_name: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SubjectName {
    pub common_name: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub locality: Option<String>,
    pub state_or_province: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum PublicKeyAlgorithm {
    #[serde(rename = "RSA")]
    Rsa,

    #[serde(rename = "Elliptic Curve")]
    EllipticCurve,

    Unknown,
}

/// The subset of Key Usage bits surfaced to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct KeyUsageFlags {
    pub digital_signature: bool,
    pub key_encipherment: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
}
