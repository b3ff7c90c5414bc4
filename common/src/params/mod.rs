//! Input parameters for the various functions within certvault.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::views::CertificateType;

/// Request body for uploading a new certificate/private-key pair.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UploadCertificateParams {
    /// Display title. When empty or missing, the certificate's Common Name is
    /// used instead.
    #[serde(default)]
    pub title: Option<String>,

    /// Name of the uploaded certificate file. Must end in `.crt`, `.key` or
    /// `.pem`.
    pub cert_filename: String,

    /// Name of the uploaded private key file. Must end in `.crt`, `.key` or
    /// `.pem`.
    pub key_filename: String,

    /// PEM-encoded certificate.
    pub cert_pem: String,

    /// PEM-encoded private key matching `cert_pem`.
    pub key_pem: String,

    #[serde(default)]
    pub certificate_type: CertificateType,

    /// Identifier of the record that issued this certificate.
    #[serde(default)]
    pub parent_id: Option<u64>,
}

/// Request body for replacing the content of a stored pair.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateCertificateParams {
    /// New title. The existing title is kept when missing.
    #[serde(default)]
    pub title: Option<String>,

    /// PEM-encoded certificate.
    pub cert_pem: String,

    /// PEM-encoded private key matching `cert_pem`.
    pub key_pem: String,

    /// New certificate type. The existing type is kept when missing.
    #[serde(default)]
    pub certificate_type: Option<CertificateType>,

    /// Replaces the parent reference. A missing value clears it.
    #[serde(default)]
    pub parent_id: Option<u64>,
}
