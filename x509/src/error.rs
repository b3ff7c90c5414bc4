use thiserror::Error;

/// A certificate or private key could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed PEM: {0}")]
    Pem(#[source] std::io::Error),

    #[error("No certificate found in PEM data")]
    MissingCertificate,

    #[error("No private key found in PEM data")]
    MissingPrivateKey,

    #[error("Invalid certificate: {0}")]
    Certificate(String),

    #[error("Invalid certificate extension: {0}")]
    Extension(String),

    #[error("Certificate timestamp out of range: {0}")]
    Timestamp(i64),
}
