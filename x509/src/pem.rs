//! PEM framing for certificates and private keys.

use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use crate::DecodeError;

/// Decode the first `CERTIFICATE` section. Any other sections are skipped.
pub(crate) fn read_certificate(pem: &[u8]) -> Result<CertificateDer<'static>, DecodeError> {
    rustls_pemfile::certs(&mut &pem[..])
        .next()
        .ok_or(DecodeError::MissingCertificate)?
        .map_err(DecodeError::Pem)
}

/// Decode the first PKCS#1, PKCS#8 or SEC1 private key section.
pub(crate) fn read_private_key(pem: &[u8]) -> Result<PrivateKeyDer<'static>, DecodeError> {
    rustls_pemfile::private_key(&mut &pem[..])
        .map_err(DecodeError::Pem)?
        .ok_or(DecodeError::MissingPrivateKey)
}
