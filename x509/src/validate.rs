//! Certificate/private-key correspondence checks.

use openssl::{
    error::ErrorStack,
    pkey::PKey,
    ssl::{SslContext, SslMethod},
    x509::X509,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{DecodeError, pem};

#[derive(Debug, Error)]
enum PairError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("OpenSSL rejected the pair: {0}")]
    Rejected(#[from] ErrorStack),
}

/// Check that `key_pem` is the private key for the public key embedded in
/// `cert_pem`.
///
/// Both inputs are PEM. The key may use any algorithm OpenSSL can load (RSA
/// of any size, ECDSA on any named curve, Ed25519, DSA) in PKCS#1, PKCS#8 or
/// SEC1 framing.
///
/// The pair is loaded into a throwaway TLS context and OpenSSL is asked
/// whether the key matches the certificate. Every failure, whether the
/// certificate, the key, or the match itself, returns `false`. The cause is
/// logged but not returned.
#[instrument(skip_all)]
pub fn validate(cert_pem: &[u8], key_pem: &[u8]) -> bool {
    match check_pair(cert_pem, key_pem) {
        Ok(()) => {
            debug!("Private key matches certificate");
            true
        }
        Err(e) => {
            warn!("Error validating certificate: {}", e);
            false
        }
    }
}

fn check_pair(cert_pem: &[u8], key_pem: &[u8]) -> Result<(), PairError> {
    let cert = X509::from_der(&pem::read_certificate(cert_pem)?)?;
    let key = PKey::private_key_from_der(pem::read_private_key(key_pem)?.secret_der())?;

    let mut context = SslContext::builder(SslMethod::tls())?;
    // RSA-1024 and other weak keys must still load.
    context.set_security_level(0);
    context.set_private_key(&key)?;
    context.set_certificate(&cert)?;
    context.check_private_key()?;

    Ok(())
}
