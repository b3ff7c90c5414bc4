//! certvault API service.
//!
//! Stores certificate/private-key pairs and serves them back, together with
//! the metadata decoded from each certificate.
//!
//! # Configuration
//!
//! See [`config::CertVaultConfig`] for the available options. Records are kept
//! in a JSON file and the uploaded PEM files under an upload directory.
//!
//! # Validation
//!
//! Every upload and edit is gated on [`certvault_x509::validate`]: a pair is
//! only written if the private key matches the certificate.

pub mod config;
pub mod context;
pub mod server;

pub(crate) mod error;
pub(crate) mod handlers;
