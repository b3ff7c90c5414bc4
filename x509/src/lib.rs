//! Certificate validation and metadata extraction.
//!
//! This crate holds the only real domain logic in certvault:
//!
//! - [`validate`] proves that a PEM private key corresponds to the public key
//!   of a PEM certificate, using rustls' own key consistency check.
//! - [`inspect`] decodes a certificate into a
//!   [`CertificateMetadata`](certvault_common::views::CertificateMetadata)
//!   record, while [`expiration_of`] and [`common_name_of`] pull out the two
//!   facts the upload flow needs.
//!
//! Every function is a pure transformation over the bytes it is handed. No
//! file I/O happens here.

pub mod error;
pub mod inspect;
pub mod validate;

mod pem;

pub use error::DecodeError;
pub use inspect::{UNKNOWN_COMMON_NAME, common_name_of, expiration_of, inspect};
pub use validate::validate;
