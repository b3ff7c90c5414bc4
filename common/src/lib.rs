//! Types shared between the certvault crates.
//!
//! [`params`] holds request inputs, [`views`] holds everything returned to a
//! client, including the [`views::CertificateMetadata`] record produced by
//! certificate inspection.

pub mod params;
pub mod views;
