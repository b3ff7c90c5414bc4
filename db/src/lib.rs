//! Persistence for certvault.
//!
//! Two independent stores sit behind traits so that the API layer can be
//! wired to real files in production and to in-memory fakes in tests:
//!
//! - [`storage`] keeps [`models::DbCertificate`] records keyed by an
//!   auto-incrementing integer.
//! - [`blobs`] keeps the uploaded PEM bytes those records point at.

pub mod blobs;
pub mod models;
pub mod storage;
