//! Output views for the various functions within certvault.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod certificate;
pub use certificate::*;

mod metadata;
pub use metadata::*;

/// A list of records returned by one of the list endpoints. The certificate
/// repository is small enough that every list is returned in a single page,
/// so `next_token` is currently always empty.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,

    /// The next page token, if any.
    pub next_token: Option<String>,

    /// The maximum number of results returned.
    pub limit: Option<u64>,
}

impl<T> From<Vec<T>> for PaginatedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
            limit: None,
        }
    }
}

/// An error response for an API endpoint. This is used to return errors to the
/// client in a consistent format.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// An optional error code that can be used to identify the type of error
    /// that occurred.
    pub code: Option<String>,

    /// A human-readable message describing the error that occurred.
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
