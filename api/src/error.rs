use axum::{Json, http::StatusCode, response::IntoResponse};
use certvault_common::views::ApiErrorResponse;
use certvault_db::{blobs::BlobError, storage::StoreError};
use certvault_x509::DecodeError;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Something went wrong on our end. Please try again later.";
const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid certificate or key pair")]
    InvalidKeyPair,

    #[error(transparent)]
    Inspect(#[from] DecodeError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    InternalAnyhow(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::InvalidKeyPair => StatusCode::BAD_REQUEST,
            Self::Inspect(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(StoreError::NotFound) => StatusCode::NOT_FOUND,
            Self::Blob(BlobError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Blob(_) | Self::InternalAnyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(err: ApiError) -> Self {
        let (code, message) = match &err {
            ApiError::NotFound
            | ApiError::Storage(StoreError::NotFound)
            | ApiError::Blob(BlobError::NotFound(_)) => {
                ("NotFound", NOT_FOUND_MESSAGE.to_string())
            }
            ApiError::BadRequest(message) => ("BadRequest", message.clone()),
            ApiError::InvalidKeyPair => {
                ("InvalidKeyPair", "Invalid certificate or key pair!".into())
            }
            ApiError::Inspect(_) => (
                "InvalidCertificate",
                "The stored certificate could not be decoded.".into(),
            ),
            ApiError::Storage(_) | ApiError::Blob(_) | ApiError::InternalAnyhow(_) => {
                ("InternalError", INTERNAL_MESSAGE.to_string())
            }
        };

        ApiErrorResponse {
            code: Some(code.into()),
            message,

            #[cfg(debug_assertions)]
            details: Some(err.to_string()),

            #[cfg(not(debug_assertions))]
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Error returned by handler: {self}");

        let status_code = self.status_code();
        (status_code, Json(Into::<ApiErrorResponse>::into(self))).into_response()
    }
}
