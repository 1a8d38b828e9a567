//! Error-to-response mapping for the resource surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docstore_core::StoreError;
use thiserror::Error;

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the resource adapter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The path names a collection no entity type was registered for.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Creates an unknown-collection error.
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection(name.into())
    }

    /// The response status for this error.
    ///
    /// The mapping is deterministic per error kind; a caller never
    /// sees a generic failure where a specific class exists.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCollection(_) => StatusCode::NOT_FOUND,
            ApiError::Store(err) => match err {
                StoreError::UnknownEntity { .. } => StatusCode::NOT_FOUND,
                StoreError::Validation { .. }
                | StoreError::ReferenceConversion { .. }
                | StoreError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
                StoreError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
                StoreError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Deserialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
