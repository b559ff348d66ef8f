use crate::downloads::{FilenameError, ManifestError, ResolveError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the download routes, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid filename")]
    InvalidFilename(#[source] FilenameError),

    #[error("File not found")]
    NotFound,

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to read file")]
    Io(#[from] std::io::Error),

    #[error("Failed to build response")]
    Http(#[from] axum::http::Error),
}

impl From<FilenameError> for ApiError {
    fn from(err: FilenameError) -> Self {
        ApiError::InvalidFilename(err)
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => ApiError::NotFound,
            ResolveError::Io(err) => ApiError::Io(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Manifest(_) | ApiError::Io(_) | ApiError::Http(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Io(err) => error!("Download IO failure: {}", err),
            ApiError::Http(err) => error!("Could not build download response: {}", err),
            ApiError::Manifest(err) => error!("Could not load manifest: {}", err),
            _ => {}
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
