//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the JSON error body goes out.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::files::{FileError, UploadError, UploadStage};
use crate::services::quotes::QuoteError;
use crate::shopify::AdminShopifyError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// File storage or retrieval failed.
    #[error("{0}")]
    File(#[from] FileError),

    /// The upload protocol failed at a known step.
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::InvalidInput(msg) => Self::BadRequest(msg),
            QuoteError::NotFound(id) => Self::NotFound(id),
            QuoteError::Shopify(e) => Self::Shopify(e),
            QuoteError::Upload(e) => Self::Upload(e),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub is_signature_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(e) => shopify_status(e),
            Self::File(e) | Self::Upload(UploadError { source: e, .. }) => file_status(e),
        }
    }

    fn file_error(&self) -> Option<&FileError> {
        match self {
            Self::File(e) | Self::Upload(UploadError { source: e, .. }) => Some(e),
            _ => None,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Shopify(AdminShopifyError::UserError(errors)) => Some(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Self::Shopify(AdminShopifyError::GraphQL(errors)) => Some(
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => self.file_error().and_then(FileError::details),
        }
    }

    fn stage(&self) -> Option<UploadStage> {
        match self {
            Self::Upload(e) => Some(e.stage),
            _ => None,
        }
    }

    /// The response body for this error.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.to_string(),
            details: self.details(),
            is_signature_error: self.file_error().is_some_and(FileError::is_signature_error),
            stage: self.stage().map(|s| s.to_string()),
        }
    }
}

const fn shopify_status(err: &AdminShopifyError) -> StatusCode {
    match err {
        AdminShopifyError::NotFound(_) => StatusCode::NOT_FOUND,
        AdminShopifyError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn file_status(err: &FileError) -> StatusCode {
    match err {
        FileError::InvalidPayload(_) | FileError::InvalidForm(_) => StatusCode::BAD_REQUEST,
        FileError::NotFound(_) => StatusCode::NOT_FOUND,
        FileError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        FileError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        FileError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Request failed"
            );
        }

        (status, Json(self.body())).into_response()
    }
}
