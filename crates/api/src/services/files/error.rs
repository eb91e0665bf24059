//! Error taxonomy for file storage and retrieval.

use std::fmt;

use print_quote_core::BlobError;
use thiserror::Error;

use crate::shopify::AdminShopifyError;

/// Errors raised by the upload protocol and the retrieval facade.
#[derive(Debug, Error)]
pub enum FileError {
    /// Shopify credentials are missing; nothing was sent.
    #[error("Shopify is not configured: {0}")]
    Configuration(String),

    /// Shopify answered with user errors or GraphQL errors.
    #[error("Shopify rejected the request: {}", .0.join("; "))]
    PlatformRejected(Vec<String>),

    /// Storage refused the signed form (HTTP 403 or `SignatureDoesNotMatch`).
    #[error("Upload signature rejected by storage (HTTP {status})")]
    SignatureMismatch {
        /// HTTP status returned by storage.
        status: u16,
        /// Response body from storage.
        details: String,
    },

    /// Storage answered with another non-success status.
    #[error("Storage rejected the upload (HTTP {status})")]
    StorageRejected {
        /// HTTP status returned by storage.
        status: u16,
        /// Response body from storage.
        details: String,
    },

    /// No backend knows the requested file.
    #[error("File not found: {0}")]
    NotFound(String),

    /// A backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The legacy file store could not be queried.
    #[error("File service unavailable: {0}")]
    Unavailable(String),

    /// The uploaded payload could not be decoded.
    #[error("Invalid file payload: {0}")]
    InvalidPayload(String),

    /// The multipart form could not be built.
    #[error("Invalid upload form: {0}")]
    InvalidForm(String),

    /// The file does not fit in the memory store at all.
    #[error("File of {size} bytes exceeds the memory store capacity of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// Shopify throttled the request.
    #[error("Rate limited by Shopify, retry after {0} seconds")]
    RateLimited(u64),
}

impl FileError {
    /// Whether this is a storage signature failure.
    #[must_use]
    pub const fn is_signature_error(&self) -> bool {
        matches!(self, Self::SignatureMismatch { .. })
    }

    /// Extra detail for API clients, beyond the display message.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::PlatformRejected(messages) => Some(messages.join("; ")),
            Self::SignatureMismatch { details, .. } | Self::StorageRejected { details, .. } => {
                Some(details.clone()).filter(|d| !d.is_empty())
            }
            _ => None,
        }
    }
}

impl From<AdminShopifyError> for FileError {
    fn from(err: AdminShopifyError) -> Self {
        match err {
            AdminShopifyError::NotConfigured => {
                Self::Configuration(AdminShopifyError::NotConfigured.to_string())
            }
            AdminShopifyError::Http(e) => Self::Transport(e.to_string()),
            AdminShopifyError::UserError(errors) => {
                Self::PlatformRejected(errors.iter().map(ToString::to_string).collect())
            }
            AdminShopifyError::GraphQL(errors) => {
                Self::PlatformRejected(errors.into_iter().map(|e| e.message).collect())
            }
            AdminShopifyError::NotFound(id) => Self::NotFound(id),
            AdminShopifyError::RateLimited(secs) => Self::RateLimited(secs),
            err @ AdminShopifyError::Status { status, .. } if status >= 500 => {
                Self::Transport(err.to_string())
            }
            other => Self::PlatformRejected(vec![other.to_string()]),
        }
    }
}

impl From<BlobError> for FileError {
    fn from(err: BlobError) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Step of the upload protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    /// Requesting a staged upload target.
    Acquire,
    /// Posting the multipart form to storage.
    Transfer,
    /// Registering the uploaded blob as a file.
    Register,
    /// Keeping the blob in the memory store.
    Store,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Acquire => "acquire",
            Self::Transfer => "transfer",
            Self::Register => "register",
            Self::Store => "store",
        })
    }
}

/// An upload failure together with the step that failed.
#[derive(Debug, Error)]
#[error("upload failed at {stage} step: {source}")]
pub struct UploadError {
    pub stage: UploadStage,
    #[source]
    pub source: FileError,
}

impl UploadError {
    pub(crate) fn at(stage: UploadStage) -> impl FnOnce(FileError) -> Self {
        move |source| Self { stage, source }
    }
}

impl From<UploadError> for FileError {
    fn from(err: UploadError) -> Self {
        err.source
    }
}
