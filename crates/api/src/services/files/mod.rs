//! File storage for uploaded models.
//!
//! # Upload protocol (Shopify strategy)
//!
//! 1. [`acquirer`] - request a staged upload target
//! 2. [`encoder`] - POST the signed multipart form to storage
//! 3. [`registrar`] - register the stored blob as a Shopify file
//!
//! The memory strategy skips all three and keeps the bytes in a
//! [`BlobStore`]. [`FileService`] ties both strategies together and also
//! serves downloads (see [`retrieval`]).

pub mod acquirer;
pub mod encoder;
mod error;
mod pipeline;
pub mod registrar;
pub mod retrieval;
mod store;

pub use encoder::{FILE_FIELD, StorageClient, UploadForm};
pub use error::{FileError, UploadError, UploadStage};
pub use pipeline::{FileService, UploadOutcome};
pub use retrieval::{DEFAULT_DOWNLOAD_NAME, Download, DownloadRequest, attachment_name};
pub use store::{BlobStore, MemoryBlobStore, StoredFile};
