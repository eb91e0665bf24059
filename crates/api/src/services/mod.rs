//! Business logic services.
//!
//! # Services
//!
//! - `files` - Staged uploads to Shopify Files, the memory store and downloads
//! - `quotes` - Quote workflow on Shopify draft orders

pub mod files;
pub mod quotes;

pub use files::{
    BlobStore, Download, DownloadRequest, FileError, FileService, MemoryBlobStore, StorageClient,
    UploadError, UploadOutcome,
};
pub use quotes::{AttachedFile, QuoteError, QuoteList, QuoteService, QuoteSubmission};
