//! Core types for the quote backend.
//!
//! This module provides type-safe wrappers for the concepts that travel
//! between the HTTP surface, the Shopify client and the upload pipeline.

pub mod amount;
pub mod blob;
pub mod email;
pub mod file_id;
pub mod quote;
pub mod storage;

pub use amount::{AmountError, QuoteAmount};
pub use blob::{BlobError, DEFAULT_MIME_TYPE, FileBlob, decode_base64};
pub use email::{Email, EmailError};
pub use file_id::{FileId, FileIdError};
pub use quote::{
    AttributeKey, CustomAttribute, QuoteAttributes, QuoteStatus, QuoteUpdate, generate_quote_id,
};
pub use storage::StorageKind;
