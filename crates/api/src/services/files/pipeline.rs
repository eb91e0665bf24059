//! Upload pipeline: acquire, transfer, register, reconcile.

use std::sync::Arc;

use chrono::Utc;
use print_quote_core::{FileBlob, FileId, StorageKind};
use tracing::instrument;

use super::acquirer::acquire_target;
use super::encoder::StorageClient;
use super::registrar::register_file;
use super::store::{BlobStore, StoredFile};
use super::{FileError, UploadError, UploadStage};
use crate::shopify::{AdminClient, FileRecord};

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Application file id generated for this upload.
    pub file_id: FileId,
    pub file_name: String,
    pub storage: StorageKind,
    /// Shopify file, for the platform strategy.
    pub platform_file: Option<FileRecord>,
    /// Bytes received from the caller.
    pub uploaded_size: usize,
    pub draft_order_id: Option<String>,
}

impl UploadOutcome {
    /// Whether Shopify reported the same size that was uploaded.
    ///
    /// Always true for memory uploads.
    #[must_use]
    pub fn size_match(&self) -> bool {
        self.platform_file.as_ref().is_none_or(|file| {
            file.original_file_size
                .is_some_and(|size| u64::try_from(self.uploaded_size).is_ok_and(|u| u == size))
        })
    }
}

/// Stores uploads with Shopify Files or in memory, and reads them back.
#[derive(Clone)]
pub struct FileService {
    shopify: AdminClient,
    storage: StorageClient,
    store: Arc<dyn BlobStore>,
    default_storage: StorageKind,
}

impl FileService {
    /// Create a new file service.
    ///
    /// # Arguments
    ///
    /// * `shopify` - Admin API client used for staged uploads and lookups
    /// * `storage` - HTTP client for staged upload storage
    /// * `store` - Memory store for memory-strategy uploads
    /// * `default_storage` - Strategy used by [`Self::upload_default`]
    #[must_use]
    pub fn new(
        shopify: AdminClient,
        storage: StorageClient,
        store: Arc<dyn BlobStore>,
        default_storage: StorageKind,
    ) -> Self {
        Self {
            shopify,
            storage,
            store,
            default_storage,
        }
    }

    #[must_use]
    pub const fn default_storage(&self) -> StorageKind {
        self.default_storage
    }

    pub(super) const fn shopify(&self) -> &AdminClient {
        &self.shopify
    }

    pub(super) fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    /// Upload with the configured default strategy.
    ///
    /// # Errors
    ///
    /// See [`Self::upload`].
    pub async fn upload_default(
        &self,
        blob: FileBlob,
        draft_order_id: Option<String>,
    ) -> Result<UploadOutcome, UploadError> {
        self.upload(blob, self.default_storage, draft_order_id).await
    }

    /// Upload a blob with the given strategy.
    ///
    /// The platform strategy runs the three protocol steps strictly in
    /// sequence; no step is retried. A failure after the target was
    /// acquired leaves the staged upload to expire on Shopify's side.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] naming the step that failed.
    #[instrument(skip(self, blob), fields(file_name = %blob.file_name(), size = blob.len(), storage = storage.as_str()))]
    pub async fn upload(
        &self,
        blob: FileBlob,
        storage: StorageKind,
        draft_order_id: Option<String>,
    ) -> Result<UploadOutcome, UploadError> {
        let file_id = FileId::generate();

        let outcome = match storage {
            StorageKind::Shopify => self.upload_to_shopify(file_id, blob, draft_order_id).await?,
            StorageKind::Memory => self
                .store_in_memory(file_id, blob, draft_order_id)
                .map_err(UploadError::at(UploadStage::Store))?,
        };

        tracing::info!(
            file_id = %outcome.file_id,
            platform_file_id = outcome.platform_file.as_ref().map(|f| f.id.as_str()),
            "File uploaded"
        );

        Ok(outcome)
    }

    async fn upload_to_shopify(
        &self,
        file_id: FileId,
        blob: FileBlob,
        draft_order_id: Option<String>,
    ) -> Result<UploadOutcome, UploadError> {
        let file_name = blob.file_name().to_string();
        let uploaded_size = blob.len();

        let target = acquire_target(&self.shopify, &blob)
            .await
            .map_err(UploadError::at(UploadStage::Acquire))?;

        self.storage
            .upload(&target, blob)
            .await
            .map_err(UploadError::at(UploadStage::Transfer))?;

        let record = register_file(&self.shopify, &target, &file_name, uploaded_size)
            .await
            .map_err(UploadError::at(UploadStage::Register))?;

        Ok(UploadOutcome {
            file_id,
            file_name,
            storage: StorageKind::Shopify,
            platform_file: Some(record),
            uploaded_size,
            draft_order_id,
        })
    }

    fn store_in_memory(
        &self,
        file_id: FileId,
        blob: FileBlob,
        draft_order_id: Option<String>,
    ) -> Result<UploadOutcome, FileError> {
        let outcome = UploadOutcome {
            file_id: file_id.clone(),
            file_name: blob.file_name().to_string(),
            storage: StorageKind::Memory,
            platform_file: None,
            uploaded_size: blob.len(),
            draft_order_id: draft_order_id.clone(),
        };

        self.store.put(StoredFile {
            file_id,
            blob,
            draft_order_id,
            stored_at: Utc::now(),
        })?;

        Ok(outcome)
    }

    /// Undo an upload whose owning operation failed afterwards.
    ///
    /// Best effort: a failed deletion is logged and otherwise ignored.
    #[instrument(skip(self, outcome), fields(file_id = %outcome.file_id))]
    pub async fn discard(&self, outcome: &UploadOutcome) {
        match (&outcome.storage, &outcome.platform_file) {
            (StorageKind::Shopify, Some(file)) => {
                if let Err(e) = self.shopify.delete_files(vec![file.id.clone()]).await {
                    tracing::warn!(
                        platform_file_id = %file.id,
                        error = %e,
                        "Failed to delete orphaned Shopify file"
                    );
                }
            }
            (StorageKind::Memory, _) => {
                self.store.remove(outcome.file_id.as_str());
            }
            (StorageKind::Shopify, None) => {}
        }
    }
}
