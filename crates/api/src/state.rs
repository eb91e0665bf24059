//! Application state shared across handlers.

use std::sync::Arc;

use print_quote_core::StorageKind;

use crate::config::AppConfig;
use crate::services::{BlobStore, FileService, MemoryBlobStore, QuoteService, StorageClient};
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    shopify: AdminClient,
    files: FileService,
    quotes: QuoteService,
}

impl AppState {
    /// Create application state with an in-memory blob store sized from config.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let store = MemoryBlobStore::new(config.files.memory_ttl, config.files.memory_max_bytes);
        Self::with_store(config, Arc::new(store))
    }

    /// Create application state around an existing blob store.
    #[must_use]
    pub fn with_store(config: AppConfig, store: Arc<dyn BlobStore>) -> Self {
        let shopify = AdminClient::new(&config.shopify);

        let default_storage = if config.files.skip_shopify_files {
            StorageKind::Memory
        } else {
            StorageKind::Shopify
        };

        let files = FileService::new(shopify.clone(), StorageClient::new(), store, default_storage);
        let quotes = QuoteService::new(shopify.clone(), files.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                files,
                quotes,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    #[must_use]
    pub fn files(&self) -> &FileService {
        &self.inner.files
    }

    #[must_use]
    pub fn quotes(&self) -> &QuoteService {
        &self.inner.quotes
    }
}
