//! Local reconciliation store for memory-strategy uploads.
//!
//! Handlers receive the store as `Arc<dyn BlobStore>` through `AppState`,
//! so tests can swap in their own implementation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use print_quote_core::{FileBlob, FileId};

use super::FileError;

/// A file kept in process memory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_id: FileId,
    pub blob: FileBlob,
    /// Draft order the file was uploaded for, if any.
    pub draft_order_id: Option<String>,
    pub stored_at: DateTime<Utc>,
}

/// Storage for uploaded blobs keyed by application file id.
///
/// Implementations must be safe to share across request tasks.
pub trait BlobStore: Send + Sync {
    /// Insert or replace a file.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::TooLarge`] if the file can never fit in the store.
    fn put(&self, file: StoredFile) -> Result<(), FileError>;

    /// Fetch a file without modifying the store.
    fn get(&self, file_id: &str) -> Option<Arc<StoredFile>>;

    /// Remove a file, returning whether it was present.
    fn remove(&self, file_id: &str) -> bool;

    /// Approximate number of stored files.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`BlobStore`] with a time-to-live and a byte budget.
#[derive(Clone)]
pub struct MemoryBlobStore {
    cache: Cache<String, Arc<StoredFile>>,
    max_bytes: u64,
}

fn weight(key: &str, file: &StoredFile) -> u32 {
    u32::try_from(key.len() + file.blob.len()).unwrap_or(u32::MAX)
}

impl MemoryBlobStore {
    /// Create a store that keeps files for `ttl` and at most `max_bytes` in total.
    ///
    /// When the budget is exhausted the least recently used files are
    /// evicted; a new file is always admitted.
    #[must_use]
    pub fn new(ttl: Duration, max_bytes: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_bytes)
            .eviction_policy(EvictionPolicy::lru())
            .weigher(|key: &String, file: &Arc<StoredFile>| weight(key, file))
            .time_to_live(ttl)
            .build();

        Self { cache, max_bytes }
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, file: StoredFile) -> Result<(), FileError> {
        let key = file.file_id.as_str().to_string();
        let size = u64::from(weight(&key, &file));
        if size > self.max_bytes {
            return Err(FileError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        self.cache.insert(key, Arc::new(file));
        Ok(())
    }

    fn get(&self, file_id: &str) -> Option<Arc<StoredFile>> {
        self.cache.get(file_id)
    }

    fn remove(&self, file_id: &str) -> bool {
        self.cache.remove(file_id).is_some()
    }

    fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stored(id: &str, bytes: &[u8]) -> StoredFile {
        StoredFile {
            file_id: FileId::parse(id).unwrap(),
            blob: FileBlob::new(bytes.to_vec(), "part.stl", None).unwrap(),
            draft_order_id: None,
            stored_at: Utc::now(),
        }
    }

    fn store() -> MemoryBlobStore {
        MemoryBlobStore::new(Duration::from_secs(60), 1024 * 1024)
    }

    #[test]
    fn test_put_then_get() {
        let store = store();
        store.put(stored("file_1_aaaaaaaaa", b"abc")).unwrap();

        let file = store.get("file_1_aaaaaaaaa").unwrap();
        assert_eq!(file.blob.bytes(), b"abc");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_does_not_mutate() {
        let store = store();
        store.put(stored("file_1_aaaaaaaaa", b"abc")).unwrap();

        let first = store.get("file_1_aaaaaaaaa").unwrap();
        let second = store.get("file_1_aaaaaaaaa").unwrap();
        assert_eq!(first.blob, second.blob);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_id() {
        assert!(store().get("file_9_zzzzzzzzz").is_none());
    }

    #[test]
    fn test_remove() {
        let store = store();
        store.put(stored("file_1_aaaaaaaaa", b"abc")).unwrap();

        assert!(store.remove("file_1_aaaaaaaaa"));
        assert!(!store.remove("file_1_aaaaaaaaa"));
        assert!(store.get("file_1_aaaaaaaaa").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_entries_are_gone() {
        let store = MemoryBlobStore::new(Duration::from_millis(20), 1024);
        store.put(stored("file_1_aaaaaaaaa", b"abc")).unwrap();
        std::thread::sleep(Duration::from_millis(60));
        assert!(store.get("file_1_aaaaaaaaa").is_none());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let store: Arc<dyn BlobStore> = Arc::new(store());
        store.put(stored("file_1_aaaaaaaaa", b"abc")).unwrap();
        assert!(store.get("file_1_aaaaaaaaa").is_some());
    }

    #[test]
    fn test_new_file_admitted_when_full() {
        // Each entry weighs 16 (key) + 40 (bytes); two fit, three do not.
        let store = MemoryBlobStore::new(Duration::from_secs(60), 150);
        store.put(stored("file_1_aaaaaaaaa", &[1; 40])).unwrap();
        store.put(stored("file_2_aaaaaaaaa", &[2; 40])).unwrap();
        for _ in 0..3 {
            assert!(store.get("file_1_aaaaaaaaa").is_some());
            assert!(store.get("file_2_aaaaaaaaa").is_some());
        }
        store.cache.run_pending_tasks();

        store.put(stored("file_3_aaaaaaaaa", &[3; 40])).unwrap();
        store.cache.run_pending_tasks();

        let newest = store.get("file_3_aaaaaaaaa").unwrap();
        assert_eq!(newest.blob.bytes(), &[3; 40]);
        assert!(store.get("file_1_aaaaaaaaa").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_oversized_file_rejected() {
        let store = MemoryBlobStore::new(Duration::from_secs(60), 100);

        let err = store.put(stored("file_1_aaaaaaaaa", &[0; 200])).unwrap_err();
        assert!(matches!(err, FileError::TooLarge { size: 216, limit: 100 }));
        assert!(store.get("file_1_aaaaaaaaa").is_none());
    }
}
