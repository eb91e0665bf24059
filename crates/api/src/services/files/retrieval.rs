//! Retrieval facade: resolve a file id to a redirect or a byte stream.
//!
//! Lookup order:
//!
//! 1. Shopify file id, when the caller supplies one. A miss here is final.
//! 2. The memory store, by application file id.
//! 3. Legacy metaobject storage, by application file id, GID or handle.

use print_quote_core::FileBlob;
use serde::Deserialize;
use tracing::instrument;

use super::{FileError, FileService};

/// Name used when neither the caller nor the record supplies one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "download.bin";

/// What the caller asked for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    /// Application file id (or legacy metaobject id/handle).
    pub id: Option<String>,
    /// Shopify file GID.
    #[serde(alias = "shopifyFileId")]
    pub platform_file_id: Option<String>,
    /// Preferred download name.
    pub file_name: Option<String>,
}

impl DownloadRequest {
    /// The identifier reported back in not-found responses.
    #[must_use]
    pub fn lookup_key(&self) -> Option<&str> {
        non_blank(self.platform_file_id.as_deref()).or_else(|| non_blank(self.id.as_deref()))
    }
}

/// How a resolved file is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// Send the client to a CDN URL.
    Redirect { url: String },
    /// Stream bytes as an attachment.
    Content {
        bytes: Vec<u8>,
        mime_type: String,
        file_name: String,
    },
}

impl FileService {
    /// Resolve a download request.
    ///
    /// Never modifies any store.
    ///
    /// # Errors
    ///
    /// - [`FileError::InvalidPayload`] when no identifier is given
    /// - [`FileError::NotFound`] when no backend knows the file
    /// - [`FileError::Unavailable`] when the legacy store cannot be queried
    #[instrument(skip(self), fields(id = ?request.id, platform_file_id = ?request.platform_file_id))]
    pub async fn retrieve(&self, request: &DownloadRequest) -> Result<Download, FileError> {
        if let Some(platform_file_id) = non_blank(request.platform_file_id.as_deref()) {
            return self.retrieve_from_shopify(platform_file_id).await;
        }

        let id = non_blank(request.id.as_deref())
            .ok_or_else(|| FileError::InvalidPayload("id or platformFileId is required".to_string()))?;

        if let Some(stored) = self.store().get(id) {
            tracing::debug!(file_id = %id, "Serving file from memory store");
            return Ok(Download::Content {
                bytes: stored.blob.bytes().to_vec(),
                mime_type: stored.blob.mime_type().to_string(),
                file_name: attachment_name(
                    request.file_name.as_deref(),
                    Some(stored.blob.file_name()),
                ),
            });
        }

        self.retrieve_from_legacy(id, request.file_name.as_deref())
            .await
    }

    async fn retrieve_from_shopify(&self, platform_file_id: &str) -> Result<Download, FileError> {
        let file = self
            .shopify()
            .get_file(platform_file_id)
            .await?
            .ok_or_else(|| FileError::NotFound(platform_file_id.to_string()))?;

        match file.url {
            Some(url) => Ok(Download::Redirect { url }),
            None => {
                tracing::info!(
                    platform_file_id,
                    status = file.status.as_str(),
                    "Shopify file has no URL yet"
                );
                Err(FileError::NotFound(platform_file_id.to_string()))
            }
        }
    }

    async fn retrieve_from_legacy(
        &self,
        id: &str,
        requested_name: Option<&str>,
    ) -> Result<Download, FileError> {
        if !self.shopify().is_configured() {
            return Err(FileError::NotFound(id.to_string()));
        }

        let record = self
            .shopify()
            .find_legacy_file(id)
            .await
            .map_err(|e| FileError::Unavailable(e.to_string()))?
            .ok_or_else(|| FileError::NotFound(id.to_string()))?;

        if let Some(url) = record.file_url() {
            return Ok(Download::Redirect {
                url: url.to_string(),
            });
        }

        let file_name = attachment_name(requested_name, record.file_name());
        let data = record
            .file_data()
            .ok_or_else(|| FileError::NotFound(id.to_string()))?;

        let blob = FileBlob::from_payload(data, &file_name, record.file_type()).map_err(|e| {
            tracing::warn!(file_id = %id, error = %e, "Legacy file record holds undecodable data");
            FileError::NotFound(id.to_string())
        })?;

        Ok(Download::Content {
            mime_type: blob.mime_type().to_string(),
            file_name,
            bytes: blob.into_bytes(),
        })
    }
}

/// Pick a safe `Content-Disposition` file name.
///
/// The first candidate that is non-empty after removing quotes,
/// backslashes and control characters wins.
#[must_use]
pub fn attachment_name(requested: Option<&str>, stored: Option<&str>) -> String {
    [requested, stored]
        .into_iter()
        .flatten()
        .map(|name| {
            name.chars()
                .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
                .collect::<String>()
                .trim()
                .to_string()
        })
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;
    use print_quote_core::{FileId, StorageKind};
    use secrecy::SecretString;

    use super::*;
    use crate::config::ShopifyConfig;
    use crate::services::files::{BlobStore, MemoryBlobStore, StorageClient, StoredFile};
    use crate::shopify::AdminClient;
    use crate::shopify::admin_test_support::{GRAPHQL_PATH, client_for, operation};

    const MEMORY_ID: &str = "file_1700000000000_abcdefghi";

    fn store_with_file() -> Arc<dyn BlobStore> {
        let store = MemoryBlobStore::new(Duration::from_secs(60), 1024 * 1024);
        store.put(StoredFile {
            file_id: FileId::parse(MEMORY_ID).unwrap(),
            blob: FileBlob::new(b"memory bytes".to_vec(), "bracket.stl", Some("model/stl"))
                .unwrap(),
            draft_order_id: None,
            stored_at: Utc::now(),
        })
        .unwrap();
        Arc::new(store)
    }

    fn service(client: AdminClient) -> FileService {
        FileService::new(client, StorageClient::new(), store_with_file(), StorageKind::Memory)
    }

    fn unconfigured() -> AdminClient {
        AdminClient::new(&ShopifyConfig {
            store: None,
            access_token: None::<SecretString>,
            api_version: "2024-01".to_string(),
            admin_base_url: None,
        })
    }

    fn request(id: Option<&str>, platform: Option<&str>) -> DownloadRequest {
        DownloadRequest {
            id: id.map(String::from),
            platform_file_id: platform.map(String::from),
            file_name: None,
        }
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(attachment_name(Some("a\"b\n.stl"), None), "ab.stl");
        assert_eq!(attachment_name(Some("  "), Some("stored.stl")), "stored.stl");
        assert_eq!(attachment_name(None, None), DEFAULT_DOWNLOAD_NAME);
        assert_eq!(attachment_name(Some("\"\""), None), DEFAULT_DOWNLOAD_NAME);
    }

    #[test]
    fn test_request_accepts_shopify_alias() {
        let req: DownloadRequest =
            serde_json::from_str(r#"{"shopifyFileId":"gid://shopify/GenericFile/1"}"#).unwrap();
        assert_eq!(req.lookup_key(), Some("gid://shopify/GenericFile/1"));
    }

    #[tokio::test]
    async fn test_memory_hit_streams_bytes() {
        let download = service(unconfigured())
            .retrieve(&request(Some(MEMORY_ID), None))
            .await
            .unwrap();

        assert_eq!(
            download,
            Download::Content {
                bytes: b"memory bytes".to_vec(),
                mime_type: "model/stl".to_string(),
                file_name: "bracket.stl".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let err = service(unconfigured())
            .retrieve(&request(None, Some("  ")))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_memory_miss_is_not_found() {
        let err = service(unconfigured())
            .retrieve(&request(Some("file_2_zzzzzzzzz"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::NotFound(id) if id == "file_2_zzzzzzzzz"));
    }

    #[tokio::test]
    async fn test_platform_id_redirects() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("GetFile"))
            .with_status(200)
            .with_body(
                r#"{"data":{"node":{"__typename":"GenericFile","id":"gid://shopify/GenericFile/1",
                    "fileStatus":"READY","alt":"a.stl","url":"https://cdn.shopify.com/a.stl","originalFileSize":1}}}"#,
            )
            .create_async()
            .await;

        let download = service(client_for(&server.url()))
            .retrieve(&request(None, Some("gid://shopify/GenericFile/1")))
            .await
            .unwrap();
        assert_eq!(
            download,
            Download::Redirect {
                url: "https://cdn.shopify.com/a.stl".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_platform_hit_wins_over_memory() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("GetFile"))
            .with_status(200)
            .with_body(
                r#"{"data":{"node":{"__typename":"GenericFile","id":"gid://shopify/GenericFile/1",
                    "fileStatus":"READY","alt":"a.stl","url":"https://cdn.shopify.com/a.stl","originalFileSize":1}}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let download = service(client_for(&server.url()))
            .retrieve(&request(Some(MEMORY_ID), Some("gid://shopify/GenericFile/1")))
            .await
            .unwrap();

        lookup.assert_async().await;
        assert_eq!(
            download,
            Download::Redirect {
                url: "https://cdn.shopify.com/a.stl".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_repeated_retrieval_returns_same_bytes() {
        let service = service(unconfigured());
        let request = request(Some(MEMORY_ID), None);

        let first = service.retrieve(&request).await.unwrap();
        let second = service.retrieve(&request).await.unwrap();

        assert_eq!(first, second);
        assert!(matches!(
            second,
            Download::Content { ref bytes, .. } if bytes.as_slice() == b"memory bytes"
        ));
    }

    #[tokio::test]
    async fn test_platform_miss_does_not_fall_back_to_memory() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("GetFile"))
            .with_status(200)
            .with_body(r#"{"data":{"node":null}}"#)
            .create_async()
            .await;

        let err = service(client_for(&server.url()))
            .retrieve(&request(Some(MEMORY_ID), Some("gid://shopify/GenericFile/404")))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_memory_hit_skips_legacy_lookup() {
        let mut server = mockito::Server::new_async().await;
        let legacy = server
            .mock("POST", GRAPHQL_PATH)
            .expect(0)
            .create_async()
            .await;

        service(client_for(&server.url()))
            .retrieve(&request(Some(MEMORY_ID), None))
            .await
            .unwrap();
        legacy.assert_async().await;
    }

    #[tokio::test]
    async fn test_legacy_record_with_inline_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("GetMetaobjects"))
            .with_status(200)
            .with_body(
                r#"{"data":{"metaobjects":{"nodes":[{"id":"gid://shopify/Metaobject/3","handle":"legacy",
                    "fields":[{"key":"file_id","value":"file_5_legacyabc"},
                              {"key":"file_name","value":"old.stl"},
                              {"key":"file_data","value":"data:model/stl;base64,aGVsbG8="}]}]}}}"#,
            )
            .create_async()
            .await;

        let download = service(client_for(&server.url()))
            .retrieve(&request(Some("file_5_legacyabc"), None))
            .await
            .unwrap();
        assert_eq!(
            download,
            Download::Content {
                bytes: b"hello".to_vec(),
                mime_type: "model/stl".to_string(),
                file_name: "old.stl".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_legacy_failure_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .with_status(502)
            .create_async()
            .await;

        let err = service(client_for(&server.url()))
            .retrieve(&request(Some("file_2_zzzzzzzzz"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Unavailable(_)));
    }
}
