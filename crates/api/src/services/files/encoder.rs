//! Multipart encoding and transfer of a blob to a staged upload target.
//!
//! Signed storage policies cover the form fields in the order they were
//! issued, and most storage backends stop reading fields once they see the
//! file part. [`UploadForm`] therefore keeps the platform parameters in
//! their original order and always appends the file last.

use print_quote_core::FileBlob;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::FileError;
use crate::shopify::StagedUploadTarget;

/// Name of the multipart part carrying the file bytes.
pub const FILE_FIELD: &str = "file";

const SIGNATURE_ERROR_MARKER: &str = "SignatureDoesNotMatch";

/// An order-preserving multipart body: text fields, then one file part.
#[derive(Debug)]
pub struct UploadForm {
    fields: Vec<(String, String)>,
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl UploadForm {
    /// Build a form from the target's parameters and the blob.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::InvalidForm`] if a parameter name is empty,
    /// repeated, or collides with the file part.
    pub fn new(parameters: &[(String, String)], blob: FileBlob) -> Result<Self, FileError> {
        let mut fields: Vec<(String, String)> = Vec::with_capacity(parameters.len());

        for (name, value) in parameters {
            if name.trim().is_empty() {
                return Err(FileError::InvalidForm("empty field name".to_string()));
            }
            if name == FILE_FIELD {
                return Err(FileError::InvalidForm(format!(
                    "text field named '{FILE_FIELD}' would shadow the file part"
                )));
            }
            if fields.iter().any(|(existing, _)| existing == name) {
                return Err(FileError::InvalidForm(format!(
                    "duplicate field name '{name}'"
                )));
            }
            fields.push((name.clone(), value.clone()));
        }

        let file_name = blob.file_name().to_string();
        let mime_type = blob.mime_type().to_string();

        Ok(Self {
            fields,
            file_name,
            mime_type,
            bytes: blob.into_bytes(),
        })
    }

    /// Part names in wire order, ending with the file part.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(FILE_FIELD))
            .collect()
    }

    /// Number of file bytes.
    #[must_use]
    pub fn file_len(&self) -> usize {
        self.bytes.len()
    }

    /// Convert into a `reqwest` multipart form, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::InvalidForm`] if the MIME type is not a valid
    /// header value.
    pub fn into_multipart(self) -> Result<Form, FileError> {
        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| FileError::InvalidForm(format!("invalid content type: {e}")))?;

        Ok(form.part(FILE_FIELD, part))
    }
}

/// HTTP client for staged upload storage.
///
/// Kept separate from the Admin API client so that no Shopify credential
/// or caller header can ever reach the storage host.
#[derive(Clone, Default)]
pub struct StorageClient {
    client: reqwest::Client,
}

impl StorageClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// POST `blob` to the target as a multipart form.
    ///
    /// Any 2xx status is success and the body is ignored.
    ///
    /// # Errors
    ///
    /// - [`FileError::SignatureMismatch`] on 403 or a `SignatureDoesNotMatch` body
    /// - [`FileError::StorageRejected`] on any other non-success status
    /// - [`FileError::Transport`] if storage cannot be reached
    /// - [`FileError::InvalidForm`] if the form cannot be built
    #[instrument(skip_all, fields(url = %target.url, file_name = %blob.file_name(), size = blob.len()))]
    pub async fn upload(&self, target: &StagedUploadTarget, blob: FileBlob) -> Result<(), FileError> {
        let form = UploadForm::new(&target.parameters, blob)?;
        let field_names: Vec<String> = form.field_names().into_iter().map(String::from).collect();
        let file_len = form.file_len();
        let file_name = form.file_name.clone();

        let response = self
            .client
            .post(&target.url)
            .multipart(form.into_multipart()?)
            .send()
            .await
            .map_err(|e| FileError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Storage accepted upload");
            return Ok(());
        }

        let details = response.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::FORBIDDEN || details.contains(SIGNATURE_ERROR_MARKER) {
            tracing::error!(
                status = status.as_u16(),
                fields = ?field_names,
                file_len,
                file_name = %file_name,
                "Storage rejected upload signature"
            );
            return Err(FileError::SignatureMismatch {
                status: status.as_u16(),
                details,
            });
        }

        tracing::warn!(status = status.as_u16(), "Storage rejected upload");
        Err(FileError::StorageRejected {
            status: status.as_u16(),
            details,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn blob() -> FileBlob {
        FileBlob::new(b"solid cube".to_vec(), "cube.stl", Some("model/stl")).unwrap()
    }

    fn params(names: &[&str]) -> Vec<(String, String)> {
        names
            .iter()
            .map(|n| ((*n).to_string(), format!("{n}-value")))
            .collect()
    }

    fn target(url: String, names: &[&str]) -> StagedUploadTarget {
        StagedUploadTarget {
            url,
            resource_url: "https://storage.example.com/tmp/cube.stl".to_string(),
            parameters: params(names),
        }
    }

    #[test]
    fn test_field_order_preserved_with_file_last() {
        let form = UploadForm::new(&params(&["key", "policy", "x-goog-signature"]), blob()).unwrap();
        assert_eq!(
            form.field_names(),
            vec!["key", "policy", "x-goog-signature", "file"]
        );
        assert_eq!(form.file_len(), 10);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = UploadForm::new(&params(&["key", "key"]), blob()).unwrap_err();
        assert!(matches!(err, FileError::InvalidForm(_)));
    }

    #[test]
    fn test_rejects_field_named_file() {
        let err = UploadForm::new(&params(&["key", "file"]), blob()).unwrap_err();
        assert!(matches!(err, FileError::InvalidForm(_)));
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = UploadForm::new(&params(&[""]), blob()).unwrap_err();
        assert!(matches!(err, FileError::InvalidForm(_)));
    }

    #[test]
    fn test_empty_parameter_list_is_valid() {
        let form = UploadForm::new(&[], blob()).unwrap();
        assert_eq!(form.field_names(), vec!["file"]);
    }

    #[tokio::test]
    async fn test_upload_sends_ordered_form_without_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .match_header("x-shopify-access-token", Matcher::Missing)
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex(
                r#"(?s)name="key".*name="policy".*name="file"; filename="cube.stl".*solid cube"#
                    .to_string(),
            ))
            .with_status(204)
            .create_async()
            .await;

        let client = StorageClient::new();
        client
            .upload(&target(format!("{}/upload", server.url()), &["key", "policy"]), blob())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_forbidden_is_signature_mismatch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(403)
            .with_body("<Error><Code>AccessDenied</Code></Error>")
            .create_async()
            .await;

        let err = StorageClient::new()
            .upload(&target(format!("{}/upload", server.url()), &["key"]), blob())
            .await
            .unwrap_err();
        assert!(err.is_signature_error());
    }

    #[tokio::test]
    async fn test_signature_marker_in_body_is_signature_mismatch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(400)
            .with_body("<Error><Code>SignatureDoesNotMatch</Code></Error>")
            .create_async()
            .await;

        let err = StorageClient::new()
            .upload(&target(format!("{}/upload", server.url()), &["key"]), blob())
            .await
            .unwrap_err();
        match err {
            FileError::SignatureMismatch { status, details } => {
                assert_eq!(status, 400);
                assert!(details.contains("SignatureDoesNotMatch"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_other_failure_is_storage_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = StorageClient::new()
            .upload(&target(format!("{}/upload", server.url()), &["key"]), blob())
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::StorageRejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_storage_is_transport_error() {
        let err = StorageClient::new()
            .upload(&target("http://127.0.0.1:9/upload".to_string(), &[]), blob())
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Transport(_)));
    }
}
