//! Uploaded file payloads.
//!
//! Browsers send model files as Base64 strings, either bare or wrapped in a
//! `data:<mime>;base64,<payload>` URL. [`FileBlob`] is the decoded, immutable
//! form: raw bytes plus the declared name and MIME type.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE};

/// MIME type used when neither the caller nor the data URL declares one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Errors that can occur when decoding an uploaded payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// No file name was supplied.
    #[error("file name cannot be empty")]
    EmptyFileName,
    /// The payload contained no data after stripping the data-URL header.
    #[error("file data cannot be empty")]
    EmptyPayload,
    /// The payload is not valid Base64.
    #[error("file data is not valid base64: {0}")]
    InvalidBase64(String),
}

/// Raw file bytes with the metadata declared by the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl FileBlob {
    /// Build a blob from already decoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::EmptyFileName`] when `file_name` is blank.
    pub fn new(
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: Option<&str>,
    ) -> Result<Self, BlobError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(BlobError::EmptyFileName);
        }

        Ok(Self {
            bytes,
            mime_type: non_blank(mime_type).unwrap_or(DEFAULT_MIME_TYPE).to_owned(),
            file_name: file_name.to_owned(),
        })
    }

    /// Decode a Base64 string or data URL into a blob.
    ///
    /// An explicit `declared_type` wins over the MIME type embedded in a
    /// data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is blank, the payload is empty, or
    /// the payload is not Base64.
    pub fn from_payload(
        file_data: &str,
        file_name: &str,
        declared_type: Option<&str>,
    ) -> Result<Self, BlobError> {
        let (embedded_type, payload) = split_data_url(file_data);
        let bytes = decode_base64(payload)?;
        Self::new(bytes, file_name, non_blank(declared_type).or(embedded_type))
    }

    /// The decoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the blob and returns the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of decoded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Declared file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Decode Base64 the way browsers and older clients produce it.
///
/// Whitespace is ignored, missing padding is tolerated and the URL-safe
/// alphabet is accepted as a fallback. A `data:` header, if present, is
/// stripped first.
///
/// # Errors
///
/// Returns an error if the payload is empty or cannot be decoded.
pub fn decode_base64(raw: &str) -> Result<Vec<u8>, BlobError> {
    let (_, payload) = split_data_url(raw);
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(BlobError::EmptyPayload);
    }

    STANDARD
        .decode(&cleaned)
        .or_else(|_| STANDARD_NO_PAD.decode(&cleaned))
        .or_else(|_| URL_SAFE.decode(&cleaned))
        .map_err(|e| BlobError::InvalidBase64(e.to_string()))
}

/// Split a data URL into its MIME type and payload.
///
/// Anything before the first comma is treated as a header, matching what
/// the storefront widget sends; input without a comma is all payload.
fn split_data_url(raw: &str) -> (Option<&str>, &str) {
    let Some((header, payload)) = raw.split_once(',') else {
        return (None, raw);
    };

    let mime = header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|m| !m.trim().is_empty());

    (mime, payload)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_base64() {
        let blob = FileBlob::from_payload("aGVsbG8=", "hello.txt", None).unwrap();
        assert_eq!(blob.bytes(), b"hello");
        assert_eq!(blob.len(), 5);
        assert_eq!(blob.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(blob.file_name(), "hello.txt");
    }

    #[test]
    fn test_data_url_supplies_mime() {
        let blob =
            FileBlob::from_payload("data:model/stl;base64,U1RMIQ==", "part.stl", None).unwrap();
        assert_eq!(blob.bytes(), b"STL!");
        assert_eq!(blob.mime_type(), "model/stl");
    }

    #[test]
    fn test_declared_type_wins() {
        let blob = FileBlob::from_payload(
            "data:application/octet-stream;base64,U1RMIQ==",
            "part.step",
            Some("application/step"),
        )
        .unwrap();
        assert_eq!(blob.mime_type(), "application/step");
    }

    #[test]
    fn test_blank_declared_type_falls_back() {
        let blob = FileBlob::from_payload("U1RMIQ==", "part.stl", Some("  ")).unwrap();
        assert_eq!(blob.mime_type(), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_missing_padding_and_whitespace() {
        let blob = FileBlob::from_payload("aGVs\nbG8", "hello.txt", None).unwrap();
        assert_eq!(blob.bytes(), b"hello");
    }

    #[test]
    fn test_empty_file_name() {
        assert_eq!(
            FileBlob::from_payload("aGVsbG8=", "  ", None),
            Err(BlobError::EmptyFileName)
        );
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            FileBlob::from_payload("data:text/plain;base64,", "a.txt", None),
            Err(BlobError::EmptyPayload)
        );
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            FileBlob::from_payload("not base64 at all!!", "a.txt", None),
            Err(BlobError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_decode_base64_strips_header() {
        assert_eq!(
            decode_base64("data:text/plain;base64,aGk=").unwrap(),
            b"hi".to_vec()
        );
    }
}
