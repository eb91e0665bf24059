//! Upload target acquisition.

use print_quote_core::FileBlob;
use tracing::instrument;

use super::FileError;
use crate::shopify::{AdminClient, StagedUploadTarget};

/// Request a fresh signed upload target for `blob`.
///
/// Targets are single use and are never cached: every upload calls this.
///
/// # Errors
///
/// - [`FileError::Configuration`] when credentials are missing (no request is made)
/// - [`FileError::PlatformRejected`] for user errors or an unusable target
/// - [`FileError::Transport`] when Shopify cannot be reached
#[instrument(skip(client, blob), fields(file_name = %blob.file_name(), size = blob.len()))]
pub async fn acquire_target(
    client: &AdminClient,
    blob: &FileBlob,
) -> Result<StagedUploadTarget, FileError> {
    if !client.is_configured() {
        return Err(FileError::Configuration(
            "SHOPIFY_STORE_DOMAIN and SHOPIFY_ACCESS_TOKEN must be set to upload files".to_string(),
        ));
    }

    let target = client
        .create_staged_upload(
            blob.file_name(),
            blob.mime_type(),
            u64::try_from(blob.len()).ok(),
        )
        .await?;

    if target.url.is_empty() || target.resource_url.is_empty() {
        return Err(FileError::PlatformRejected(vec![
            "staged upload target is missing url or resourceUrl".to_string(),
        ]));
    }

    tracing::debug!(
        parameters = target.parameters.len(),
        "Acquired staged upload target"
    );

    Ok(target)
}
