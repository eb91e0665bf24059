//! Registration of uploaded blobs as permanent Shopify files.

use tracing::instrument;

use super::FileError;
use crate::shopify::{AdminClient, FileRecord, StagedUploadTarget};

/// Register the blob behind `target` as a file named `display_name`.
///
/// A size mismatch between what was sent and what Shopify reports is
/// logged, never returned as an error: Shopify often reports no size
/// until processing finishes.
///
/// # Errors
///
/// Returns [`FileError::PlatformRejected`] on user errors and
/// [`FileError::Transport`] when Shopify cannot be reached.
#[instrument(skip(client, target), fields(resource_url = %target.resource_url))]
pub async fn register_file(
    client: &AdminClient,
    target: &StagedUploadTarget,
    display_name: &str,
    expected_size: usize,
) -> Result<FileRecord, FileError> {
    let record = client.create_file(&target.resource_url, display_name).await?;

    match record.original_file_size {
        Some(size) if u64::try_from(expected_size).is_ok_and(|expected| expected == size) => {}
        Some(size) => tracing::warn!(
            file_id = %record.id,
            expected_size,
            reported_size = size,
            "Registered file size differs from uploaded size"
        ),
        None => tracing::warn!(
            file_id = %record.id,
            expected_size,
            "Shopify did not report a size for the registered file"
        ),
    }

    if record.status.is_pending() {
        tracing::info!(
            file_id = %record.id,
            status = record.status.as_str(),
            "File registered, Shopify is still processing it"
        );
    }

    Ok(record)
}
