//! Shopify Files: staged uploads, file records and legacy metaobject storage.

use tracing::instrument;

use super::conversions::{convert_file, convert_metaobject, convert_staged_target};
use super::queries::{FileCreate, FileDelete, GetFile, GetMetaobjects, StagedUploadsCreate};
use super::{AdminClient, check_user_errors};
use crate::shopify::{AdminShopifyError, FileRecord, LegacyFileRecord, StagedUploadTarget};

/// Metaobject type used by the metaobject-backed file storage of older releases.
pub const LEGACY_FILE_METAOBJECT_TYPE: &str = "uploaded_file";

/// Shopify caps connection pages at 250 nodes.
const LEGACY_FILE_PAGE_SIZE: i64 = 250;

impl AdminClient {
    /// Request a single-use staged upload target for a generic file.
    ///
    /// # Arguments
    ///
    /// * `filename` - Name the file will be stored under
    /// * `mime_type` - MIME type of the file
    /// * `file_size` - Size in bytes, if known
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns user errors, or
    /// returns no target.
    #[instrument(skip(self))]
    pub async fn create_staged_upload(
        &self,
        filename: &str,
        mime_type: &str,
        file_size: Option<u64>,
    ) -> Result<StagedUploadTarget, AdminShopifyError> {
        use super::queries::staged_uploads_create::{
            StagedUploadHttpMethodType, StagedUploadInput,
            StagedUploadTargetGenerateUploadResource, Variables,
        };

        let variables = Variables {
            input: vec![StagedUploadInput {
                filename: filename.to_string(),
                mime_type: mime_type.to_string(),
                resource: StagedUploadTargetGenerateUploadResource::FILE,
                file_size: file_size.map(|s| s.to_string()),
                http_method: StagedUploadHttpMethodType::POST,
            }],
        };

        let response = self.execute::<StagedUploadsCreate>(variables).await?;

        let payload = response
            .staged_uploads_create
            .ok_or_else(|| AdminShopifyError::graphql("Staged upload creation failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .staged_targets
            .and_then(|targets| targets.into_iter().next())
            .map(convert_staged_target)
            .ok_or_else(|| AdminShopifyError::graphql("Staged upload returned no targets"))
    }

    /// Register an uploaded blob as a permanent file.
    ///
    /// # Arguments
    ///
    /// * `resource_url` - The `resourceUrl` of the staged target the blob was posted to
    /// * `alt` - Display name stored as alt text
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn create_file(
        &self,
        resource_url: &str,
        alt: &str,
    ) -> Result<FileRecord, AdminShopifyError> {
        use super::queries::file_create::{FileContentType, FileCreateInput, Variables};

        let variables = Variables {
            files: vec![FileCreateInput {
                original_source: resource_url.to_string(),
                content_type: FileContentType::FILE,
                alt: Some(alt.to_string()),
            }],
        };

        let response = self.execute::<FileCreate>(variables).await?;

        let payload = response
            .file_create
            .ok_or_else(|| AdminShopifyError::graphql("File creation failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .files
            .and_then(|files| files.into_iter().next())
            .map(convert_file)
            .ok_or_else(|| AdminShopifyError::graphql("File creation returned no file"))
    }

    /// Delete files from Shopify Files.
    ///
    /// # Returns
    ///
    /// The IDs Shopify reports as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn delete_files(
        &self,
        file_ids: Vec<String>,
    ) -> Result<Vec<String>, AdminShopifyError> {
        use super::queries::file_delete::Variables;

        let response = self.execute::<FileDelete>(Variables { file_ids }).await?;

        let payload = response
            .file_delete
            .ok_or_else(|| AdminShopifyError::graphql("File deletion failed"))?;
        check_user_errors(payload.user_errors)?;

        Ok(payload.deleted_file_ids.unwrap_or_default())
    }

    /// Look up a file by its Shopify GID.
    ///
    /// Returns `None` when the node does not exist or is not a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(file_id = %id))]
    pub async fn get_file(&self, id: &str) -> Result<Option<FileRecord>, AdminShopifyError> {
        use super::queries::get_file::Variables;

        let response = self
            .execute::<GetFile>(Variables { id: id.to_string() })
            .await?;

        Ok(response
            .node
            .filter(|node| matches!(node.typename.as_str(), "GenericFile" | "MediaImage"))
            .map(convert_file))
    }

    /// Find a file record in the legacy metaobject storage.
    ///
    /// Matches the `file_id` field, the metaobject GID or its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_legacy_file(
        &self,
        id: &str,
    ) -> Result<Option<LegacyFileRecord>, AdminShopifyError> {
        use super::queries::get_metaobjects::Variables;

        let variables = Variables {
            type_: LEGACY_FILE_METAOBJECT_TYPE.to_string(),
            first: LEGACY_FILE_PAGE_SIZE,
        };

        let response = self.execute::<GetMetaobjects>(variables).await?;

        Ok(response
            .metaobjects
            .nodes
            .into_iter()
            .map(convert_metaobject)
            .find(|record| record.matches(id)))
    }
}
