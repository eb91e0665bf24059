//! File upload and download handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use print_quote_core::{FileBlob, FileId, StorageKind};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::files::{Download, DownloadRequest, FileError, UploadOutcome};
use crate::state::AppState;

/// Upload request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64 string or data URL.
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    /// Only used by `/api/store-file-data`.
    pub draft_order_id: Option<String>,
}

impl UploadRequest {
    fn into_blob(self) -> Result<(FileBlob, Option<String>), AppError> {
        let (Some(data), Some(name)) = (
            self.file_data.filter(|d| !d.trim().is_empty()),
            self.file_name.filter(|n| !n.trim().is_empty()),
        ) else {
            return Err(AppError::BadRequest(
                "Missing required parameters: fileData, fileName".to_string(),
            ));
        };

        let blob = FileBlob::from_payload(&data, &name, self.file_type.as_deref())
            .map_err(FileError::from)?;
        Ok((blob, self.draft_order_id.filter(|id| !id.trim().is_empty())))
    }

    /// Like [`Self::into_blob`], but the draft order id is mandatory.
    fn into_linked_blob(self) -> Result<(FileBlob, String), AppError> {
        let missing = || {
            AppError::BadRequest(
                "Missing required parameters: draftOrderId, fileData, fileName".to_string(),
            )
        };
        if self.draft_order_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            return Err(missing());
        }

        match self.into_blob()? {
            (blob, Some(draft_order_id)) => Ok((blob, draft_order_id)),
            (_, None) => Err(missing()),
        }
    }
}

/// Successful upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_size: Option<u64>,
    pub uploaded_file_size: usize,
    pub size_match: bool,
    pub storage_type: StorageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_order_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        let size_match = outcome.size_match();
        let message = match outcome.storage {
            StorageKind::Shopify => "File uploaded to Shopify Files",
            StorageKind::Memory => "File stored in memory",
        };
        let platform_file = outcome.platform_file;

        Self {
            success: true,
            message: message.to_string(),
            file_id: outcome.file_id.into_inner(),
            file_name: outcome.file_name,
            file_url: platform_file.as_ref().and_then(|f| f.url.clone()),
            platform_file_id: platform_file.as_ref().map(|f| f.id.clone()),
            file_status: platform_file.as_ref().map(|f| f.status.as_str().to_string()),
            original_file_size: platform_file.as_ref().and_then(|f| f.original_file_size),
            uploaded_file_size: outcome.uploaded_size,
            size_match,
            storage_type: outcome.storage,
            draft_order_id: outcome.draft_order_id,
            timestamp: Utc::now(),
        }
    }
}

/// Upload a file with the configured strategy.
///
/// POST /api/upload
///
/// # Errors
///
/// Returns 400 for missing or undecodable input and 500 when any upload
/// step fails.
pub async fn upload(
    State(state): State<AppState>,
    Json(body): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let (blob, draft_order_id) = body.into_blob()?;
    let outcome = state.files().upload_default(blob, draft_order_id).await?;
    Ok(Json(outcome.into()))
}

/// Keep a file in the memory store, tied to a draft order.
///
/// POST /api/store-file-data
///
/// # Errors
///
/// Returns 400 for missing or undecodable input (including `draftOrderId`)
/// and 413 if the file cannot fit in the memory store.
pub async fn store_file_data(
    State(state): State<AppState>,
    Json(body): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let (blob, draft_order_id) = body.into_linked_blob()?;
    let outcome = state
        .files()
        .upload(blob, StorageKind::Memory, Some(draft_order_id))
        .await?;
    Ok(Json(outcome.into()))
}

/// Download a file by application id or Shopify file id.
///
/// GET /api/download?id=...&platformFileId=...&fileName=...
///
/// Redirects (302) to CDN URLs and streams stored bytes as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Query(request): Query<DownloadRequest>,
) -> Response {
    match state.files().retrieve(&request).await {
        Ok(Download::Redirect { url }) => {
            (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
        }
        Ok(Download::Content {
            bytes,
            mime_type,
            file_name,
        }) => (
            [
                (header::CONTENT_TYPE, mime_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(FileError::NotFound(id)) => not_found(&id),
        Err(FileError::Unavailable(reason)) => {
            tracing::warn!(%reason, "Legacy file store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(page(
                    "File service unavailable",
                    "The file could not be loaded right now. Please try again later.",
                )),
            )
                .into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// 404 for downloads: an HTML page for generated file ids, JSON otherwise.
fn not_found(id: &str) -> Response {
    if FileId::looks_generated(id) {
        let message = format!(
            "No file with id <code>{}</code> exists. It may have expired.",
            escape_html(id)
        );
        (StatusCode::NOT_FOUND, Html(page("File not found", &message))).into_response()
    } else {
        AppError::File(FileError::NotFound(id.to_string())).into_response()
    }
}

fn page(title: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n<p>{message}</p>\n</body>\n</html>\n"
    )
}

fn escape_html(raw: &str) -> String {
    raw.chars().fold(String::with_capacity(raw.len()), |mut out, c| {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
        out
    })
}
