//! Domain types for the Shopify Admin API.
//!
//! These types provide a clean API separate from the raw GraphQL response
//! shapes in `admin::queries`.

use print_quote_core::{CustomAttribute, QuoteAttributes};
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

// =============================================================================
// File Types
// =============================================================================

/// Staged upload target for file uploads.
///
/// Single use: the signature in `parameters` is only valid for one POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedUploadTarget {
    /// The URL to upload the file to.
    pub url: String,
    /// The resource URL after upload completes.
    pub resource_url: String,
    /// Form parameters to include with the upload, in platform order.
    pub parameters: Vec<(String, String)>,
}

/// Processing state of a Shopify file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileStatus {
    Uploaded,
    Processing,
    Ready,
    Failed,
    Unknown(String),
}

impl FileStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uploaded => "UPLOADED",
            Self::Processing => "PROCESSING",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether Shopify is still working on the file.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Uploaded | Self::Processing)
    }
}

impl From<String> for FileStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UPLOADED" => Self::Uploaded,
            "PROCESSING" => Self::Processing,
            "READY" => Self::Ready,
            "FAILED" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl From<FileStatus> for String {
    fn from(status: FileStatus) -> Self {
        status.as_str().to_owned()
    }
}

/// A permanent file registered with Shopify Files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Shopify file GID (e.g., `gid://shopify/GenericFile/123`).
    pub id: String,
    /// CDN URL, absent while the file is still processing.
    pub url: Option<String>,
    /// Alt text (the display file name).
    pub alt: Option<String>,
    /// Size reported by Shopify after ingestion.
    pub original_file_size: Option<u64>,
    /// Processing state.
    pub status: FileStatus,
}

/// A file record written by the metaobject-based storage of older releases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyFileRecord {
    /// Metaobject GID.
    pub id: String,
    /// Metaobject handle.
    pub handle: String,
    /// Raw metaobject fields in the order Shopify returned them.
    pub fields: Vec<(String, String)>,
}

impl LegacyFileRecord {
    /// Look up a field value by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Whether this record answers to `id` (application file id, GID or handle).
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.field("file_id") == Some(id) || self.id == id || self.handle == id
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.field("file_name").or_else(|| self.field("fileName"))
    }

    #[must_use]
    pub fn file_type(&self) -> Option<&str> {
        self.field("file_type").or_else(|| self.field("fileType"))
    }

    /// Remote URL, only when it is an absolute http(s) URL.
    #[must_use]
    pub fn file_url(&self) -> Option<&str> {
        self.field("file_url")
            .or_else(|| self.field("fileUrl"))
            .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
    }

    /// Inline Base64 payload (plain or data URL).
    #[must_use]
    pub fn file_data(&self) -> Option<&str> {
        self.field("file_data").or_else(|| self.field("fileData"))
    }
}

// =============================================================================
// Draft Order Types
// =============================================================================

/// A draft order used as a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    pub id: String,
    pub name: String,
    /// Shopify status (`OPEN`, `INVOICE_SENT`, `COMPLETED`).
    pub status: String,
    pub email: Option<String>,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub invoice_url: Option<String>,
    pub tax_exempt: bool,
    pub tags: Vec<String>,
    pub total_price: Option<Money>,
    pub subtotal_price: Option<Money>,
    pub line_items: Vec<DraftOrderLineItem>,
}

impl DraftOrder {
    /// The line item carrying the quote attributes.
    #[must_use]
    pub fn quote_line_item(&self) -> Option<&DraftOrderLineItem> {
        self.line_items.first()
    }

    /// Quote metadata parsed from the first line item.
    #[must_use]
    pub fn quote(&self) -> QuoteAttributes {
        self.quote_line_item()
            .map(|item| QuoteAttributes::from_attributes(&item.custom_attributes))
            .unwrap_or_default()
    }
}

/// A draft order line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderLineItem {
    pub id: String,
    pub title: String,
    pub quantity: i64,
    pub original_unit_price: Option<Money>,
    pub custom_attributes: Vec<CustomAttribute>,
}

/// Paginated list of draft orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrderConnection {
    pub draft_orders: Vec<DraftOrder>,
    pub has_next_page: bool,
}

/// Result of completing a draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDraftOrder {
    pub id: String,
    pub name: String,
    pub status: String,
    pub invoice_url: Option<String>,
    pub total_price: Option<Money>,
    /// The real order created from the draft, if Shopify returned it.
    pub order_id: Option<String>,
    pub order_name: Option<String>,
}

/// Input for creating a quote draft order.
#[derive(Debug, Clone, Default)]
pub struct NewDraftOrder {
    pub email: Option<String>,
    /// Custom line item title.
    pub title: String,
    pub quantity: i64,
    pub custom_attributes: Vec<CustomAttribute>,
    pub note: Option<String>,
    pub tags: Vec<String>,
}

/// Input for pricing the quote line item of an existing draft order.
///
/// Shopify replaces all line items on update, so the caller passes the
/// title and quantity it wants to keep.
#[derive(Debug, Clone)]
pub struct DraftOrderQuoteInput {
    pub title: String,
    pub quantity: i64,
    /// Unit price as a decimal string.
    pub unit_price: String,
    pub custom_attributes: Vec<CustomAttribute>,
    pub note: String,
    pub tax_exempt: bool,
}

/// Optional overrides for the invoice email Shopify sends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEmail {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub custom_message: Option<String>,
}
