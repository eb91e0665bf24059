//! Draft order (quote) handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use print_quote_core::{Email, FileBlob, QuoteAmount, QuoteAttributes, QuoteUpdate, StorageKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::services::files::FileError;
use crate::services::quotes::{AttachedFile, QuoteSubmission};
use crate::shopify::{CompletedDraftOrder, DraftOrder, InvoiceEmail, Money};
use crate::state::AppState;

// =============================================================================
// Shared shapes
// =============================================================================

/// A draft order together with its parsed quote attributes.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub draft_order: DraftOrder,
    pub quote: QuoteAttributes,
}

impl From<DraftOrder> for QuoteView {
    fn from(draft_order: DraftOrder) -> Self {
        let quote = draft_order.quote();
        Self { draft_order, quote }
    }
}

/// Body carrying only a draft order id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderIdRequest {
    #[serde(default)]
    pub draft_order_id: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Submit
// =============================================================================

/// Quote form body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteRequest {
    pub email: Option<String>,
    pub title: Option<String>,
    pub quantity: Option<i64>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub precision: Option<String>,
    pub note: Option<String>,
    /// Inline file, Base64 or data URL.
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    /// Id returned by an earlier upload.
    pub file_id: Option<String>,
    #[serde(alias = "shopifyFileId")]
    pub platform_file_id: Option<String>,
    pub storage_type: Option<String>,
}

impl SubmitQuoteRequest {
    fn into_submission(self) -> Result<QuoteSubmission, AppError> {
        let email = non_blank(self.email)
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let file_name = non_blank(self.file_name);

        let file = match non_blank(self.file_data) {
            Some(data) => {
                let name = file_name.as_deref().ok_or_else(|| {
                    AppError::BadRequest("fileName is required with fileData".to_string())
                })?;
                Some(
                    FileBlob::from_payload(&data, name, self.file_type.as_deref())
                        .map_err(FileError::from)?,
                )
            }
            None => None,
        };

        let platform_file_id = non_blank(self.platform_file_id);
        let attached_file = non_blank(self.file_id).map(|file_id| {
            let storage = self
                .storage_type
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(if platform_file_id.is_some() {
                    StorageKind::Shopify
                } else {
                    StorageKind::Memory
                });
            AttachedFile {
                file_name: file_name.clone().unwrap_or_else(|| file_id.clone()),
                file_id,
                storage,
                platform_file_id,
            }
        });

        Ok(QuoteSubmission {
            email,
            title: non_blank(self.title),
            quantity: self.quantity,
            material: non_blank(self.material),
            color: non_blank(self.color),
            precision: non_blank(self.precision),
            note: non_blank(self.note),
            file,
            attached_file,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteResponse {
    pub success: bool,
    pub message: String,
    pub quote_id: String,
    pub draft_order_id: String,
    pub draft_order_name: String,
    pub invoice_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_file_id: Option<String>,
}

/// Create a pending quote.
///
/// POST /api/submit-quote
///
/// # Errors
///
/// Returns 400 for invalid input and 500 if the upload or the draft
/// order creation fails.
pub async fn submit_quote(
    State(state): State<AppState>,
    Json(body): Json<SubmitQuoteRequest>,
) -> Result<Json<SubmitQuoteResponse>, AppError> {
    let submitted = state.quotes().submit(body.into_submission()?).await?;
    let quote = submitted.draft_order.quote();

    Ok(Json(SubmitQuoteResponse {
        success: true,
        message: "Quote submitted".to_string(),
        quote_id: submitted.quote_id,
        draft_order_id: submitted.draft_order.id,
        draft_order_name: submitted.draft_order.name,
        invoice_url: submitted.draft_order.invoice_url,
        file_id: quote.file_id,
        platform_file_id: quote.platform_file_id,
    }))
}

// =============================================================================
// List / detail
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    pub draft_orders: Vec<QuoteView>,
    pub total: usize,
    pub pending: usize,
    pub quoted: usize,
    pub has_next_page: bool,
}

/// List recent quotes.
///
/// GET /api/draft-orders?status=...&limit=...
///
/// # Errors
///
/// Returns 500 if Shopify cannot be queried.
pub async fn list_draft_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let page = state
        .quotes()
        .list(query.status.as_deref(), query.limit)
        .await?;

    Ok(Json(ListResponse {
        success: true,
        draft_orders: page.draft_orders.into_iter().map(QuoteView::from).collect(),
        total: page.total,
        pending: page.pending,
        quoted: page.quoted,
        has_next_page: page.has_next_page,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub success: bool,
    pub draft_order: QuoteView,
}

/// Fetch one quote.
///
/// GET /api/draft-order?id=...
///
/// # Errors
///
/// Returns 400 without an id and 404 if the draft order does not exist.
pub async fn get_draft_order(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DetailResponse>, AppError> {
    let draft_order = state.quotes().get(&query.id).await?;
    Ok(Json(DetailResponse {
        success: true,
        draft_order: draft_order.into(),
    }))
}

// =============================================================================
// Update quote
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteRequest {
    #[serde(default)]
    pub draft_order_id: String,
    /// JSON number or numeric string.
    pub amount: Option<Value>,
    pub note: Option<String>,
    pub sender_email: Option<String>,
}

fn parse_amount(raw: Option<&Value>) -> Result<QuoteAmount, AppError> {
    let text = match raw {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            return Err(AppError::BadRequest(
                "Missing required parameters: draftOrderId, amount".to_string(),
            ));
        }
    };
    text.parse()
        .map_err(|e: print_quote_core::AmountError| AppError::BadRequest(e.to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteResponse {
    pub success: bool,
    pub message: String,
    pub draft_order_id: String,
    pub draft_order_name: String,
    pub invoice_url: Option<String>,
    pub total_price: Option<Money>,
}

/// Price a pending quote.
///
/// POST /api/update-quote
///
/// # Errors
///
/// Returns 400 without id or amount, 404 if the draft order does not
/// exist, 500 if Shopify rejects the update.
pub async fn update_quote(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuoteRequest>,
) -> Result<Json<UpdateQuoteResponse>, AppError> {
    if body.draft_order_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Missing required parameters: draftOrderId, amount".to_string(),
        ));
    }
    let amount = parse_amount(body.amount.as_ref())?;

    let update = QuoteUpdate {
        amount,
        quoted_at: Utc::now(),
        note: non_blank(body.note),
        sender_email: non_blank(body.sender_email),
    };

    let order = state
        .quotes()
        .update_quote(body.draft_order_id.trim(), &update)
        .await?;

    Ok(Json(UpdateQuoteResponse {
        success: true,
        message: "Quote updated".to_string(),
        draft_order_id: order.id,
        draft_order_name: order.name,
        invoice_url: order.invoice_url,
        total_price: order.total_price,
    }))
}

// =============================================================================
// Delete / complete / invoice
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub deleted_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Delete a quote.
///
/// DELETE /api/delete-draft-order
///
/// # Errors
///
/// Returns 400 without an id and 500 if Shopify rejects the deletion.
pub async fn delete_draft_order(
    State(state): State<AppState>,
    Json(body): Json<DraftOrderIdRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted_id = state.quotes().delete(&body.draft_order_id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "Draft order deleted".to_string(),
        deleted_id,
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub success: bool,
    pub message: String,
    pub draft_order: CompletedDraftOrder,
}

/// Complete a quote with payment pending.
///
/// POST /api/complete-draft-order
///
/// # Errors
///
/// Returns 400 without an id and 500 if Shopify rejects the completion.
pub async fn complete_draft_order(
    State(state): State<AppState>,
    Json(body): Json<DraftOrderIdRequest>,
) -> Result<Json<CompleteResponse>, AppError> {
    let draft_order = state.quotes().complete(&body.draft_order_id).await?;
    Ok(Json(CompleteResponse {
        success: true,
        message: "Draft order completed, payment pending".to_string(),
        draft_order,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceRequest {
    #[serde(default)]
    pub draft_order_id: String,
    #[serde(flatten)]
    pub email: InvoiceEmail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub draft_order_id: String,
    pub invoice_url: Option<String>,
}

/// Email the quote invoice through Shopify.
///
/// POST /api/send-invoice-email
///
/// # Errors
///
/// Returns 400 without an id and 500 if Shopify rejects the request.
pub async fn send_invoice_email(
    State(state): State<AppState>,
    Json(body): Json<SendInvoiceRequest>,
) -> Result<Json<SendInvoiceResponse>, AppError> {
    let order = state
        .quotes()
        .send_invoice(&body.draft_order_id, &body.email)
        .await?;
    Ok(Json(SendInvoiceResponse {
        success: true,
        message: "Invoice sent".to_string(),
        draft_order_id: order.id,
        invoice_url: order.invoice_url,
    }))
}
