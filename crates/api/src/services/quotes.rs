//! Quote workflow on top of Shopify draft orders.
//!
//! A quote is a draft order with one custom line item whose attributes
//! carry the quote metadata (see [`QuoteAttributes`]). Submitting creates
//! the order at price zero; staff later price it, then either send the
//! invoice or complete the order.

use chrono::Utc;
use print_quote_core::{
    Email, FileBlob, QuoteAttributes, QuoteStatus, QuoteUpdate, StorageKind, generate_quote_id,
};
use thiserror::Error;
use tracing::instrument;

use super::files::{FileService, UploadError, UploadOutcome};
use crate::shopify::{
    AdminClient, AdminShopifyError, CompletedDraftOrder, DraftOrder, DraftOrderQuoteInput,
    InvoiceEmail, NewDraftOrder,
};

/// Tag added to every draft order created by the quote form.
pub const QUOTE_TAG: &str = "quote";

/// Line item title used when the customer gives neither title nor file.
pub const DEFAULT_QUOTE_TITLE: &str = "3D Print Quote";

/// Default and maximum page size for the draft order list.
pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 250;

/// Errors from the quote workflow.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Required input is missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// The draft order does not exist.
    #[error("Draft order not found: {0}")]
    NotFound(String),

    /// Shopify rejected or failed the request.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),

    /// The attached file could not be uploaded.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// A file uploaded earlier through the upload endpoint.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    pub file_id: String,
    pub file_name: String,
    pub storage: StorageKind,
    pub platform_file_id: Option<String>,
}

/// What the customer submitted on the quote form.
#[derive(Debug, Clone, Default)]
pub struct QuoteSubmission {
    pub email: Option<Email>,
    pub title: Option<String>,
    pub quantity: Option<i64>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub precision: Option<String>,
    pub note: Option<String>,
    /// Inline file, uploaded with the default strategy before the order is created.
    pub file: Option<FileBlob>,
    /// Reference to an already uploaded file. Ignored when `file` is set.
    pub attached_file: Option<AttachedFile>,
}

/// A created quote.
#[derive(Debug, Clone)]
pub struct SubmittedQuote {
    pub quote_id: String,
    pub draft_order: DraftOrder,
    pub upload: Option<UploadOutcome>,
}

/// A page of quotes with counts over the unfiltered page.
#[derive(Debug, Clone)]
pub struct QuoteList {
    pub draft_orders: Vec<DraftOrder>,
    pub total: usize,
    pub pending: usize,
    pub quoted: usize,
    pub has_next_page: bool,
}

/// Quote operations backed by the Admin API.
#[derive(Clone)]
pub struct QuoteService {
    shopify: AdminClient,
    files: FileService,
}

impl QuoteService {
    #[must_use]
    pub const fn new(shopify: AdminClient, files: FileService) -> Self {
        Self { shopify, files }
    }

    /// Create a pending quote.
    ///
    /// An inline file is uploaded first. If the draft order cannot be
    /// created afterwards, the uploaded file is discarded again.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify is not configured, the upload fails or
    /// the draft order cannot be created.
    #[instrument(skip(self, submission), fields(has_file = submission.file.is_some()))]
    pub async fn submit(&self, submission: QuoteSubmission) -> Result<SubmittedQuote, QuoteError> {
        if !self.shopify.is_configured() {
            return Err(AdminShopifyError::NotConfigured.into());
        }

        let quantity = submission.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(QuoteError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }

        let quote_id = generate_quote_id(Utc::now(), &mut rand::rng());
        let mut attributes = QuoteAttributes {
            quote_id: Some(quote_id.clone()),
            status: QuoteStatus::Pending,
            material: submission.material,
            color: submission.color,
            precision: submission.precision,
            ..QuoteAttributes::default()
        };

        let upload = match submission.file {
            Some(blob) => Some(self.files.upload_default(blob, None).await?),
            None => None,
        };

        if let Some(outcome) = &upload {
            attributes.attach_file(
                &outcome.file_id,
                &outcome.file_name,
                outcome.storage,
                outcome.platform_file.as_ref().map(|f| f.id.as_str()),
            );
        } else if let Some(file) = &submission.attached_file {
            attributes.file_id = Some(file.file_id.clone());
            attributes.file_name = Some(file.file_name.clone());
            attributes.storage_kind = Some(file.storage);
            attributes.platform_file_id.clone_from(&file.platform_file_id);
        }

        let title = submission
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| attributes.file_name.clone())
            .unwrap_or_else(|| DEFAULT_QUOTE_TITLE.to_string());

        let order = NewDraftOrder {
            email: submission.email.map(|e| e.as_str().to_string()),
            title,
            quantity,
            custom_attributes: attributes.to_attributes(),
            note: submission.note.filter(|n| !n.trim().is_empty()),
            tags: vec![QUOTE_TAG.to_string()],
        };

        match self.shopify.create_draft_order(&order).await {
            Ok(draft_order) => {
                tracing::info!(
                    quote_id = %quote_id,
                    draft_order_id = %draft_order.id,
                    "Quote submitted"
                );
                Ok(SubmittedQuote {
                    quote_id,
                    draft_order,
                    upload,
                })
            }
            Err(e) => {
                if let Some(outcome) = &upload {
                    tracing::warn!(
                        file_id = %outcome.file_id,
                        error = %e,
                        "Draft order creation failed, discarding uploaded file"
                    );
                    self.files.discard(outcome).await;
                }
                Err(e.into())
            }
        }
    }

    /// List recent quotes, newest first.
    ///
    /// `limit` is clamped to `1..=250`. Counts cover the fetched page
    /// before the status filter is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify request fails.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<&str>,
        limit: Option<i64>,
    ) -> Result<QuoteList, QuoteError> {
        let first = limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let connection = self.shopify.get_draft_orders(first, None).await?;
        let statuses: Vec<QuoteStatus> = connection
            .draft_orders
            .iter()
            .map(|order| order.quote().status)
            .collect();

        let total = statuses.len();
        let pending = statuses.iter().filter(|s| **s == QuoteStatus::Pending).count();
        let quoted = statuses.iter().filter(|s| **s == QuoteStatus::Quoted).count();

        let filter = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| QuoteStatus::from(s.to_string()));

        let draft_orders = connection
            .draft_orders
            .into_iter()
            .zip(statuses)
            .filter(|(_, s)| filter.as_ref().is_none_or(|f| f == s))
            .map(|(order, _)| order)
            .collect();

        Ok(QuoteList {
            draft_orders,
            total,
            pending,
            quoted,
            has_next_page: connection.has_next_page,
        })
    }

    /// Fetch one quote.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::NotFound`] if the draft order does not exist.
    pub async fn get(&self, id: &str) -> Result<DraftOrder, QuoteError> {
        let id = required_id(id)?;
        self.shopify
            .get_draft_order(id)
            .await?
            .ok_or_else(|| QuoteError::NotFound(id.to_string()))
    }

    /// Price a quote.
    ///
    /// Unrelated line-item attributes survive; the quote keys are replaced
    /// and the status becomes `Quoted`.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::NotFound`] if the draft order does not exist.
    #[instrument(skip(self, update), fields(draft_order_id = %id, amount = %update.amount))]
    pub async fn update_quote(
        &self,
        id: &str,
        update: &QuoteUpdate,
    ) -> Result<DraftOrder, QuoteError> {
        let current = self.get(id).await?;

        let (title, quantity, merged) = match current.quote_line_item() {
            Some(item) => (
                item.title.clone(),
                item.quantity,
                update.merge_into(&item.custom_attributes),
            ),
            None => (DEFAULT_QUOTE_TITLE.to_string(), 1, update.merge_into(&[])),
        };

        let input = DraftOrderQuoteInput {
            title,
            quantity,
            unit_price: update.amount.to_money_string(),
            custom_attributes: merged,
            note: update.order_note(),
            tax_exempt: true,
        };

        let order = self
            .shopify
            .update_draft_order_quote(&current.id, &input)
            .await?;
        tracing::info!(draft_order_id = %order.id, "Quote priced");
        Ok(order)
    }

    /// Delete a quote, returning the deleted id.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify rejects the deletion.
    pub async fn delete(&self, id: &str) -> Result<String, QuoteError> {
        let id = required_id(id)?;
        Ok(self.shopify.delete_draft_order(id).await?)
    }

    /// Turn a quote into an order with payment pending.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify rejects the completion.
    pub async fn complete(&self, id: &str) -> Result<CompletedDraftOrder, QuoteError> {
        let id = required_id(id)?;
        Ok(self.shopify.complete_draft_order(id).await?)
    }

    /// Have Shopify email the invoice for a quote.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify rejects the request.
    pub async fn send_invoice(
        &self,
        id: &str,
        email: &InvoiceEmail,
    ) -> Result<DraftOrder, QuoteError> {
        let id = required_id(id)?;
        Ok(self.shopify.send_draft_order_invoice(id, email).await?)
    }
}

fn required_id(id: &str) -> Result<&str, QuoteError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(QuoteError::InvalidInput(
            "draftOrderId is required".to_string(),
        ));
    }
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::TimeZone;
    use mockito::Matcher;

    use super::*;
    use crate::services::files::{BlobStore, MemoryBlobStore, StorageClient};
    use crate::shopify::admin_test_support::{GRAPHQL_PATH, client_for, operation};

    fn draft_order_json(id: u32, status: Option<&str>) -> String {
        let attributes = status.map_or_else(String::new, |s| {
            format!(r#"{{"key":"Status","value":"{s}"}},"#)
        });
        format!(
            r##"{{"id":"gid://shopify/DraftOrder/{id}","name":"#D{id}","status":"OPEN",
                "email":"maker@example.com","note2":null,
                "createdAt":"2024-05-01T00:00:00Z","updatedAt":"2024-05-01T00:00:00Z",
                "invoiceUrl":null,"taxExempt":false,"tags":["quote"],
                "totalPriceSet":null,"subtotalPriceSet":null,
                "lineItems":{{"nodes":[{{"id":"gid://shopify/DraftOrderLineItem/{id}",
                    "title":"bracket.stl","quantity":2,"originalUnitPriceSet":null,
                    "customAttributes":[{attributes}{{"key":"Material","value":"PETG"}}]}}]}}}}"##
        )
    }

    fn service_with_store(server_url: &str, store: Arc<dyn BlobStore>) -> QuoteService {
        let shopify = client_for(server_url);
        let files = FileService::new(
            shopify.clone(),
            StorageClient::new(),
            store,
            StorageKind::Memory,
        );
        QuoteService::new(shopify, files)
    }

    fn service(server_url: &str) -> QuoteService {
        service_with_store(
            server_url,
            Arc::new(MemoryBlobStore::new(Duration::from_secs(60), 1024 * 1024)),
        )
    }

    #[tokio::test]
    async fn test_submit_creates_pending_quote_with_file() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::AllOf(vec![
                operation("DraftOrderCreate"),
                Matcher::Regex(r#""key":"Status","value":"Pending Quote""#.to_string()),
                Matcher::Regex(r#""key":"File Storage","value":"memory""#.to_string()),
                Matcher::Regex(r#""key":"Quote ID","value":"Q-\d{8}-"#.to_string()),
                Matcher::Regex(r#""title":"bracket.stl""#.to_string()),
            ]))
            .with_status(200)
            .with_body(format!(
                r#"{{"data":{{"draftOrderCreate":{{"draftOrder":{},"userErrors":[]}}}}}}"#,
                draft_order_json(1, Some("Pending Quote"))
            ))
            .create_async()
            .await;

        let store: Arc<dyn BlobStore> =
            Arc::new(MemoryBlobStore::new(Duration::from_secs(60), 1024 * 1024));
        let submitted = service_with_store(&server.url(), store.clone())
            .submit(QuoteSubmission {
                email: Some(Email::parse("maker@example.com").unwrap()),
                material: Some("PETG".to_string()),
                file: Some(FileBlob::new(b"solid".to_vec(), "bracket.stl", None).unwrap()),
                ..QuoteSubmission::default()
            })
            .await
            .unwrap();

        create.assert_async().await;
        assert!(submitted.quote_id.starts_with("Q-"));
        let upload = submitted.upload.unwrap();
        assert!(store.get(upload.file_id.as_str()).is_some());
    }

    #[tokio::test]
    async fn test_submit_failure_discards_uploaded_file() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("DraftOrderCreate"))
            .with_status(200)
            .with_body(
                r#"{"data":{"draftOrderCreate":{"draftOrder":null,
                    "userErrors":[{"field":["email"],"message":"Email is invalid"}]}}}"#,
            )
            .create_async()
            .await;

        let store: Arc<dyn BlobStore> =
            Arc::new(MemoryBlobStore::new(Duration::from_secs(60), 1024 * 1024));
        let err = service_with_store(&server.url(), store.clone())
            .submit(QuoteSubmission {
                file: Some(FileBlob::new(b"solid".to_vec(), "bracket.stl", None).unwrap()),
                ..QuoteSubmission::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QuoteError::Shopify(AdminShopifyError::UserError(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_zero_quantity() {
        let server = mockito::Server::new_async().await;
        let err = service(&server.url())
            .submit(QuoteSubmission {
                quantity: Some(0),
                ..QuoteSubmission::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_list_counts_before_filtering() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::AllOf(vec![
                operation("GetDraftOrders"),
                Matcher::Regex(r#""first":250"#.to_string()),
            ]))
            .with_status(200)
            .with_body(format!(
                r#"{{"data":{{"draftOrders":{{"nodes":[{},{},{}],"pageInfo":{{"hasNextPage":false}}}}}}}}"#,
                draft_order_json(1, None),
                draft_order_json(2, Some("Quoted")),
                draft_order_json(3, Some("Pending Quote")),
            ))
            .create_async()
            .await;

        let page = service(&server.url())
            .list(Some("Quoted"), Some(1000))
            .await
            .unwrap();

        list.assert_async().await;
        assert_eq!(page.total, 3);
        assert_eq!(page.pending, 2);
        assert_eq!(page.quoted, 1);
        assert_eq!(page.draft_orders.len(), 1);
        assert_eq!(page.draft_orders[0].id, "gid://shopify/DraftOrder/2");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("GetDraftOrder"))
            .with_status(200)
            .with_body(r#"{"data":{"draftOrder":null}}"#)
            .create_async()
            .await;

        let err = service(&server.url())
            .get("gid://shopify/DraftOrder/404")
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_quote_merges_attributes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(operation("GetDraftOrder"))
            .with_status(200)
            .with_body(format!(
                r#"{{"data":{{"draftOrder":{}}}}}"#,
                draft_order_json(1, Some("Pending Quote"))
            ))
            .create_async()
            .await;
        let update = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::AllOf(vec![
                operation("DraftOrderUpdate"),
                Matcher::Regex(r#""originalUnitPrice":"42.50""#.to_string()),
                Matcher::Regex(r#""taxExempt":true"#.to_string()),
                Matcher::Regex(r#""quantity":2"#.to_string()),
                Matcher::Regex(r#""key":"Material","value":"PETG""#.to_string()),
                Matcher::Regex(r#""key":"Status","value":"Quoted""#.to_string()),
            ]))
            .with_status(200)
            .with_body(format!(
                r#"{{"data":{{"draftOrderUpdate":{{"draftOrder":{},"userErrors":[]}}}}}}"#,
                draft_order_json(1, Some("Quoted"))
            ))
            .create_async()
            .await;

        let order = service(&server.url())
            .update_quote(
                "gid://shopify/DraftOrder/1",
                &QuoteUpdate {
                    amount: "42.5".parse().unwrap(),
                    quoted_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
                    note: None,
                    sender_email: None,
                },
            )
            .await
            .unwrap();

        update.assert_async().await;
        assert_eq!(order.quote().status, QuoteStatus::Quoted);
    }

    #[tokio::test]
    async fn test_blank_id_rejected_without_request() {
        let mut server = mockito::Server::new_async().await;
        let graphql = server
            .mock("POST", GRAPHQL_PATH)
            .expect(0)
            .create_async()
            .await;

        let err = service(&server.url()).delete("  ").await.unwrap_err();
        assert!(matches!(err, QuoteError::InvalidInput(_)));
        graphql.assert_async().await;
    }
}
