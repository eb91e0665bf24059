//! Draft order operations used by the quote workflow.

use tracing::instrument;

use super::conversions::{attribute_inputs, convert_completed_draft_order, convert_draft_order};
use super::queries::common::{DraftOrderInput, DraftOrderLineItemInput};
use super::queries::{
    DraftOrderComplete, DraftOrderCreate, DraftOrderDelete, DraftOrderInvoiceSend,
    DraftOrderUpdate, GetDraftOrder, GetDraftOrders,
};
use super::{AdminClient, check_user_errors};
use crate::shopify::{
    AdminShopifyError, CompletedDraftOrder, DraftOrder, DraftOrderConnection,
    DraftOrderQuoteInput, InvoiceEmail, NewDraftOrder,
};

impl AdminClient {
    /// Create a draft order with a single custom line item.
    ///
    /// The line item is priced at zero until the order is quoted.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, order), fields(title = %order.title))]
    pub async fn create_draft_order(
        &self,
        order: &NewDraftOrder,
    ) -> Result<DraftOrder, AdminShopifyError> {
        use super::queries::draft_order_create::Variables;

        let input = DraftOrderInput {
            email: order.email.clone(),
            note: order.note.clone(),
            tags: Some(order.tags.clone()),
            tax_exempt: None,
            line_items: Some(vec![DraftOrderLineItemInput {
                title: order.title.clone(),
                quantity: order.quantity,
                original_unit_price: "0.00".to_string(),
                custom_attributes: attribute_inputs(&order.custom_attributes),
                requires_shipping: true,
            }]),
        };

        let response = self.execute::<DraftOrderCreate>(Variables { input }).await?;

        let payload = response
            .draft_order_create
            .ok_or_else(|| AdminShopifyError::graphql("Draft order creation failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .draft_order
            .map(convert_draft_order)
            .ok_or_else(|| AdminShopifyError::graphql("Draft order creation returned no order"))
    }

    /// List draft orders, newest first.
    ///
    /// # Arguments
    ///
    /// * `first` - Number of draft orders to return (1-250)
    /// * `query` - Optional Shopify search query
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_draft_orders(
        &self,
        first: i64,
        query: Option<String>,
    ) -> Result<DraftOrderConnection, AdminShopifyError> {
        use super::queries::get_draft_orders::Variables;

        let response = self
            .execute::<GetDraftOrders>(Variables { first, query })
            .await?;

        Ok(DraftOrderConnection {
            draft_orders: response
                .draft_orders
                .nodes
                .into_iter()
                .map(convert_draft_order)
                .collect(),
            has_next_page: response.draft_orders.page_info.has_next_page,
        })
    }

    /// Get a draft order by ID.
    ///
    /// # Arguments
    ///
    /// * `id` - Shopify draft order ID (e.g., `gid://shopify/DraftOrder/123`)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(draft_order_id = %id))]
    pub async fn get_draft_order(&self, id: &str) -> Result<Option<DraftOrder>, AdminShopifyError> {
        use super::queries::get_draft_order::Variables;

        let response = self
            .execute::<GetDraftOrder>(Variables { id: id.to_string() })
            .await?;

        Ok(response.draft_order.map(convert_draft_order))
    }

    /// Replace the line items, note and tax flag of a draft order with a quote.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, quote), fields(draft_order_id = %id, unit_price = %quote.unit_price))]
    pub async fn update_draft_order_quote(
        &self,
        id: &str,
        quote: &DraftOrderQuoteInput,
    ) -> Result<DraftOrder, AdminShopifyError> {
        use super::queries::draft_order_update::Variables;

        let input = DraftOrderInput {
            email: None,
            note: Some(quote.note.clone()),
            tags: None,
            tax_exempt: Some(quote.tax_exempt),
            line_items: Some(vec![DraftOrderLineItemInput {
                title: quote.title.clone(),
                quantity: quote.quantity,
                original_unit_price: quote.unit_price.clone(),
                custom_attributes: attribute_inputs(&quote.custom_attributes),
                requires_shipping: true,
            }]),
        };

        let response = self
            .execute::<DraftOrderUpdate>(Variables {
                id: id.to_string(),
                input,
            })
            .await?;

        let payload = response
            .draft_order_update
            .ok_or_else(|| AdminShopifyError::graphql("Draft order update failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .draft_order
            .map(convert_draft_order)
            .ok_or_else(|| AdminShopifyError::NotFound(id.to_string()))
    }

    /// Delete a draft order.
    ///
    /// # Returns
    ///
    /// The deleted draft order ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(draft_order_id = %id))]
    pub async fn delete_draft_order(&self, id: &str) -> Result<String, AdminShopifyError> {
        use super::queries::draft_order_delete::{DraftOrderDeleteInput, Variables};

        let variables = Variables {
            input: DraftOrderDeleteInput { id: id.to_string() },
        };

        let response = self.execute::<DraftOrderDelete>(variables).await?;

        let payload = response
            .draft_order_delete
            .ok_or_else(|| AdminShopifyError::graphql("Draft order deletion failed"))?;
        check_user_errors(payload.user_errors)?;

        Ok(payload.deleted_id.unwrap_or_else(|| id.to_string()))
    }

    /// Complete a draft order, leaving payment pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(draft_order_id = %id))]
    pub async fn complete_draft_order(
        &self,
        id: &str,
    ) -> Result<CompletedDraftOrder, AdminShopifyError> {
        use super::queries::draft_order_complete::Variables;

        let variables = Variables {
            id: id.to_string(),
            payment_pending: Some(true),
        };

        let response = self.execute::<DraftOrderComplete>(variables).await?;

        let payload = response
            .draft_order_complete
            .ok_or_else(|| AdminShopifyError::graphql("Draft order completion failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .draft_order
            .map(convert_completed_draft_order)
            .ok_or_else(|| AdminShopifyError::NotFound(id.to_string()))
    }

    /// Ask Shopify to email the draft order invoice to the customer.
    ///
    /// # Arguments
    ///
    /// * `id` - Shopify draft order ID
    /// * `email` - Optional recipient, subject and message overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, email), fields(draft_order_id = %id))]
    pub async fn send_draft_order_invoice(
        &self,
        id: &str,
        email: &InvoiceEmail,
    ) -> Result<DraftOrder, AdminShopifyError> {
        use super::queries::draft_order_invoice_send::{EmailInput, Variables};

        let has_overrides =
            email.to.is_some() || email.subject.is_some() || email.custom_message.is_some();

        let variables = Variables {
            id: id.to_string(),
            email: has_overrides.then(|| EmailInput {
                to: email.to.clone(),
                subject: email.subject.clone(),
                custom_message: email.custom_message.clone(),
            }),
        };

        let response = self.execute::<DraftOrderInvoiceSend>(variables).await?;

        let payload = response
            .draft_order_invoice_send
            .ok_or_else(|| AdminShopifyError::graphql("Invoice send failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .draft_order
            .map(convert_draft_order)
            .ok_or_else(|| AdminShopifyError::NotFound(id.to_string()))
    }
}
