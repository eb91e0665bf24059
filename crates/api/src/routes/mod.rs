//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness check
//! GET    /api/health                 - JSON health report
//!
//! # Files
//! POST   /api/upload                 - Upload via the configured strategy
//! POST   /api/store-file-real        - Alias of /api/upload
//! POST   /api/store-file-data        - Keep a file in memory for a draft order
//! GET    /api/download               - Redirect to or stream a stored file
//! GET    /api/download-file          - Alias of /api/download
//!
//! # Quotes (draft orders)
//! POST   /api/submit-quote           - Create a pending quote
//! POST   /api/submit-quote-real      - Alias of /api/submit-quote
//! GET    /api/draft-orders           - List quotes with status counts
//! GET    /api/get-draft-orders       - Alias of /api/draft-orders
//! GET    /api/draft-order            - Quote detail
//! GET    /api/get-draft-order-simple - Alias of /api/draft-order
//! POST   /api/update-quote           - Price a quote
//! DELETE /api/delete-draft-order     - Delete a quote
//! POST   /api/complete-draft-order   - Complete with payment pending
//! POST   /api/send-invoice-email     - Email the invoice via Shopify
//! ```

pub mod files;
pub mod quotes;

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// File upload and download routes.
pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(files::upload))
        .route("/store-file-real", post(files::upload))
        .route("/store-file-data", post(files::store_file_data))
        .route("/download", get(files::download))
        .route("/download-file", get(files::download))
}

/// Quote (draft order) routes.
pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-quote", post(quotes::submit_quote))
        .route("/submit-quote-real", post(quotes::submit_quote))
        .route("/draft-orders", get(quotes::list_draft_orders))
        .route("/get-draft-orders", get(quotes::list_draft_orders))
        .route("/draft-order", get(quotes::get_draft_order))
        .route("/get-draft-order-simple", get(quotes::get_draft_order))
        .route("/update-quote", post(quotes::update_quote))
        .route("/delete-draft-order", delete(quotes::delete_draft_order))
        .route("/complete-draft-order", post(quotes::complete_draft_order))
        .route("/send-invoice-email", post(quotes::send_invoice_email))
}

/// All routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(api_health))
                .merge(file_routes())
                .merge(quote_routes()),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
    shopify_configured: bool,
    default_storage: &'static str,
}

async fn api_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        timestamp: Utc::now(),
        environment: state.config().environment.clone(),
        shopify_configured: state.shopify().is_configured(),
        default_storage: state.files().default_storage().as_str(),
    })
}
