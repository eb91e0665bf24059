//! Integration tests for the print quote API.
//!
//! Each test boots the real router on an ephemeral port and points the
//! Shopify Admin API (and the staged-upload storage) at a `mockito` server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p print-quote-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mockito::{Matcher, ServerGuard};
use print_quote_api::config::AppConfig;
use print_quote_api::state::AppState;

/// GraphQL path the Admin client posts to for the default API version.
pub const GRAPHQL_PATH: &str = "/admin/api/2024-01/graphql.json";

/// Access token configured for tests; mocks assert it is sent.
pub const TEST_TOKEN: &str = "shpat_test_token";

/// Match a GraphQL request body by operation name.
#[must_use]
pub fn operation(name: &str) -> Matcher {
    Matcher::Regex(format!(r#""operationName":"{name}""#))
}

/// Encode bytes the way the quote form does.
#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// How to configure the app under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestOptions {
    /// Leave out the Shopify access token.
    pub without_credentials: bool,
    /// Keep uploads in memory.
    pub skip_shopify_files: bool,
}

/// A running app plus the mock server standing in for Shopify and storage.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub shopify: ServerGuard,
}

impl TestApp {
    /// Boot the app with default options.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    /// Boot the app.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected or the listener cannot be bound.
    pub async fn spawn_with(options: TestOptions) -> Self {
        let shopify = mockito::Server::new_async().await;

        let mut vars: HashMap<&str, String> = HashMap::from([
            ("HOST", "127.0.0.1".to_string()),
            ("PORT", "0".to_string()),
            ("SHOPIFY_STORE_DOMAIN", "print-quote-test.myshopify.com".to_string()),
            ("SHOPIFY_ADMIN_BASE_URL", shopify.url()),
            ("APP_ENVIRONMENT", "test".to_string()),
            (
                "SKIP_SHOPIFY_FILES",
                options.skip_shopify_files.to_string(),
            ),
        ]);
        if !options.without_credentials {
            vars.insert("SHOPIFY_ACCESS_TOKEN", TEST_TOKEN.to_string());
        }

        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration is valid");

        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        let app = print_quote_api::app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            addr,
            client,
            shopify,
        }
    }

    /// Absolute URL for a path on the app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Mock a staged upload target whose storage URL is `/storage` on the mock server.
    pub async fn mock_staged_target(&mut self) -> mockito::Mock {
        let body = format!(
            r#"{{"data":{{"stagedUploadsCreate":{{"stagedTargets":[{{
                "url":"{}/storage",
                "resourceUrl":"https://storage.example.com/tmp/part.stl",
                "parameters":[{{"name":"key","value":"tmp/part.stl"}},
                              {{"name":"x-goog-signature","value":"sig"}}]
            }}],"userErrors":[]}}}}}}"#,
            self.shopify.url()
        );
        self.shopify
            .mock("POST", GRAPHQL_PATH)
            .match_header("x-shopify-access-token", TEST_TOKEN)
            .match_body(operation("StagedUploadsCreate"))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }
}

/// A draft order node as Shopify returns it.
#[must_use]
pub fn draft_order_json(id: u32, attributes: &[(&str, &str)]) -> String {
    let attributes = attributes
        .iter()
        .map(|(k, v)| format!(r#"{{"key":"{k}","value":"{v}"}}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r##"{{"id":"gid://shopify/DraftOrder/{id}","name":"#D{id}","status":"OPEN",
            "email":"maker@example.com","note2":null,
            "createdAt":"2024-05-01T00:00:00Z","updatedAt":"2024-05-01T00:00:00Z",
            "invoiceUrl":"https://print-quote-test.myshopify.com/invoices/{id}",
            "taxExempt":false,"tags":["quote"],
            "totalPriceSet":{{"shopMoney":{{"amount":"0.0","currencyCode":"USD"}}}},
            "subtotalPriceSet":null,
            "lineItems":{{"nodes":[{{"id":"gid://shopify/DraftOrderLineItem/{id}",
                "title":"part.stl","quantity":1,"originalUnitPriceSet":null,
                "customAttributes":[{attributes}]}}]}}}}"##
    )
}
