//! Shopify Admin API GraphQL client.
//!
//! Authenticates with a static Admin API access token. The client can be
//! built without credentials; every call then fails with
//! [`AdminShopifyError::NotConfigured`] before touching the network.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::ShopifyConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod conversions;
mod draft_orders;
mod files;
pub mod queries;

pub use files::LEGACY_FILE_METAOBJECT_TYPE;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    /// `None` when the store domain or token is missing.
    credentials: Option<Credentials>,
}

struct Credentials {
    endpoint: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shopify Admin API configuration
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();

        let credentials = config
            .graphql_endpoint()
            .zip(config.access_token.clone())
            .map(|(endpoint, access_token)| Credentials {
                endpoint,
                access_token,
            });

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                credentials,
            }),
        }
    }

    /// Whether store domain and access token are both configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.credentials.is_some()
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError> {
        let credentials = self
            .inner
            .credentials
            .as_ref()
            .ok_or(AdminShopifyError::NotConfigured)?;

        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&credentials.endpoint)
            .header(
                "X-Shopify-Access-Token",
                credentials.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdminShopifyError::Status {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let graphql_response: GraphQLResponse<Q::ResponseData> = serde_json::from_slice(&bytes)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .ok_or_else(|| AdminShopifyError::graphql("No data in response"))
    }
}

/// Fail with [`AdminShopifyError::UserError`] if a mutation reported any.
fn check_user_errors(errors: Vec<queries::common::UserErrors>) -> Result<(), AdminShopifyError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdminShopifyError::UserError(conversions::convert_user_errors(
            errors,
        )))
    }
}
