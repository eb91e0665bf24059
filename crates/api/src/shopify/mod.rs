//! Shopify Admin API client.
//!
//! # Security
//!
//! The Admin API token grants write access to files, metaobjects and draft
//! orders. It is only ever attached to requests sent to the configured
//! Admin GraphQL endpoint; staged-upload storage requests go through a
//! separate HTTP client (see `services::files::encoder`).
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` (see `admin::queries`)
//! - Direct API calls to Shopify, no local database
//! - Responses are converted into the plain types in [`types`]
//!
//! # Example
//!
//! ```rust,ignore
//! use print_quote_api::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! let target = client.create_staged_upload("part.stl", "model/stl", Some(1024)).await?;
//! let order = client.get_draft_order("gid://shopify/DraftOrder/1").await?;
//! ```

mod admin;
pub mod types;

pub use admin::{AdminClient, LEGACY_FILE_METAOBJECT_TYPE};
pub use types::*;

#[cfg(test)]
pub(crate) use admin::test_support as admin_test_support;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// Store domain or access token missing from configuration.
    #[error("Shopify Admin API is not configured (set SHOPIFY_STORE_DOMAIN and SHOPIFY_ACCESS_TOKEN)")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status that is not handled more specifically.
    #[error("Shopify API request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User errors from a mutation (e.g., invalid input).
    #[error("User error: {}", format_user_errors(.0))]
    UserError(Vec<UserError>),
}

impl AdminShopifyError {
    pub(crate) fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }])
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A `userErrors` entry from a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UserError {
    /// Path to the offending input field, if any.
    pub field: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field.join("."), self.message)
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_shopify_error_display() {
        let err = AdminShopifyError::NotFound("gid://shopify/DraftOrder/1".to_string());
        assert_eq!(err.to_string(), "Not found: gid://shopify/DraftOrder/1");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = AdminShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = AdminShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_user_error_formatting() {
        let err = AdminShopifyError::UserError(vec![
            UserError {
                field: vec!["files".to_string(), "0".to_string(), "originalSource".to_string()],
                message: "is invalid".to_string(),
            },
            UserError {
                field: vec![],
                message: "Staged upload expired".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "User error: files.0.originalSource: is invalid; Staged upload expired"
        );
    }

    #[test]
    fn test_not_configured_mentions_variables() {
        let msg = AdminShopifyError::NotConfigured.to_string();
        assert!(msg.contains("SHOPIFY_ACCESS_TOKEN"));
    }
}
