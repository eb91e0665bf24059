//! Print Quote Core - Shared domain types.
//!
//! This crate provides the types shared by the quote backend components:
//! - `api` - HTTP facade in front of the Shopify Admin API
//! - `integration-tests` - End-to-end tests against mocked upstreams
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Decoding an uploaded payload or merging draft-order attributes
//! happens here so both sides of the wire agree on the format.
//!
//! # Modules
//!
//! - [`types`] - File ids, upload payloads, quote attributes, amounts and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
