//! HTTP middleware.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS
//! 3. `TraceLayer` (`http_request` span)
//! 4. Request ID (recorded on the span, echoed in the response)
//! 5. Body size limit

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
