//! Request identification.
//!
//! # Responsibilities
//! - Accept a caller-supplied `x-request-id` or generate a UUID v4
//! - Echo the ID on the response
//! - Expose the ID to handlers so it can be logged and forwarded to the backend
//!
//! # Design Decisions
//! - Request ID added as the outermost layer so every span carries it
//! - The ID is forwarded as the raw header bytes; only log output is lossy

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID, inbound and outbound.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer assigning an ID to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// The ID of one inbound request, kept byte-for-byte as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(HeaderValue);

impl RequestId {
    /// The ID recorded in `headers`, or `unknown` when there is none.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let value = headers
            .get(X_REQUEST_ID)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("unknown"));
        Self(value)
    }

    /// Header value to send upstream.
    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0.as_bytes()))
    }
}
