//! Mapping of relay failures to HTTP responses.
//!
//! Client mistakes become 4xx (form rejections keep the status axum assigns,
//! so an oversized body is a 413); anything that goes wrong on the backend side
//! becomes a 502, or a 504 when the backend ran out of time. Response bodies
//! are short fixed messages and never include backend output.

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;

/// Errors a relay handler can end with.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required form field was absent.
    #[error("missing form field `{0}`")]
    MissingField(&'static str),

    /// The inbound body was not a readable form.
    #[error("invalid form body: {0}")]
    InvalidForm(#[from] FormRejection),

    /// `myData` did not parse as JSON.
    #[error("form field `myData` is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl RelayError {
    /// Status code sent to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingField(_) | RelayError::Decode(_) => StatusCode::BAD_REQUEST,
            RelayError::InvalidForm(rejection) => rejection.status(),
            RelayError::Backend(BackendError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Body of a non-2xx backend answer, kept for diagnostics only.
    pub fn backend_body(&self) -> Option<&[u8]> {
        match self {
            RelayError::Backend(BackendError::Status { body, .. }) => Some(body.as_ref()),
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            RelayError::MissingField(_) | RelayError::Decode(_) => self.to_string(),
            RelayError::InvalidForm(rejection) => rejection.body_text(),
            RelayError::Backend(BackendError::Timeout(_)) => "Backend timed out".to_string(),
            RelayError::Backend(BackendError::Status { status, .. }) => {
                format!("Backend returned status {}", status.as_u16())
            }
            RelayError::Backend(_) => "Backend unavailable".to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
