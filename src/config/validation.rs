//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend base URL is usable as a prefix for endpoint paths
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep the backend timeout inside the inbound one
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single violated configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("backend.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("backend.base_url '{0}' must not carry a query or fragment")]
    BackendUrlSuffix(String),

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "timeouts.backend_request_secs ({backend}) must be less than timeouts.inbound_secs ({inbound})"
    )]
    BackendTimeoutNotBelowInbound { backend: u64, inbound: u64 },

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check every semantic rule, collecting all violations.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_backend_url(&config.backend.base_url, &mut errors);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let timeouts = [
        ("backend_connect_secs", config.timeouts.backend_connect_secs),
        ("backend_request_secs", config.timeouts.backend_request_secs),
        ("inbound_secs", config.timeouts.inbound_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    // Outbound deadline expires before the inbound one, so backend timeouts surface as 504.
    let backend = config.timeouts.backend_request_secs;
    let inbound = config.timeouts.inbound_secs;
    if backend > 0 && inbound > 0 && backend >= inbound {
        errors.push(ValidationError::BackendTimeoutNotBelowInbound { backend, inbound });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_backend_url(raw: &str, errors: &mut Vec<ValidationError>) {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::InvalidBackendUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            });
            return;
        }
    };

    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        errors.push(ValidationError::UnsupportedScheme(raw.to_string()));
    }

    if url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::BackendUrlSuffix(raw.to_string()));
    }
}
