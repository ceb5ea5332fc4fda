//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the backend client produce:
//!     → logging.rs (structured log events, request_id on every span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (human-readable or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the inbound span into backend calls
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
