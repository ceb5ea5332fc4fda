//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign/propagate request ID)
//!     → handlers.rs (build backend request, relay result)
//!     → error.rs (map failures to 4xx/5xx)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::RelayError;
pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
