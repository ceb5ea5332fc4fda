//! Canvas relay library.
//!
//! A stateless HTTP relay in front of the canvas backend: `GET /canvas`
//! passes the grid bytes through, `POST /draw` forwards the `myData` form
//! field as JSON and redirects to the dashboard.

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use backend::BackendClient;
pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
