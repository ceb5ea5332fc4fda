//! Outbound side of the relay.
//!
//! # Data Flow
//! ```text
//! relay handler
//!     → client.rs (resolve endpoint, attach request ID, enforce timeouts)
//!     → canvas backend (/api/grid, /api/draw)
//!     → Bytes or BackendError back to the handler
//! ```

pub mod client;

pub use client::{BackendClient, BackendError, DRAW_PATH, GRID_PATH};
