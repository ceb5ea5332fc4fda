//! Canvas relay service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                 ┌──────────────────────────────────────┐
//!     ──────────────────────▶ │  http::server (axum + tower-http)    │
//!     GET  /canvas            │      │                               │
//!     POST /draw  (myData)    │      ▼                               │
//!                             │  http::handlers ──▶ backend::client ─┼──▶ canvas backend
//!     ◀────────────────────── │      │                               │    /api/grid
//!     bytes | 302 /dashboard/ │      ▼                               │    /api/draw
//!                             │  http::error (4xx / 502 / 504)       │
//!                             └──────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use canvas_relay::config::{load_config, ConfigOverrides};
use canvas_relay::lifecycle::startup;
use canvas_relay::observability::logging;

#[derive(Parser)]
#[command(name = "canvas-relay")]
#[command(about = "Relays canvas reads and draw submissions to the canvas backend", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides RELAY_BACKEND_URL and the config file).
    #[arg(long)]
    backend_url: Option<String>,

    /// Listen address (overrides RELAY_BIND_ADDRESS and the config file).
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        backend_url: cli.backend_url,
        bind_address: cli.bind,
    };

    let config = load_config(cli.config.as_deref(), &overrides)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "canvas-relay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        backend_request_timeout_secs = config.timeouts.backend_request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
