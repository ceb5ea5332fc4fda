//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → RELAY_* environment overrides
//!     → command-line overrides
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Config is fixed at startup; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::BackendConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RelayConfig;
pub use schema::SecurityConfig;
pub use schema::TimeoutConfig;
