//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProtectionConfig (validated, immutable)
//!     → cloned into each TimeoutProtected client
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BudgetExpiry, ObservabilityConfig, PollingConfig, ProtectionConfig, TransportConfig};
pub use validation::{validate_config, ValidationError};
