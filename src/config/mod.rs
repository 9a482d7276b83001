//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → push::compile_rules (runtime rules shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, PushConfig, ResourceConfig, RuleConfig, ServerConfig,
    SiteConfig, TimeoutConfig, TlsConfig,
};
pub use validation::{validate_config, ValidationError};
