//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → builder.rs (register routes against a HandlerRegistry)
//!     → Router
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → HTTP front end rebuilds the Router
//!     → atomic swap of the served route table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod builder;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use builder::build_router;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig, RouterSettings,
};
