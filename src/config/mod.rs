//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! runtime tag + environment (YEKO_ENV / client host)
//!     → environment.rs (pick Environment)
//!     → presets.rs (server_config / client_config)
//!     → optional TOML file via loader.rs, YEKO_LOG_LEVEL override
//!     → validation.rs (semantic checks)
//!     → LoggerConfig, frozen into the factory on first configure
//! ```
//!
//! # Design Decisions
//! - Config is immutable once configured; the engine is never rebuilt
//! - All fields have defaults to allow minimal config files
//! - Overrides are shallow: a set field replaces the whole value

pub mod environment;
pub mod loader;
pub mod presets;
pub mod schema;
pub mod validation;

pub use environment::{ClientHost, Runtime};
pub use schema::{ConfigOverride, Environment, LogLevel, LoggerConfig, SinkKind, ROOT_CATEGORY};
