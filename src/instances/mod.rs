//! Ready-to-use entrypoints for server and client runtimes.
//!
//! # Data Flow
//! ```text
//! init_logging(runtime)
//!     → preset for (runtime, environment)
//!     → caller override, then YEKO_LOG_LEVEL
//!     → validate → LoggerFactory::global().configure
//! ```
//!
//! Pre-built domain loggers are lazily created statics bound to the global
//! factory; they start writing as soon as initialization lands.

pub mod client;
pub mod server;

use crate::config::loader::env_override;
use crate::config::validation::validate_config;
use crate::config::{ClientHost, ConfigOverride, LoggerConfig, Runtime};
use crate::error::{LoggingError, LoggingResult};
use crate::logger::YekoLogger;

pub use client::{
    create_client_logger, init_client_logging, setup_global_error_handling, ApiClientLogger,
    ClientPerformanceTracker, UserInteractionLogger,
};
pub use server::{create_server_logger, init_server_logging, PerformanceTracker, RequestLogger};

/// Lay the caller's override and the environment override over `base`,
/// then validate.
fn resolve_config(base: LoggerConfig, overrides: Option<ConfigOverride>) -> LoggingResult<LoggerConfig> {
    let overrides = overrides.unwrap_or_default().and(env_override()?);
    let config = base.merged(&overrides);
    validate_config(&config).map_err(LoggingError::Validation)?;
    Ok(config)
}

/// Initialize the global factory for `runtime`.
///
/// `host` only matters for the client runtime; without one the client is
/// treated as development. Returns `false` when logging was already
/// initialized.
pub fn init_logging(
    runtime: Runtime,
    host: Option<&ClientHost>,
    overrides: Option<ConfigOverride>,
) -> LoggingResult<bool> {
    match runtime {
        Runtime::Server => init_server_logging(overrides),
        Runtime::Client => {
            let fallback = ClientHost::default();
            init_client_logging(host.unwrap_or(&fallback), overrides)
        }
    }
}

pub fn create_logger<C>(runtime: Runtime, category: C, overrides: Option<&ConfigOverride>) -> YekoLogger
where
    C: IntoIterator,
    C::Item: Into<String>,
{
    match runtime {
        Runtime::Server => create_server_logger(category, overrides),
        Runtime::Client => create_client_logger(category, overrides),
    }
}
