//! Yeko context-scoped structured logging.
//!
//! Category-scoped loggers that carry school, user and request context,
//! mask sensitive fields, and write through a `tracing` based engine to
//! console, structured, file or in-memory sinks.
//!
//! ```no_run
//! use yeko_logger::instances::{init_server_logging, server::APP_LOGGER};
//! use yeko_logger::UserRole;
//!
//! init_server_logging(None)?;
//! APP_LOGGER
//!     .with_school("school-1")
//!     .with_user("u-42", UserRole::Teacher)
//!     .info("Grades published", None);
//! # Ok::<(), yeko_logger::LoggingError>(())
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod instances;
pub mod logger;

pub use config::{ClientHost, ConfigOverride, Environment, LogLevel, LoggerConfig, Runtime, SinkKind};
pub use context::{LogContext, UserRole};
pub use engine::MemorySink;
pub use error::{LoggingError, LoggingResult};
pub use format::{ErrorInfo, LogRecord};
pub use instances::{create_logger, init_logging};
pub use logger::{LoggerFactory, YekoLogger};
