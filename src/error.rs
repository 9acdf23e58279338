//! Error types for the logging façade.
//!
//! Logging calls themselves are infallible. Errors only surface while loading
//! or validating configuration, before any logger is handed out.

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Errors that can occur while preparing a logging configuration.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid TOML for the schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but failed semantic checks.
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A level name did not match any known level.
    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),

    /// An environment name did not match any known environment.
    #[error("Unknown environment '{0}'")]
    UnknownEnvironment(String),

    /// A sink name did not match any known sink.
    #[error("Unknown sink '{0}'")]
    UnknownSink(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for configuration operations.
pub type LoggingResult<T> = Result<T, LoggingError>;
