//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every selected sink can actually be built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs when a config file is loaded; `configure` itself never rejects a
//!   config and instead skips sinks it cannot build

use std::fmt;

use crate::config::schema::{LoggerConfig, SinkKind};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No sink selected; every record would be dropped.
    NoSinks,
    /// The same sink is listed more than once.
    DuplicateSink(SinkKind),
    /// The file sink is selected without a `file_path`.
    MissingFilePath,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoSinks => write!(f, "at least one sink is required"),
            ValidationError::DuplicateSink(kind) => {
                write!(f, "sink '{}' is listed more than once", kind.as_str())
            }
            ValidationError::MissingFilePath => {
                write!(f, "the file sink requires file_path to be set")
            }
        }
    }
}

/// Check a resolved configuration.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sinks.is_empty() {
        errors.push(ValidationError::NoSinks);
    }

    let mut seen = Vec::with_capacity(config.sinks.len());
    for kind in &config.sinks {
        if seen.contains(kind) {
            if !errors.contains(&ValidationError::DuplicateSink(*kind)) {
                errors.push(ValidationError::DuplicateSink(*kind));
            }
        } else {
            seen.push(*kind);
        }
    }

    if config.has_sink(SinkKind::File) && config.file_path.is_none() {
        errors.push(ValidationError::MissingFilePath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
