//! Configuration schema definitions.
//!
//! This module defines the logger configuration and its partial override
//! form. All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::LogContext;
use crate::error::LoggingError;

/// Root category (tracing target) every façade event is emitted under.
pub const ROOT_CATEGORY: &str = "yeko";

/// Severity of a record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    /// Uppercase name used in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Lowercase name used in structured output.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LoggingError::UnknownLevel(s.to_string())),
        }
    }
}

/// Deployment environment a configuration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(LoggingError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Named output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Human-readable (or structured, when colors are off) lines on stdout.
    Console,
    /// Single-line JSON on stderr for log aggregation.
    Structured,
    /// Single-line JSON appended to `file_path`.
    File,
    /// In-memory buffer, inspected by tests.
    Memory,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "console",
            SinkKind::Structured => "structured",
            SinkKind::File => "file",
            SinkKind::Memory => "memory",
        }
    }
}

impl FromStr for SinkKind {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(SinkKind::Console),
            "structured" => Ok(SinkKind::Structured),
            "file" => Ok(SinkKind::File),
            "memory" => Ok(SinkKind::Memory),
            _ => Err(LoggingError::UnknownSink(s.to_string())),
        }
    }
}

/// Effective logger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level floor; records below it are dropped.
    pub level: LogLevel,

    /// Target environment.
    pub environment: Environment,

    /// Active sinks, in registration order.
    pub sinks: Vec<SinkKind>,

    /// Colored console output.
    pub enable_colors: bool,

    /// Prefer machine-parseable output.
    pub enable_structured_logging: bool,

    /// Context merged into every record.
    pub default_context: Option<LogContext>,

    /// Destination of the file sink.
    pub file_path: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            environment: Environment::Development,
            sinks: vec![SinkKind::Console],
            enable_colors: true,
            enable_structured_logging: false,
            default_context: None,
            file_path: None,
        }
    }
}

impl LoggerConfig {
    /// Shallow overlay: every field set in `overrides` replaces ours.
    pub fn merged(&self, overrides: &ConfigOverride) -> LoggerConfig {
        LoggerConfig {
            level: overrides.level.unwrap_or(self.level),
            environment: overrides.environment.unwrap_or(self.environment),
            sinks: overrides.sinks.clone().unwrap_or_else(|| self.sinks.clone()),
            enable_colors: overrides.enable_colors.unwrap_or(self.enable_colors),
            enable_structured_logging: overrides
                .enable_structured_logging
                .unwrap_or(self.enable_structured_logging),
            default_context: overrides
                .default_context
                .clone()
                .or_else(|| self.default_context.clone()),
            file_path: overrides.file_path.clone().or_else(|| self.file_path.clone()),
        }
    }

    pub fn has_sink(&self, kind: SinkKind) -> bool {
        self.sinks.contains(&kind)
    }
}

/// Partial configuration, used for overrides and config files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigOverride {
    pub level: Option<LogLevel>,
    pub environment: Option<Environment>,
    pub sinks: Option<Vec<SinkKind>>,
    pub enable_colors: Option<bool>,
    pub enable_structured_logging: Option<bool>,
    pub default_context: Option<LogContext>,
    pub file_path: Option<PathBuf>,
}

impl ConfigOverride {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_sinks(mut self, sinks: Vec<SinkKind>) -> Self {
        self.sinks = Some(sinks);
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_default_context(mut self, context: LogContext) -> Self {
        self.default_context = Some(context);
        self
    }

    /// Layer `other` on top of `self`, `other` winning.
    pub fn and(mut self, other: ConfigOverride) -> Self {
        self.level = other.level.or(self.level);
        self.environment = other.environment.or(self.environment);
        self.sinks = other.sinks.or(self.sinks);
        self.enable_colors = other.enable_colors.or(self.enable_colors);
        self.enable_structured_logging = other
            .enable_structured_logging
            .or(self.enable_structured_logging);
        self.default_context = other.default_context.or(self.default_context);
        self.file_path = other.file_path.or(self.file_path);
        self
    }
}
