//! The per-call log record handed to formatters and sinks.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::LogLevel;
use crate::context::LogContext;

/// Description of an error attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub name: String,
    pub message: String,
    /// Rendered `source()` chain, outermost cause first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Capture an error, its type name and its cause chain.
    ///
    /// Behind `Box`/`Arc` or a trait object the static type says nothing,
    /// so the name comes from the head of the `Debug` output instead. Use
    /// [`ErrorInfo::with_name`] when neither is good enough.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: error_name(error),
            message: error.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

impl<E: std::error::Error + ?Sized> From<&E> for ErrorInfo {
    fn from(error: &E) -> Self {
        ErrorInfo::from_error(error)
    }
}

fn error_name<E: std::error::Error + ?Sized>(error: &E) -> String {
    let full = std::any::type_name::<E>();
    let short = short_type_name(full);
    if !full.starts_with("dyn ") && !matches!(short, "Box" | "Arc" | "Rc") {
        return short.to_string();
    }

    let debug = format!("{error:?}");
    let head: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if head.is_empty() || head.starts_with(|c: char| c.is_ascii_digit()) {
        "Error".to_string()
    } else {
        head
    }
}

fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// A single log event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub message: String,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub category: Vec<String>,
    pub context: Option<LogContext>,
    pub error: Option<ErrorInfo>,
    pub metadata: Option<Map<String, Value>>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Utc::now(),
            category: Vec::new(),
            context: None,
            error: None,
            metadata: None,
        }
    }

    pub fn with_category(mut self, category: Vec<String>) -> Self {
        self.category = category;
        self
    }

    pub fn with_context(mut self, context: Option<LogContext>) -> Self {
        self.context = context;
        self
    }

    pub fn with_error(mut self, error: Option<ErrorInfo>) -> Self {
        self.error = error;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Map<String, Value>>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Dotted category path, e.g. `app.grades`.
    pub fn category_path(&self) -> String {
        self.category.join(".")
    }

    /// ISO-8601 timestamp with millisecond precision.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
