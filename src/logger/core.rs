//! The context-bearing logger handed to application code.

use std::fmt;
use std::sync::Arc;

use crate::config::{LogLevel, LoggerConfig};
use crate::context::{mask_sensitive_data, merge_context, normalize_context, LogContext, UserRole};
use crate::engine::{emit, metrics, EventFields};
use crate::format::ErrorInfo;
use crate::logger::factory::LoggerFactory;

/// Immutable logger over (category path, resolved config, base context).
///
/// Every chaining method returns a new logger; the receiver is never
/// modified. Loggers are cheap to clone and hold no resources.
#[derive(Clone)]
pub struct YekoLogger {
    category: Vec<String>,
    config: Arc<LoggerConfig>,
    context: Option<LogContext>,
    factory: LoggerFactory,
}

impl fmt::Debug for YekoLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YekoLogger")
            .field("category", &self.category)
            .field("level", &self.config.level)
            .field("context", &self.context)
            .finish()
    }
}

impl YekoLogger {
    pub(crate) fn new(
        category: Vec<String>,
        config: Arc<LoggerConfig>,
        context: Option<LogContext>,
        factory: LoggerFactory,
    ) -> Self {
        Self {
            category,
            config,
            context,
            factory,
        }
    }

    pub fn category(&self) -> &[String] {
        &self.category
    }

    pub fn context(&self) -> Option<&LogContext> {
        self.context.as_ref()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn debug(&self, message: &str, context: Option<LogContext>) {
        self.log(LogLevel::Debug, message, None, context);
    }

    pub fn info(&self, message: &str, context: Option<LogContext>) {
        self.log(LogLevel::Info, message, None, context);
    }

    pub fn warning(&self, message: &str, context: Option<LogContext>) {
        self.log(LogLevel::Warning, message, None, context);
    }

    pub fn error(&self, message: &str, error: Option<ErrorInfo>, context: Option<LogContext>) {
        self.log(LogLevel::Error, message, error.as_ref(), context);
    }

    /// Written to the sinks as an error-level record.
    pub fn fatal(&self, message: &str, error: Option<ErrorInfo>, context: Option<LogContext>) {
        self.log(LogLevel::Fatal, message, error.as_ref(), context);
    }

    pub fn audit(&self, message: &str, context: Option<LogContext>) {
        let context = context.unwrap_or_default().with_extra("logType", "audit");
        self.log(LogLevel::Info, message, None, Some(context));
    }

    pub fn performance(&self, operation: &str, duration_ms: u64, context: Option<LogContext>) {
        metrics::record_operation_duration(operation, duration_ms);

        let mut context = context.unwrap_or_default().with_extra("logType", "performance");
        context.duration = Some(duration_ms);
        self.log(
            LogLevel::Info,
            &format!("Performance: {operation}"),
            None,
            Some(context),
        );
    }

    pub fn security(&self, event: &str, context: Option<LogContext>) {
        let context = context.unwrap_or_default().with_extra("logType", "security");
        self.log(
            LogLevel::Warning,
            &format!("Security: {event}"),
            None,
            Some(context),
        );
    }

    pub fn with_context(&self, context: LogContext) -> YekoLogger {
        YekoLogger {
            context: merge_context(self.context.as_ref(), Some(&context)),
            ..self.clone()
        }
    }

    pub fn with_user(&self, user_id: impl Into<String>, role: UserRole) -> YekoLogger {
        self.with_context(LogContext {
            user_id: Some(user_id.into()),
            user_role: Some(role),
            ..LogContext::default()
        })
    }

    pub fn with_school(&self, school_id: impl Into<String>) -> YekoLogger {
        self.with_context(LogContext {
            school_id: Some(school_id.into()),
            ..LogContext::default()
        })
    }

    pub fn with_academic_context(
        &self,
        academic_year_id: impl Into<String>,
        semester_id: Option<String>,
    ) -> YekoLogger {
        self.with_context(LogContext {
            academic_year_id: Some(academic_year_id.into()),
            semester_id,
            ..LogContext::default()
        })
    }

    /// Logger for a sub-category; `["app"]` + `["x"]` is `["app", "x"]`.
    pub fn child<C>(&self, category: C) -> YekoLogger
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut path = self.category.clone();
        path.extend(category.into_iter().map(Into::into));
        YekoLogger {
            category: path,
            ..self.clone()
        }
    }

    fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&ErrorInfo>,
        context: Option<LogContext>,
    ) {
        if level < self.config.level {
            return;
        }

        let merged = merge_context(self.config.default_context.as_ref(), self.context.as_ref());
        let merged = merge_context(merged.as_ref(), context.as_ref());
        let masked = mask_sensitive_data(normalize_context(merged.as_ref()).as_ref());

        // Serialization failure degrades to a record without context.
        let context_json = masked.and_then(|c| serde_json::to_string(&c).ok());
        let category_json = serde_json::to_string(&self.category).unwrap_or_default();

        let fields = EventFields {
            message,
            category: &category_json,
            context: context_json.as_deref(),
            error,
        };

        match self.factory.engine() {
            Some(engine) => {
                tracing::dispatcher::with_default(engine.dispatch(), || emit(level, &fields))
            }
            None => emit(level, &fields),
        }
    }
}
