//! Server runtime: initialization, domain loggers and request helpers.

use std::sync::LazyLock;
use std::time::Instant;

use uuid::Uuid;

use crate::config::environment::server_environment;
use crate::config::presets::server_config;
use crate::config::ConfigOverride;
use crate::context::LogContext;
use crate::error::LoggingResult;
use crate::format::ErrorInfo;
use crate::instances::resolve_config;
use crate::logger::{LoggerFactory, YekoLogger};

/// Configure the global factory with the server preset for `YEKO_ENV`.
///
/// Call once at startup. Returns `false` if logging was already initialized.
pub fn init_server_logging(overrides: Option<ConfigOverride>) -> LoggingResult<bool> {
    let config = resolve_config(server_config(server_environment()), overrides)?;
    Ok(LoggerFactory::global().configure(config))
}

pub fn create_server_logger<C>(category: C, overrides: Option<&ConfigOverride>) -> YekoLogger
where
    C: IntoIterator,
    C::Item: Into<String>,
{
    LoggerFactory::global().create(category, overrides)
}

pub static APP_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_server_logger(["app"], None));

pub static DATABASE_LOGGER: LazyLock<YekoLogger> =
    LazyLock::new(|| create_server_logger(["database"], None));

pub static AUTH_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_server_logger(["auth"], None));

pub static API_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_server_logger(["api"], None));

pub static PERFORMANCE_LOGGER: LazyLock<YekoLogger> =
    LazyLock::new(|| create_server_logger(["performance"], None));

pub static SECURITY_LOGGER: LazyLock<YekoLogger> =
    LazyLock::new(|| create_server_logger(["security"], None));

pub static AUDIT_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_server_logger(["audit"], None));

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Times one operation and writes a single performance line when ended.
pub struct PerformanceTracker {
    logger: YekoLogger,
    operation: String,
    context: Option<LogContext>,
    start: Instant,
}

impl PerformanceTracker {
    /// Start timing on the server performance logger.
    pub fn start(operation: impl Into<String>, context: Option<LogContext>) -> Self {
        Self::with_logger((*PERFORMANCE_LOGGER).clone(), operation, context)
    }

    pub fn with_logger(logger: YekoLogger, operation: impl Into<String>, context: Option<LogContext>) -> Self {
        Self {
            logger,
            operation: operation.into(),
            context,
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration. Returns it in milliseconds.
    pub fn end(self, additional: Option<LogContext>) -> u64 {
        let duration = elapsed_ms(self.start);
        let context = crate::context::merge_context(self.context.as_ref(), additional.as_ref());
        self.logger.performance(&self.operation, duration, context);
        duration
    }
}

/// Request-scoped logger: one line at start and one at completion.
pub struct RequestLogger {
    logger: YekoLogger,
    request_id: String,
    start: Instant,
}

impl RequestLogger {
    /// Log the start of `method url` on the API logger under a fresh
    /// request id.
    pub fn start(method: &str, url: &str) -> Self {
        Self::with_logger(&API_LOGGER, method, url)
    }

    pub fn with_logger(logger: &YekoLogger, method: &str, url: &str) -> Self {
        let request_id = Uuid::new_v4().to_string();
        let logger = logger.with_context(
            LogContext {
                request_id: Some(request_id.clone()),
                ..LogContext::default()
            }
            .with_extra("method", method)
            .with_extra("url", url),
        );
        logger.info(&format!("Request started: {method} {url}"), None);

        Self {
            logger,
            request_id,
            start: Instant::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The request-scoped logger, for lines logged while handling.
    pub fn logger(&self) -> &YekoLogger {
        &self.logger
    }

    pub fn success(self, status_code: u16, response_size: Option<u64>) {
        let mut context = LogContext {
            duration: Some(elapsed_ms(self.start)),
            ..LogContext::default()
        }
        .with_extra("statusCode", status_code);
        if let Some(size) = response_size {
            context = context.with_extra("responseSize", size);
        }
        self.logger
            .info(&format!("Request completed: {status_code}"), Some(context));
    }

    pub fn error(self, error: ErrorInfo, status_code: Option<u16>) {
        let mut context = LogContext {
            duration: Some(elapsed_ms(self.start)),
            ..LogContext::default()
        };
        if let Some(status) = status_code {
            context = context.with_extra("statusCode", status);
        }
        let message = format!("Request failed: {}", error.message);
        self.logger.error(&message, Some(error), Some(context));
    }
}
