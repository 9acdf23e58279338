//! Client runtime: initialization, domain loggers, interaction helpers and
//! the global panic hook.

use std::any::Any;
use std::panic::Location;
use std::sync::{LazyLock, Once};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};

use crate::config::presets::client_config;
use crate::config::{ClientHost, ConfigOverride};
use crate::context::{merge_context, LogContext, UserRole};
use crate::error::LoggingResult;
use crate::format::ErrorInfo;
use crate::instances::resolve_config;
use crate::logger::{LoggerFactory, YekoLogger};

const REQUEST_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const REQUEST_ID_SUFFIX_LEN: usize = 9;

/// Configure the global factory with the client preset for `host`.
///
/// Returns `false` if logging was already initialized.
pub fn init_client_logging(host: &ClientHost, overrides: Option<ConfigOverride>) -> LoggingResult<bool> {
    let config = resolve_config(client_config(host.environment()), overrides)?;
    Ok(LoggerFactory::global().configure(config))
}

pub fn create_client_logger<C>(category: C, overrides: Option<&ConfigOverride>) -> YekoLogger
where
    C: IntoIterator,
    C::Item: Into<String>,
{
    LoggerFactory::global().create(category, overrides)
}

pub static APP_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_client_logger(["app"], None));

pub static UI_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_client_logger(["ui"], None));

pub static API_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_client_logger(["api"], None));

pub static PERFORMANCE_LOGGER: LazyLock<YekoLogger> =
    LazyLock::new(|| create_client_logger(["performance"], None));

pub static ERROR_LOGGER: LazyLock<YekoLogger> = LazyLock::new(|| create_client_logger(["error"], None));

pub static USER_ACTION_LOGGER: LazyLock<YekoLogger> =
    LazyLock::new(|| create_client_logger(["user-action"], None));

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// `client_<epoch millis>_<9 base36 chars>`.
fn client_request_id() -> String {
    let suffix: String = (0..REQUEST_ID_SUFFIX_LEN)
        .map(|_| REQUEST_ID_ALPHABET[fastrand::usize(..REQUEST_ID_ALPHABET.len())] as char)
        .collect();
    format!("client_{}_{}", Utc::now().timestamp_millis(), suffix)
}

pub struct ClientPerformanceTracker {
    logger: YekoLogger,
    operation: String,
    context: Option<LogContext>,
    start: Instant,
}

impl ClientPerformanceTracker {
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

    pub fn end(self, additional: Option<LogContext>) -> u64 {
        let duration = elapsed_ms(self.start);
        let context = merge_context(self.context.as_ref(), additional.as_ref());
        self.logger.performance(&self.operation, duration, context);
        duration
    }
}

/// User interaction lines on the user-action logger.
pub struct UserInteractionLogger {
    logger: YekoLogger,
    base: LogContext,
}

impl UserInteractionLogger {
    pub fn new(user_id: Option<String>, user_role: Option<UserRole>) -> Self {
        Self::with_logger((*USER_ACTION_LOGGER).clone(), user_id, user_role)
    }

    pub fn with_logger(logger: YekoLogger, user_id: Option<String>, user_role: Option<UserRole>) -> Self {
        let base = LogContext {
            user_id,
            user_role,
            ..LogContext::default()
        }
        .with_extra(
            "timestamp",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        Self { logger, base }
    }

    fn context(&self, call: LogContext, additional: Option<LogContext>) -> Option<LogContext> {
        let merged = self.base.overlay(&call);
        merge_context(Some(&merged), additional.as_ref())
    }

    pub fn log_action(&self, action: &str, element: Option<&str>, additional: Option<LogContext>) {
        let mut call = LogContext::new().with_extra("action", action);
        if let Some(element) = element {
            call = call.with_extra("element", element);
        }
        self.logger
            .info(&format!("User action: {action}"), self.context(call, additional));
    }

    pub fn log_navigation(&self, from: &str, to: &str) {
        let call = LogContext::new()
            .with_extra("navigation", true)
            .with_extra("from", from)
            .with_extra("to", to);
        self.logger
            .info(&format!("Navigation: {from} → {to}"), self.context(call, None));
    }

    pub fn log_form_submission(&self, form_name: &str, fields: Option<&[&str]>) {
        let mut call = LogContext::new()
            .with_extra("formSubmission", true)
            .with_extra("formName", form_name);
        if let Some(fields) = fields {
            call = call.with_extra("fieldCount", fields.len());
        }
        self.logger
            .info(&format!("Form submitted: {form_name}"), self.context(call, None));
    }

    pub fn log_error(&self, error: ErrorInfo, user_context: Option<&str>) {
        let mut call = LogContext::new();
        if let Some(user_context) = user_context {
            call = call.with_extra("userContext", user_context);
        }
        let message = format!("User encountered error: {}", error.message);
        self.logger
            .error(&message, Some(error), self.context(call, None));
    }

    /// Same logger, new user identity.
    pub fn with_user(&self, user_id: impl Into<String>, user_role: UserRole) -> Self {
        Self::with_logger(self.logger.clone(), Some(user_id.into()), Some(user_role))
    }
}

/// Client-side API call: one line at start and one at completion.
pub struct ApiClientLogger {
    logger: YekoLogger,
    request_id: String,
    start: Instant,
}

impl ApiClientLogger {
    pub fn start(method: &str, url: &str) -> Self {
        Self::with_logger(&API_LOGGER, method, url)
    }

    pub fn with_logger(logger: &YekoLogger, method: &str, url: &str) -> Self {
        let request_id = client_request_id();
        let logger = logger.with_context(
            LogContext {
                request_id: Some(request_id.clone()),
                ..LogContext::default()
            }
            .with_extra("method", method)
            .with_extra("url", url)
            .with_extra("client", true),
        );
        logger.info(&format!("API request started: {method} {url}"), None);

        Self {
            logger,
            request_id,
            start: Instant::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
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
            .info(&format!("API request completed: {status_code}"), Some(context));
    }

    pub fn error(self, error: ErrorInfo, status_code: Option<u16>) {
        let mut context = LogContext {
            duration: Some(elapsed_ms(self.start)),
            ..LogContext::default()
        };
        if let Some(status) = status_code {
            context = context.with_extra("statusCode", status);
        }
        let message = format!("API request failed: {}", error.message);
        self.logger.error(&message, Some(error), Some(context));
    }
}

static PANIC_HOOK: Once = Once::new();

/// Forward uncaught panics to the error logger.
///
/// Installed at most once per process; the previously installed hook still
/// runs afterwards. There is no way to remove it.
pub fn setup_global_error_handling() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            report_panic(&ERROR_LOGGER, &panic_message(info.payload()), info.location());
            previous(info);
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

fn report_panic(logger: &YekoLogger, message: &str, location: Option<&Location<'_>>) {
    let mut context = LogContext::new().with_extra("type", "uncaught-error");
    if let Some(location) = location {
        context = context
            .with_extra("filename", location.file())
            .with_extra("lineno", location.line())
            .with_extra("colno", location.column());
    }
    logger.error(
        "Uncaught error",
        Some(ErrorInfo::new("Panic", message)),
        Some(context),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, LoggerConfig, SinkKind};
    use crate::engine::MemorySink;
    use serde_json::json;

    fn memory_logger(category: &str) -> (YekoLogger, MemorySink) {
        let factory = LoggerFactory::new();
        factory.configure(LoggerConfig {
            level: LogLevel::Debug,
            sinks: vec![SinkKind::Memory],
            ..LoggerConfig::default()
        });
        let memory = factory.memory_sink().unwrap();
        (factory.create([category], None), memory)
    }

    #[test]
    fn test_client_request_id_shape() {
        let id = client_request_id();
        let parts: Vec<_> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "client");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), REQUEST_ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| REQUEST_ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_api_client_logger_lifecycle() {
        let (logger, memory) = memory_logger("api");
        let call = ApiClientLogger::with_logger(&logger, "GET", "/api/classes");
        let request_id = call.request_id().to_string();
        call.error(ErrorInfo::new("HttpError", "timeout"), None);

        let records = memory.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "API request started: GET /api/classes");
        assert_eq!(records[1].message, "API request failed: timeout");
        assert_eq!(records[1].level, LogLevel::Error);

        let context = records[1].context.as_ref().unwrap();
        assert_eq!(context.request_id.as_deref(), Some(request_id.as_str()));
        assert_eq!(context.extra("client"), Some(&json!(true)));
        assert!(context.extra("statusCode").is_none());
    }

    #[test]
    fn test_user_interaction_logger() {
        let (logger, memory) = memory_logger("user-action");
        let interactions = UserInteractionLogger::with_logger(logger, None, None);
        let parent = interactions.with_user("p1", UserRole::Parent);

        parent.log_action("open-report", Some("button#report"), None);
        parent.log_navigation("/home", "/grades");
        parent.log_form_submission("absence", Some(&["date", "reason"][..]));
        interactions.log_error(ErrorInfo::new("ValidationError", "date required"), Some("absence form"));

        let records = memory.records();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].message, "User action: open-report");
        let first = records[0].context.as_ref().unwrap();
        assert_eq!(first.user_id.as_deref(), Some("p1"));
        assert_eq!(first.user_role, Some(UserRole::Parent));
        assert_eq!(first.extra("element"), Some(&json!("button#report")));
        assert!(first.extra("timestamp").is_some());

        assert_eq!(records[1].message, "Navigation: /home → /grades");
        assert_eq!(
            records[2].context.as_ref().and_then(|c| c.extra("fieldCount")),
            Some(&json!(2))
        );

        assert_eq!(records[3].message, "User encountered error: date required");
        let last = records[3].context.as_ref().unwrap();
        assert!(last.user_id.is_none());
        assert_eq!(last.extra("userContext"), Some(&json!("absence form")));
    }

    #[test]
    fn test_client_performance_tracker() {
        let (logger, memory) = memory_logger("performance");
        ClientPerformanceTracker::with_logger(logger, "render-timetable", None).end(None);

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Performance: render-timetable");
    }

    #[test]
    fn test_report_panic() {
        let (logger, memory) = memory_logger("error");
        report_panic(&logger, "index out of bounds", Some(Location::caller()));

        let record = &memory.records()[0];
        assert_eq!(record.message, "Uncaught error");
        assert_eq!(record.error.as_ref().map(|e| e.message.as_str()), Some("index out of bounds"));

        let context = record.context.as_ref().unwrap();
        assert_eq!(context.extra("type"), Some(&json!("uncaught-error")));
        assert!(context.extra("filename").is_some());
        assert!(context.extra("lineno").is_some());
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");

        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "panic");
    }
}
