//! Tracing layer that turns façade events into records and fans them out.
//!
//! # Responsibilities
//! - Emit façade events onto `tracing` under the root target
//! - Accept only root-target events at or above the level floor
//! - Rebuild a `LogRecord` from the event fields
//! - Hand the record to every sink, in registration order
//!
//! # Design Decisions
//! - `tracing` has no fatal level: fatal is emitted as ERROR, so fatal and
//!   error reach the sinks identically
//! - Context travels as a JSON string field and is decoded field by field:
//!   a mistyped field is passed through as an extension field, only
//!   unreadable JSON drops the context

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::field::{Field, Visit};
use tracing::subscriber::Interest;
use tracing::{Dispatch, Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::config::{LogLevel, ROOT_CATEGORY};
use crate::context::LogContext;
use crate::engine::metrics;
use crate::engine::sinks::Sink;
use crate::format::{ErrorInfo, LogRecord};

const FIELD_MESSAGE: &str = "message";
const FIELD_CATEGORY: &str = "category";
const FIELD_CONTEXT: &str = "context";
const FIELD_ERROR_NAME: &str = "error_name";
const FIELD_ERROR_MESSAGE: &str = "error_message";
const FIELD_ERROR_STACK: &str = "error_stack";

/// Engine level for a tracing level. TRACE folds into debug.
pub fn level_from_tracing(level: Level) -> LogLevel {
    if level == Level::ERROR {
        LogLevel::Error
    } else if level == Level::WARN {
        LogLevel::Warning
    } else if level == Level::INFO {
        LogLevel::Info
    } else {
        LogLevel::Debug
    }
}

/// Tracing level a façade level is emitted at.
pub fn level_to_tracing(level: LogLevel) -> Level {
    match level {
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warning => Level::WARN,
        LogLevel::Error | LogLevel::Fatal => Level::ERROR,
    }
}

/// Whether an event at the tracing `level` passes the `floor`.
///
/// Compared in tracing levels: a fatal floor admits ERROR events, which is
/// where fatal records travel.
pub fn floor_admits(floor: LogLevel, level: Level) -> bool {
    level <= level_to_tracing(floor)
}

/// Fields of one façade event.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFields<'a> {
    pub message: &'a str,
    /// JSON array of category segments.
    pub category: &'a str,
    /// JSON object of the (already masked) context.
    pub context: Option<&'a str>,
    pub error: Option<&'a ErrorInfo>,
}

macro_rules! emit_at {
    ($level:expr, $fields:expr) => {
        tracing::event!(
            target: ROOT_CATEGORY,
            $level,
            category = $fields.category,
            context = $fields.context,
            error_name = $fields.error.map(|e| e.name.as_str()),
            error_message = $fields.error.map(|e| e.message.as_str()),
            error_stack = $fields.error.and_then(|e| e.stack.as_deref()),
            "{}",
            $fields.message
        )
    };
}

/// Emit a façade event on the current dispatcher.
pub fn emit(level: LogLevel, fields: &EventFields<'_>) {
    match level {
        LogLevel::Debug => emit_at!(Level::DEBUG, fields),
        LogLevel::Info => emit_at!(Level::INFO, fields),
        LogLevel::Warning => emit_at!(Level::WARN, fields),
        LogLevel::Error | LogLevel::Fatal => emit_at!(Level::ERROR, fields),
    }
}

/// The logging engine: a level-floored fan-out to sinks.
pub struct LogEngine {
    level: LogLevel,
    sinks: Vec<Arc<dyn Sink>>,
}

impl LogEngine {
    pub fn new(level: LogLevel, sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { level, sinks }
    }

    fn accepts(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event()
            && metadata.target() == ROOT_CATEGORY
            && floor_admits(self.level, *metadata.level())
    }

    /// Wrap the engine in a registry and return a dispatcher for it.
    pub fn into_dispatch(self) -> Dispatch {
        Dispatch::new(tracing_subscriber::registry().with(self))
    }
}

impl<S: Subscriber> Layer<S> for LogEngine {
    // Several engines can be live at once with different floors, so the
    // level check is left to `enabled` on every call.
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if metadata.is_event() && metadata.target() == ROOT_CATEGORY {
            Interest::sometimes()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.accepts(metadata)
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.accepts(event.metadata()) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let record = visitor.into_record(level_from_tracing(*event.metadata().level()));

        metrics::record_log(record.level);
        for sink in &self.sinks {
            sink.write(&record);
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    category: Option<String>,
    context: Option<String>,
    error_name: Option<String>,
    error_message: Option<String>,
    error_stack: Option<String>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn into_record(self, level: LogLevel) -> LogRecord {
        let category = self
            .category
            .map(|raw| {
                serde_json::from_str::<Vec<String>>(&raw)
                    .unwrap_or_else(|_| raw.split('.').map(str::to_string).collect())
            })
            .unwrap_or_default();

        let mut context = self
            .context
            .and_then(|raw| serde_json::from_str::<Map<String, Value>>(&raw).ok())
            .map(LogContext::from_json_map);
        if !self.fields.is_empty() {
            let target = context.get_or_insert_with(LogContext::default);
            for (key, value) in self.fields {
                target.extra.insert(key, value);
            }
        }
        let metadata = context.as_mut().and_then(|c| c.metadata.take());
        let context = context.filter(|c| !c.is_empty());

        let error = self.error_message.map(|message| ErrorInfo {
            name: self.error_name.unwrap_or_else(|| "Error".to_string()),
            message,
            stack: self.error_stack,
        });

        LogRecord::new(level, self.message.unwrap_or_default())
            .with_category(category)
            .with_context(context)
            .with_error(error)
            .with_metadata(metadata)
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            FIELD_MESSAGE => &mut self.message,
            FIELD_CATEGORY => &mut self.category,
            FIELD_CONTEXT => &mut self.context,
            FIELD_ERROR_NAME => &mut self.error_name,
            FIELD_ERROR_MESSAGE => &mut self.error_message,
            FIELD_ERROR_STACK => &mut self.error_stack,
            other => {
                self.fields.insert(other.to_string(), json!(value));
                return;
            }
        };
        *slot = Some(value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sinks::MemorySink;

    fn engine(level: LogLevel) -> (Dispatch, MemorySink) {
        let memory = MemorySink::new();
        let dispatch = LogEngine::new(level, vec![Arc::new(memory.clone())]).into_dispatch();
        (dispatch, memory)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_to_tracing(LogLevel::Fatal), Level::ERROR);
        assert_eq!(level_to_tracing(LogLevel::Warning), Level::WARN);
        assert_eq!(level_from_tracing(Level::TRACE), LogLevel::Debug);
        assert_eq!(level_from_tracing(Level::WARN), LogLevel::Warning);
    }

    #[test]
    fn test_event_becomes_record() {
        let (dispatch, memory) = engine(LogLevel::Debug);
        let error = ErrorInfo::new("QueryFailed", "query failed").with_stack("caused by: timeout");

        tracing::dispatcher::with_default(&dispatch, || {
            emit(
                LogLevel::Warning,
                &EventFields {
                    message: "grades import slow",
                    category: r#"["app","grades"]"#,
                    context: Some(r#"{"schoolId":"s1","metadata":{"rows":3}}"#),
                    error: Some(&error),
                },
            );
        });

        let records = memory.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level, LogLevel::Warning);
        assert_eq!(record.message, "grades import slow");
        assert_eq!(record.category, vec!["app", "grades"]);
        assert_eq!(
            record.context.as_ref().and_then(|c| c.school_id.as_deref()),
            Some("s1")
        );
        assert_eq!(record.metadata.as_ref().and_then(|m| m.get("rows")), Some(&json!(3)));
        assert_eq!(record.error.as_ref(), Some(&error));
    }

    #[test]
    fn test_level_floor() {
        let (dispatch, memory) = engine(LogLevel::Warning);
        tracing::dispatcher::with_default(&dispatch, || {
            emit(LogLevel::Info, &EventFields { message: "dropped", category: "[]", ..Default::default() });
            emit(LogLevel::Error, &EventFields { message: "kept", category: "[]", ..Default::default() });
        });

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "kept");
    }

    #[test]
    fn test_fatal_is_written_as_error() {
        let (dispatch, memory) = engine(LogLevel::Debug);
        tracing::dispatcher::with_default(&dispatch, || {
            emit(LogLevel::Fatal, &EventFields { message: "down", category: "[]", ..Default::default() });
        });
        assert_eq!(memory.records()[0].level, LogLevel::Error);
    }

    #[test]
    fn test_fatal_floor_keeps_fatal_records() {
        let (dispatch, memory) = engine(LogLevel::Fatal);
        tracing::dispatcher::with_default(&dispatch, || {
            emit(LogLevel::Warning, &EventFields { message: "dropped", category: "[]", ..Default::default() });
            emit(LogLevel::Fatal, &EventFields { message: "disk gone", category: "[]", ..Default::default() });
        });

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "disk gone");
    }

    #[test]
    fn test_floor_admits() {
        assert!(floor_admits(LogLevel::Fatal, Level::ERROR));
        assert!(!floor_admits(LogLevel::Fatal, Level::WARN));
        assert!(floor_admits(LogLevel::Info, Level::INFO));
        assert!(!floor_admits(LogLevel::Info, Level::DEBUG));
        assert!(!floor_admits(LogLevel::Debug, Level::TRACE));
    }

    #[test]
    fn test_mistyped_context_field_keeps_other_fields() {
        let (dispatch, memory) = engine(LogLevel::Debug);
        tracing::dispatcher::with_default(&dispatch, || {
            emit(
                LogLevel::Info,
                &EventFields {
                    message: "x",
                    category: "[]",
                    context: Some(r#"{"schoolId":"s1","duration":"fast"}"#),
                    error: None,
                },
            );
        });

        let context = memory.records()[0].context.clone().unwrap();
        assert_eq!(context.school_id.as_deref(), Some("s1"));
        assert_eq!(context.extra("duration"), Some(&json!("fast")));
    }

    #[test]
    fn test_foreign_targets_are_ignored() {
        let (dispatch, memory) = engine(LogLevel::Debug);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::error!(target: "hyper", "not ours");
        });
        assert!(memory.is_empty());
    }

    #[test]
    fn test_direct_tracing_fields_land_in_context() {
        let (dispatch, memory) = engine(LogLevel::Debug);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!(target: "yeko", rows = 12u64, "imported");
        });

        let record = &memory.records()[0];
        assert_eq!(record.message, "imported");
        assert_eq!(
            record.context.as_ref().and_then(|c| c.extra("rows")),
            Some(&json!(12))
        );
    }

    #[test]
    fn test_unreadable_context_is_dropped() {
        let (dispatch, memory) = engine(LogLevel::Debug);
        tracing::dispatcher::with_default(&dispatch, || {
            emit(
                LogLevel::Info,
                &EventFields { message: "x", category: "app", context: Some("{not json"), error: None },
            );
        });

        let record = &memory.records()[0];
        assert!(record.context.is_none());
        assert_eq!(record.category, vec!["app"]);
    }
}
