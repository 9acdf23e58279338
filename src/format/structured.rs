//! JSON renderings of a record: plain, single-line, audit and performance.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::config::LogLevel;
use crate::context::mask_sensitive_data;
use crate::format::record::LogRecord;

/// Service tag stamped on every structured record.
pub const SERVICE_NAME: &str = "yeko";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn json_formatter(record: &LogRecord) -> Value {
    let mut object = Map::new();
    object.insert("timestamp".into(), json!(record.iso_timestamp()));
    object.insert("level".into(), json!(record.level.name()));
    object.insert("message".into(), json!(record.message));
    object.insert("service".into(), json!(SERVICE_NAME));
    if !record.category.is_empty() {
        object.insert("category".into(), json!(record.category_path()));
    }

    if let Some(context) = mask_sensitive_data(record.context.as_ref()) {
        if let Ok(value) = serde_json::to_value(&context) {
            object.insert("context".into(), value);
        }
    }

    if let Some(error) = &record.error {
        object.insert(
            "error".into(),
            json!({
                "name": error.name,
                "message": error.message,
                "stack": error.stack,
            }),
        );
    }

    if let Some(metadata) = &record.metadata {
        object.insert("metadata".into(), Value::Object(metadata.clone()));
    }

    Value::Object(object)
}

/// `json_formatter` output as a single line.
pub fn structured_formatter(record: &LogRecord) -> String {
    json_formatter(record).to_string()
}

pub fn audit_formatter(record: &LogRecord) -> Value {
    let mut value = json_formatter(record);
    if let Value::Object(object) = &mut value {
        let priority = match record.level {
            LogLevel::Error | LogLevel::Fatal => "high",
            _ => "medium",
        };
        object.insert("logType".into(), json!("audit"));
        object.insert(
            "timestamp".into(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        object.insert("category".into(), json!("security"));
        object.insert("priority".into(), json!(priority));
    }
    value
}

pub fn performance_formatter(record: &LogRecord) -> Value {
    let mut value = json_formatter(record);
    if let Value::Object(object) = &mut value {
        let context = record.context.as_ref();
        let duration = context.and_then(|c| c.duration);
        let memory_mb = context
            .and_then(|c| c.memory_usage)
            .map(|bytes| (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0);

        object.insert("logType".into(), json!("performance"));
        object.insert("category".into(), json!("metrics"));
        object.insert("durationMs".into(), json!(duration));
        object.insert("memoryUsageMB".into(), json!(memory_mb));
    }
    value
}
