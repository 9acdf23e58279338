//! Logging metrics.
//!
//! # Metrics
//! - `yeko_log_records_total` (counter): records accepted by the engine, by level
//! - `yeko_operation_duration_ms` (histogram): durations reported through
//!   `YekoLogger::performance`, by operation
//!
//! Without an installed recorder these calls are no-ops.

use crate::config::LogLevel;

pub fn record_log(level: LogLevel) {
    ::metrics::counter!("yeko_log_records_total", "level" => level.name()).increment(1);
}

pub fn record_operation_duration(operation: &str, duration_ms: u64) {
    ::metrics::histogram!("yeko_operation_duration_ms", "operation" => operation.to_string())
        .record(duration_ms as f64);
}
