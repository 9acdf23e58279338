//! Colored single-record console rendering.

use crate::config::LogLevel;
use crate::context::LogContext;
use crate::format::record::LogRecord;

pub const RESET: &str = "\x1b[0m";

/// ANSI color for a level.
pub fn level_color(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "\x1b[36m",
        LogLevel::Info => "\x1b[32m",
        LogLevel::Warning => "\x1b[33m",
        LogLevel::Error => "\x1b[31m",
        LogLevel::Fatal => "\x1b[35m",
    }
}

/// `key:value` pairs for the fields worth showing on a console line, in
/// display order. Other context fields are not rendered here.
fn context_pairs(context: &LogContext) -> Vec<String> {
    let mut pairs = Vec::new();
    if let Some(school) = &context.school_id {
        pairs.push(format!("school:{school}"));
    }
    if let Some(user) = &context.user_id {
        pairs.push(format!("user:{user}"));
    }
    if let Some(role) = &context.user_role {
        pairs.push(format!("role:{role}"));
    }
    if let Some(request) = &context.request_id {
        pairs.push(format!("request:{request}"));
    }
    if let Some(duration) = context.duration {
        pairs.push(format!("duration:{duration}ms"));
    }
    if let Some(year) = &context.academic_year_id {
        pairs.push(format!("year:{year}"));
    }
    if let Some(semester) = &context.semester_id {
        pairs.push(format!("semester:{semester}"));
    }
    if let Some(course) = &context.course_id {
        pairs.push(format!("course:{course}"));
    }
    pairs
}

pub fn console_formatter(record: &LogRecord) -> String {
    let mut line = format!(
        "{}[{}] {}{} {}",
        level_color(record.level),
        record.iso_timestamp(),
        record.level.as_str(),
        RESET,
        record.message
    );

    if let Some(context) = &record.context {
        let pairs = context_pairs(context);
        if !pairs.is_empty() {
            line.push_str(" [");
            line.push_str(&pairs.join(" "));
            line.push(']');
        }
    }

    if let Some(error) = &record.error {
        line.push_str("\nError: ");
        line.push_str(&error.message);
        if let Some(stack) = &error.stack {
            line.push('\n');
            line.push_str(stack);
        }
    }

    line
}
