//! Formatter set.
//!
//! # Data Flow
//! ```text
//! LogRecord
//!     → console.rs (colored human line)
//!     → structured.rs (json / structured / audit / performance)
//!     → Formatter::format → String handed to a sink
//! ```
//!
//! # Design Decisions
//! - Console output without colors falls back to structured JSON
//! - Unknown formatter names fall back to structured JSON

pub mod console;
pub mod record;
pub mod structured;

pub use console::console_formatter;
pub use record::{ErrorInfo, LogRecord};
pub use structured::{audit_formatter, json_formatter, performance_formatter, structured_formatter};

/// A selectable text formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    Console,
    Structured,
    Audit,
    Performance,
}

impl Formatter {
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            Formatter::Console => console_formatter(record),
            Formatter::Structured => structured_formatter(record),
            Formatter::Audit => audit_formatter(record).to_string(),
            Formatter::Performance => performance_formatter(record).to_string(),
        }
    }
}

/// Pick a formatter by name.
pub fn select_formatter(name: &str, enable_colors: bool) -> Formatter {
    match name {
        "console" if enable_colors => Formatter::Console,
        "audit" => Formatter::Audit,
        "performance" => Formatter::Performance,
        _ => Formatter::Structured,
    }
}
