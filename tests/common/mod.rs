//! Shared utilities for integration testing.

use yeko_logger::config::presets::test_config;
use yeko_logger::{LogLevel, LogRecord, LoggerConfig, LoggerFactory, MemorySink, SinkKind};

/// An isolated factory configured with the test preset.
pub fn memory_factory() -> (LoggerFactory, MemorySink) {
    memory_factory_with(test_config())
}

/// An isolated factory configured with `config`, forced onto the memory sink.
pub fn memory_factory_with(config: LoggerConfig) -> (LoggerFactory, MemorySink) {
    let factory = LoggerFactory::new();
    factory.configure(LoggerConfig {
        sinks: vec![SinkKind::Memory],
        ..config
    });
    let memory = factory
        .memory_sink()
        .expect("memory sink is configured");
    (factory, memory)
}

#[allow(dead_code)]
pub fn memory_factory_at(level: LogLevel) -> (LoggerFactory, MemorySink) {
    memory_factory_with(LoggerConfig {
        level,
        ..test_config()
    })
}

/// Messages of the captured records, oldest first.
#[allow(dead_code)]
pub fn messages(records: &[LogRecord]) -> Vec<&str> {
    records.iter().map(|record| record.message.as_str()).collect()
}
