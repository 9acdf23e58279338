//! Factory configuration lifecycle on isolated factories.

use std::io::Write;

use yeko_logger::config::loader::load_config;
use yeko_logger::config::presets::{server_config, test_config};
use yeko_logger::{
    ConfigOverride, Environment, LogLevel, LoggerConfig, LoggerFactory, SinkKind,
};

mod common;

#[test]
fn test_second_configure_is_ignored() {
    let factory = LoggerFactory::new();
    assert!(factory.configure(LoggerConfig {
        level: LogLevel::Warning,
        ..test_config()
    }));
    assert!(!factory.configure(LoggerConfig {
        level: LogLevel::Debug,
        ..test_config()
    }));

    let logger = factory.create(["app"], None);
    logger.info("below first floor", None);
    logger.warning("at first floor", None);

    let records = factory.memory_sink().unwrap().records();
    assert_eq!(common::messages(&records), vec!["at first floor"]);
}

#[test]
fn test_create_merges_override_onto_configured_config() {
    let (factory, _memory) = common::memory_factory();
    let logger = factory.create(
        ["db"],
        Some(&ConfigOverride::default().with_level(LogLevel::Error)),
    );

    assert_eq!(logger.config().level, LogLevel::Error);
    assert_eq!(logger.config().environment, Environment::Test);
    assert_eq!(factory.config().unwrap().level, LogLevel::Debug);
}

#[test]
fn test_shutdown_allows_fresh_configuration() {
    let (factory, memory) = common::memory_factory_at(LogLevel::Error);
    factory.create(["app"], None).error("first run", None, None);
    factory.shutdown();

    assert!(!factory.is_configured());
    assert_eq!(memory.len(), 1);

    factory.configure(test_config());
    let fresh = factory.memory_sink().unwrap();
    factory.create(["app"], None).debug("second run", None);
    assert_eq!(common::messages(&fresh.records()), vec!["second run"]);
}

#[test]
fn test_file_sink_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("yeko.log");
    let config_path = dir.path().join("logging.toml");

    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "sinks = [\"file\", \"memory\"]").unwrap();
    writeln!(file, "file_path = {:?}", log_path.to_str().unwrap()).unwrap();
    drop(file);

    let config = load_config(&config_path, &server_config(Environment::Production)).unwrap();
    assert!(config.has_sink(SinkKind::File));

    let factory = LoggerFactory::new();
    factory.configure(config);
    factory
        .create(["app", "grades"], None)
        .warning("grades import slow", None);
    factory.shutdown();

    let content = std::fs::read_to_string(&log_path).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(line["message"], "grades import slow");
    assert_eq!(line["level"], "warning");
    assert_eq!(line["category"], "app.grades");
    assert_eq!(line["service"], "yeko");
    assert_eq!(line["context"]["runtime"], "server");
}

#[test]
fn test_unconfigured_factory_degrades_gracefully() {
    let factory = LoggerFactory::new();
    let logger = factory.create(["boot"], None);

    logger.info("nobody is listening", None);
    logger.fatal("still no panic", None, None);

    assert!(factory.memory_sink().is_none());
    assert_eq!(logger.config(), &LoggerConfig::default());
}
