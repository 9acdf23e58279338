//! Environment presets.
//!
//! Base presets per environment, and the server/client variants the
//! instance modules initialize with.

use serde_json::json;

use crate::config::environment::Runtime;
use crate::config::schema::{Environment, LogLevel, LoggerConfig, SinkKind};
use crate::context::LogContext;

fn base_context(environment: Environment) -> LogContext {
    LogContext::new()
        .with_extra("service", "yeko")
        .with_extra("environment", environment.as_str())
}

pub fn development_config() -> LoggerConfig {
    LoggerConfig {
        level: LogLevel::Debug,
        environment: Environment::Development,
        sinks: vec![SinkKind::Console],
        enable_colors: true,
        enable_structured_logging: false,
        default_context: Some(base_context(Environment::Development)),
        ..LoggerConfig::default()
    }
}

pub fn production_config() -> LoggerConfig {
    LoggerConfig {
        level: LogLevel::Info,
        environment: Environment::Production,
        sinks: vec![SinkKind::Structured, SinkKind::Console],
        enable_colors: false,
        enable_structured_logging: true,
        default_context: Some(base_context(Environment::Production)),
        ..LoggerConfig::default()
    }
}

pub fn test_config() -> LoggerConfig {
    LoggerConfig {
        level: LogLevel::Debug,
        environment: Environment::Test,
        sinks: vec![SinkKind::Memory],
        enable_colors: false,
        enable_structured_logging: true,
        default_context: Some(base_context(Environment::Test)),
        ..LoggerConfig::default()
    }
}

pub fn preset(environment: Environment) -> LoggerConfig {
    match environment {
        Environment::Development => development_config(),
        Environment::Production => production_config(),
        Environment::Test => test_config(),
    }
}

fn stamp_runtime(config: &mut LoggerConfig, runtime: Runtime) {
    let mut context = config.default_context.take().unwrap_or_default();
    context.extra.insert("runtime".into(), json!(runtime.as_str()));
    if runtime == Runtime::Client {
        context.extra.insert("platform".into(), json!("browser"));
    }
    config.default_context = Some(context);
}

/// Server preset: the base preset stamped with `runtime: "server"`.
pub fn server_config(environment: Environment) -> LoggerConfig {
    let mut config = preset(environment);
    stamp_runtime(&mut config, Runtime::Server);
    config
}

/// Client preset. Production only emits warnings and above to the console;
/// development is info-level colored console output; tests stay in memory.
pub fn client_config(environment: Environment) -> LoggerConfig {
    let mut config = preset(environment);
    match environment {
        Environment::Production => {
            config.level = LogLevel::Warning;
            config.sinks = vec![SinkKind::Console];
            config.enable_colors = false;
            config.enable_structured_logging = true;
        }
        Environment::Test => {
            config.sinks = vec![SinkKind::Memory];
        }
        Environment::Development => {
            config.level = LogLevel::Info;
            config.sinks = vec![SinkKind::Console];
            config.enable_colors = true;
            config.enable_structured_logging = false;
        }
    }
    stamp_runtime(&mut config, Runtime::Client);
    config
}
