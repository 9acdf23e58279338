//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::environment::LOG_LEVEL_VAR;
use crate::config::schema::{ConfigOverride, LoggerConfig};
use crate::config::validation::validate_config;
use crate::error::{LoggingError, LoggingResult};

/// Parse a TOML config file into a partial configuration.
pub fn load_override(path: &Path) -> LoggingResult<ConfigOverride> {
    let content = fs::read_to_string(path)?;
    parse_override(&content)
}

pub fn parse_override(content: &str) -> LoggingResult<ConfigOverride> {
    Ok(toml::from_str(content)?)
}

/// Overrides taken from the process environment (`YEKO_LOG_LEVEL`).
pub fn env_override() -> LoggingResult<ConfigOverride> {
    level_override(std::env::var(LOG_LEVEL_VAR).ok().as_deref())
}

pub fn level_override(value: Option<&str>) -> LoggingResult<ConfigOverride> {
    let mut overrides = ConfigOverride::default();
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        overrides.level = Some(value.parse()?);
    }
    Ok(overrides)
}

/// Load and validate a configuration file on top of `base`.
///
/// Environment overrides are applied last.
pub fn load_config(path: &Path, base: &LoggerConfig) -> LoggingResult<LoggerConfig> {
    let overrides = load_override(path)?.and(env_override()?);
    let config = base.merged(&overrides);

    validate_config(&config).map_err(LoggingError::Validation)?;

    Ok(config)
}
