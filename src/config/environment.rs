//! Environment and runtime selection.
//!
//! The runtime (server or client) is passed in by the application at
//! startup. The environment is read from `YEKO_ENV` on servers and inferred
//! from the page host on clients.

use std::fmt;

use crate::config::schema::Environment;

/// Variable holding the server-side environment name.
pub const ENVIRONMENT_VAR: &str = "YEKO_ENV";

/// Variable overriding the level floor of the selected preset.
pub const LOG_LEVEL_VAR: &str = "YEKO_LOG_LEVEL";

/// Host suffixes served by production deployments.
pub const PRODUCTION_DOMAINS: [&str; 2] = ["yeko.app", "yeko.com"];

/// Runtime the logging stack is initialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    Server,
    Client,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Server => "server",
            Runtime::Client => "client",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a client runtime knows about where it is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientHost {
    /// Hostname of the page, when there is one.
    pub hostname: Option<String>,
    /// Test harness flag.
    pub test_mode: bool,
}

impl ClientHost {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            test_mode: false,
        }
    }

    pub fn test() -> Self {
        Self {
            hostname: None,
            test_mode: true,
        }
    }

    /// Infer the environment from the host.
    pub fn environment(&self) -> Environment {
        if self.test_mode {
            return Environment::Test;
        }
        match self.hostname.as_deref() {
            Some("localhost") | Some("127.0.0.1") => Environment::Development,
            Some(host) if is_production_host(host) => Environment::Production,
            _ => Environment::Development,
        }
    }
}

fn is_production_host(host: &str) -> bool {
    PRODUCTION_DOMAINS.iter().any(|domain| host.ends_with(domain))
}

/// Resolve an environment name, falling back to development.
pub fn environment_from_value(value: Option<&str>) -> Environment {
    value
        .and_then(|v| v.parse().ok())
        .unwrap_or(Environment::Development)
}

/// Server environment from `YEKO_ENV`.
pub fn server_environment() -> Environment {
    environment_from_value(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
}
