//! Process-wide logger factory.
//!
//! # State
//! `Unconfigured → Configured`. The engine is built by the first
//! `configure` call and never rebuilt; `shutdown` resets to
//! `Unconfigured` so test harnesses can start over.

use std::sync::{Arc, Mutex, OnceLock};

use arc_swap::ArcSwapOption;

use crate::config::{ConfigOverride, LoggerConfig};
use crate::context::LogContext;
use crate::engine::{Engine, MemorySink};
use crate::logger::core::YekoLogger;

struct FactoryState {
    engine: ArcSwapOption<Engine>,
    configure_lock: Mutex<()>,
}

/// Hands out category-scoped loggers against one engine configuration.
///
/// Clones share the same state. `LoggerFactory::new` builds an isolated
/// factory; `LoggerFactory::global` is the process-wide one.
#[derive(Clone)]
pub struct LoggerFactory {
    state: Arc<FactoryState>,
}

static GLOBAL: OnceLock<LoggerFactory> = OnceLock::new();

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerFactory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(FactoryState {
                engine: ArcSwapOption::empty(),
                configure_lock: Mutex::new(()),
            }),
        }
    }

    /// The process-wide factory.
    ///
    /// Its engine is only ever entered by its own loggers; the host's global
    /// `tracing` subscriber is left alone.
    pub fn global() -> &'static LoggerFactory {
        GLOBAL.get_or_init(Self::new)
    }

    /// Build the engine from `config`.
    ///
    /// Only the first call takes effect; later calls return `false` and
    /// leave the running engine untouched.
    pub fn configure(&self, config: LoggerConfig) -> bool {
        let _guard = self
            .state
            .configure_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.state.engine.load().is_some() {
            return false;
        }

        let engine = Arc::new(Engine::build(config));
        self.state.engine.store(Some(engine.clone()));

        let logger = self.create(["logging"], None);
        for skipped in engine.skipped() {
            logger.warning(
                "Sink unavailable",
                Some(
                    LogContext::new()
                        .with_extra("sink", skipped.kind.as_str())
                        .with_extra("reason", skipped.reason.as_str()),
                ),
            );
        }

        true
    }

    /// A logger for `category` under the configured config with
    /// `overrides` laid on top. Before configuration, the default config
    /// is used.
    pub fn create<C>(&self, category: C, overrides: Option<&ConfigOverride>) -> YekoLogger
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let base = self
            .config()
            .unwrap_or_else(|| Arc::new(LoggerConfig::default()));
        let config = match overrides {
            Some(overrides) => Arc::new(base.merged(overrides)),
            None => base,
        };

        YekoLogger::new(
            category.into_iter().map(Into::into).collect(),
            config,
            None,
            self.clone(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.state.engine.load().is_some()
    }

    pub fn config(&self) -> Option<Arc<LoggerConfig>> {
        self.engine().map(|engine| engine.config().clone())
    }

    /// Handle to the in-memory sink, when the configuration has one.
    pub fn memory_sink(&self) -> Option<MemorySink> {
        self.engine().and_then(|engine| engine.memory_sink().cloned())
    }

    /// Flush every sink and return to the unconfigured state. Existing
    /// loggers stop writing to the old sinks.
    pub fn shutdown(&self) {
        let _guard = self
            .state
            .configure_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(engine) = self.state.engine.swap(None) {
            engine.flush();
        }
    }

    pub(crate) fn engine(&self) -> Option<Arc<Engine>> {
        self.state.engine.load_full()
    }
}
