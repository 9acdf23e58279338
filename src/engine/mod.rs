//! Logging engine.
//!
//! # Data Flow
//! ```text
//! YekoLogger call
//!     → layer.rs emit (tracing event, target "yeko", level mapped)
//!     → tracing dispatcher (the factory's, or the current default)
//!     → layer.rs LogEngine (target + level floor check, record rebuilt)
//!     → sinks.rs (console / structured / file / memory)
//! ```
//!
//! # Design Decisions
//! - Built once per configuration and never reconfigured
//! - Sinks that cannot be built are skipped and reported, never fatal
//! - Each factory owns its own dispatcher so tests stay isolated

pub mod layer;
pub mod metrics;
pub mod sinks;

use std::sync::Arc;

use tracing::Dispatch;

use crate::config::{LoggerConfig, SinkKind};

pub use layer::{emit, EventFields, LogEngine};
pub use sinks::{ConsoleSink, FileSink, MemorySink, Sink, SinkSet, SkippedSink, StructuredSink};

/// A configured engine: frozen config, dispatcher and sink handles.
pub struct Engine {
    config: Arc<LoggerConfig>,
    dispatch: Dispatch,
    sinks: Vec<Arc<dyn Sink>>,
    memory: Option<MemorySink>,
    skipped: Vec<SkippedSink>,
}

impl Engine {
    pub fn build(config: LoggerConfig) -> Self {
        let set = SinkSet::from_config(&config);
        let dispatch = LogEngine::new(config.level, set.sinks.clone()).into_dispatch();

        Self {
            config: Arc::new(config),
            dispatch,
            sinks: set.sinks,
            memory: set.memory,
            skipped: set.skipped,
        }
    }

    pub fn config(&self) -> &Arc<LoggerConfig> {
        &self.config
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn memory_sink(&self) -> Option<&MemorySink> {
        self.memory.as_ref()
    }

    /// Kinds of the sinks that were actually built.
    pub fn active_sinks(&self) -> Vec<SinkKind> {
        self.sinks.iter().map(|sink| sink.kind()).collect()
    }

    pub fn skipped(&self) -> &[SkippedSink] {
        &self.skipped
    }

    pub fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}
