//! Output destinations for accepted records.
//!
//! # Responsibilities
//! - Render a record with the formatter the sink is configured for
//! - Write it without ever surfacing an I/O failure to the caller
//! - Keep an inspectable in-memory buffer for tests

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{LoggerConfig, SinkKind};
use crate::format::{select_formatter, structured_formatter, Formatter, LogRecord};

/// A named output destination.
///
/// Implementors must swallow their own write failures.
pub trait Sink: Send + Sync + 'static {
    fn kind(&self) -> SinkKind;

    fn write(&self, record: &LogRecord);

    /// Flush any buffered records.
    fn flush(&self) {}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Formatted lines on stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    formatter: Formatter,
}

impl ConsoleSink {
    pub fn new(enable_colors: bool) -> Self {
        Self {
            formatter: select_formatter("console", enable_colors),
        }
    }

    pub fn formatter(&self) -> Formatter {
        self.formatter
    }
}

impl Sink for ConsoleSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn write(&self, record: &LogRecord) {
        let line = self.formatter.format(record);
        let _ = writeln!(io::stdout().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = io::stdout().lock().flush();
    }
}

/// Single-line JSON on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredSink;

impl Sink for StructuredSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Structured
    }

    fn write(&self, record: &LogRecord) {
        let line = structured_formatter(record);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

/// Single-line JSON appended to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl FileSink {
    /// Open (or create) `path` for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn write(&self, record: &LogRecord) {
        let line = structured_formatter(record);
        let _ = writeln!(lock(&self.writer), "{line}");
    }

    fn flush(&self) {
        let _ = lock(&self.writer).flush();
    }
}

/// Shared in-memory record buffer.
///
/// Clones share the same buffer, so a handle kept by a test sees every
/// record the engine writes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.records).clone()
    }

    /// Drain the captured records.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *lock(&self.records))
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
    }
}

impl Sink for MemorySink {
    fn kind(&self) -> SinkKind {
        SinkKind::Memory
    }

    fn write(&self, record: &LogRecord) {
        lock(&self.records).push(record.clone());
    }
}

/// A sink that could not be built from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSink {
    pub kind: SinkKind,
    pub reason: String,
}

/// Sinks built for one configuration.
pub struct SinkSet {
    pub sinks: Vec<Arc<dyn Sink>>,
    pub memory: Option<MemorySink>,
    pub skipped: Vec<SkippedSink>,
}

impl SinkSet {
    /// Build every sink the configuration names, once each.
    ///
    /// Sinks that cannot be built are reported in `skipped` instead of
    /// failing the whole set.
    pub fn from_config(config: &LoggerConfig) -> Self {
        let mut set = SinkSet {
            sinks: Vec::new(),
            memory: None,
            skipped: Vec::new(),
        };
        let mut built: Vec<SinkKind> = Vec::new();

        for kind in &config.sinks {
            if built.contains(kind) {
                continue;
            }
            built.push(*kind);

            match kind {
                SinkKind::Console => set.sinks.push(Arc::new(ConsoleSink::new(config.enable_colors))),
                SinkKind::Structured => set.sinks.push(Arc::new(StructuredSink)),
                SinkKind::Memory => {
                    let memory = MemorySink::new();
                    set.memory = Some(memory.clone());
                    set.sinks.push(Arc::new(memory));
                }
                SinkKind::File => match &config.file_path {
                    Some(path) => match FileSink::open(path) {
                        Ok(sink) => set.sinks.push(Arc::new(sink)),
                        Err(e) => set.skipped.push(SkippedSink {
                            kind: SinkKind::File,
                            reason: format!("cannot open {}: {}", path.display(), e),
                        }),
                    },
                    None => set.skipped.push(SkippedSink {
                        kind: SinkKind::File,
                        reason: "no file_path configured".to_string(),
                    }),
                },
            }
        }

        set
    }
}
