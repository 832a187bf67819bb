//! Log sink adapter.
//!
//! [`RecordingLogger`] backs the `log` facade on the host: every record
//! is echoed to stderr as `[LEVEL] message` and the most recent
//! [`LOG_CAPACITY`] lines are kept in memory, read back through
//! [`RecordingLogger::lines`]. The installation snapshot does not carry
//! them.

use std::sync::Mutex;

use heapless::HistoryBuffer;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Lines retained in memory.
pub const LOG_CAPACITY: usize = 64;

pub struct RecordingLogger {
    lines: Mutex<HistoryBuffer<String, LOG_CAPACITY>>,
    echo: bool,
}

impl RecordingLogger {
    pub const fn new(echo: bool) -> Self {
        Self {
            lines: Mutex::new(HistoryBuffer::new()),
            echo,
        }
    }

    /// Retained lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.oldest_ordered().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, line: String) {
        if self.echo {
            eprintln!("{line}");
        }
        if let Ok(mut lines) = self.lines.lock() {
            lines.write(line);
        }
    }
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.record(format!("[{}] {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger::new(true);

/// Install the process-wide logger. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<&'static RecordingLogger, SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(&LOGGER)
}
