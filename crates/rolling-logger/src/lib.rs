//! Rolling Logger
//!
//! File logger for the Kanban board backed by `tracing-subscriber`.
//! - Log files roll over on a time schedule through `tracing-appender`,
//!   keeping a fixed number of old files
//! - The last lines are kept in an in-memory circular buffer
//! - `log` records are bridged, so `log::info!` ends up here too

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Rolled files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 7;
/// Lines kept in the circular buffer
pub const DEFAULT_BUFFER_LINES: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to prepare log directory {path}: {source}")]
    Directory { path: PathBuf, source: io::Error },

    #[error("failed to open log file in {path}: {detail}")]
    Open { path: PathBuf, detail: String },

    #[error("logger already initialized")]
    AlreadyInitialized,

    #[error("logger not initialized")]
    NotInitialized,
}

/// Rollover and buffering limits
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub rotation: Rotation,
    pub max_files: usize,
    pub buffer_lines: usize,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

/// Circular buffer of the last complete lines written through it.
#[derive(Clone)]
pub struct RecentLines {
    inner: Arc<Mutex<LineBuffer>>,
}

struct LineBuffer {
    capacity: usize,
    lines: VecDeque<String>,
    partial: String,
}

impl RecentLines {
    fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LineBuffer {
                capacity,
                lines: VecDeque::with_capacity(capacity),
                partial: String::new(),
            })),
        }
    }

    /// Buffered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(guard) => guard.lines.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().lines.iter().cloned().collect(),
        }
    }
}

impl Write for RecentLines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "line buffer lock poisoned"))?;
        if guard.capacity == 0 {
            return Ok(buf.len());
        }
        guard.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(end) = guard.partial.find('\n') {
            let line: String = guard.partial.drain(..=end).collect();
            if guard.lines.len() == guard.capacity {
                guard.lines.pop_front();
            }
            guard.lines.push_back(line.trim_end().to_string());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RecentLines {
    type Writer = RecentLines;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Rolling file writer plus the circular line buffer.
///
/// The file is written from a background worker; dropping the logger
/// flushes whatever is still queued.
pub struct RollingLogger {
    file: NonBlocking,
    recent: RecentLines,
    guard: Mutex<Option<WorkerGuard>>,
}

impl RollingLogger {
    /// Open (or append to) `<dir>/<app_name>[.<date>].log`
    pub fn open(dir: impl AsRef<Path>, app_name: &str, options: LoggerOptions) -> Result<Self, LoggerError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| LoggerError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(options.rotation)
            .filename_prefix(app_name)
            .filename_suffix("log")
            .max_log_files(options.max_files.max(1))
            .build(dir)
            .map_err(|e| LoggerError::Open {
                path: dir.to_path_buf(),
                detail: e.to_string(),
            })?;
        let (file, guard) = tracing_appender::non_blocking(appender);

        Ok(Self {
            file,
            recent: RecentLines::new(options.buffer_lines),
            guard: Mutex::new(Some(guard)),
        })
    }

    pub fn file_writer(&self) -> NonBlocking {
        self.file.clone()
    }

    pub fn recent(&self) -> RecentLines {
        self.recent.clone()
    }

    /// Last buffered lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.recent.lines()
    }

    /// Write one timestamped line directly, bypassing the subscriber
    pub fn write_line(&self, level: &str, message: &str) -> io::Result<()> {
        let line = format!(
            "{} {:>5} {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            message
        );
        let mut file = self.file.clone();
        file.write_all(line.as_bytes())?;
        self.recent.clone().write_all(line.as_bytes())
    }

    /// Flush queued lines to disk and stop the background worker
    pub fn shutdown(&self) {
        let guard = match self.guard.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(guard);
    }
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global subscriber writing to `<log_dir>/<app_name>.<date>.log` and stderr.
///
/// The filter honours `RUST_LOG` and defaults to `info`.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, LoggerOptions::default())
}

pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    options: LoggerOptions,
) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let logger = RollingLogger::open(log_dir, app_name, options)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(logger.file_writer()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(logger.recent()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    LOGGER.set(logger).map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::info!(app = app_name, "rolling logger initialized");
    Ok(())
}

fn global() -> Result<&'static RollingLogger, LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    global()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn warn(message: &str) -> Result<(), LoggerError> {
    global()?;
    tracing::warn!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    global()?;
    tracing::error!("{}", message);
    Ok(())
}

/// Lines held by the global logger's circular buffer
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|l| l.recent_lines()).unwrap_or_default()
}

/// Flush the global logger's file before exit
pub fn flush() {
    if let Some(logger) = LOGGER.get() {
        logger.shutdown();
    }
}
