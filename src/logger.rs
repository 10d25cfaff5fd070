//! The logger handle used by application code.
//!
//! # Example
//!
//! ```rust,no_run
//! use solelog::{Emit, Logger, LoggerConfig};
//!
//! let config = LoggerConfig::new()
//!     .with_output_dir("logs")
//!     .with_save_format("txt".to_string());
//! let logger = Logger::new(config)?;
//!
//! logger.info("service started");
//! logger.warning_with("cache cold", Emit::new().echo(false));
//!
//! logger.close()?;
//! # Ok::<(), solelog::Error>(())
//! ```

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt::{Display, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::console::{self, Notice};
use crate::record::{self, CallSite, LogRecord};
use crate::rotation::RotationManager;
use crate::session::SessionAggregator;
use crate::writer::{self, Envelope, Persistence, SharedPersistence, WriterLoop};
use crate::{Error, Level, LoggerConfig, Result, ValidatedSettings, format};

/// Per-call overrides of the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emit {
    /// Include a timestamp; `None` uses `LoggerConfig::show_time`.
    pub show_time: Option<bool>,
    /// Echo to the console; `None` uses `LoggerConfig::console`.
    pub echo: Option<bool>,
}

impl Emit {
    /// Use the configured defaults for everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the timestamp on or off for this call.
    pub fn show_time(mut self, show_time: bool) -> Self {
        self.show_time = Some(show_time);
        self
    }

    /// Force the console echo on or off for this call.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = Some(echo);
        self
    }
}

/// What `close` found when it inspected the final log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The final file holds records and was kept.
    Completed { path: PathBuf },
    /// The final file was empty and has been removed.
    EmptyLogDeleted { path: PathBuf },
    /// The final file was empty but could not be removed.
    DeleteFailed { path: PathBuf, reason: String },
    /// The final file could not be inspected, usually because it was removed
    /// by something else.
    InspectFailed { path: PathBuf, reason: String },
    /// No output directory was configured.
    ConsoleOnly,
}

/// File output: the producer side of the ingest queue plus the writer thread.
#[derive(Debug)]
struct FileSink {
    sender: Sender<Envelope>,
    state: SharedPersistence,
    handle: JoinHandle<Result<()>>,
    exit_on_failure: bool,
    queue_failed: AtomicBool,
}

impl FileSink {
    fn open(
        config: &LoggerConfig,
        dir: &Path,
        settings: ValidatedSettings,
        session_start: &str,
        session: Option<SessionAggregator>,
    ) -> Result<Self> {
        let root = prepare_dir(dir, config.create_subdirectory, &config.dir_name)?;
        let rotation = RotationManager::new(
            &root,
            &config.dir_name,
            session_start,
            settings.save_format,
            config.max_file_size,
        )?;
        tracing::debug!(path = %rotation.path().display(), "log file created");

        let state = Arc::new(Mutex::new(Persistence::new(
            rotation,
            session,
            settings.save_format,
        )));
        let (sender, receiver) = writer::queue();
        let handle = WriterLoop::new(receiver, Arc::clone(&state), settings.flush_interval)
            .spawn(config.exit_on_failure)?;

        Ok(Self {
            sender,
            state,
            handle,
            exit_on_failure: config.exit_on_failure,
            queue_failed: AtomicBool::new(false),
        })
    }

    fn enqueue(&self, record: LogRecord) {
        if let Err(e) = self.sender.send(Envelope::Record(record)) {
            if self.queue_failed.swap(true, Ordering::Relaxed) {
                tracing::warn!("log writer stopped, dropping record");
                return;
            }
            let err = Error::Queue(e.to_string());
            tracing::error!(error = %err, "failed to enqueue log record");
            console::report_failure("An error occurred in the log queue", &err);
            if self.exit_on_failure {
                std::process::exit(1);
            }
        }
    }

    fn path(&self) -> PathBuf {
        writer::lock(&self.state).rotation().path().to_path_buf()
    }

    /// Stop the writer, wait for it to drain, and remove the final file if
    /// nothing was written to it.
    fn finish(self) -> Result<ShutdownOutcome> {
        // fails only if the writer already exited
        let _ = self.sender.send(Envelope::Shutdown);
        self.handle.join().map_err(|_| Error::WriterPanicked)??;

        let path = writer::lock(&self.state).rotation().path().to_path_buf();
        let size = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                console::notice(
                    Notice::Failure,
                    &format!("Can't inspect {} during shutdown: {}", path.display(), e),
                );
                return Ok(ShutdownOutcome::InspectFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        };
        if size > 0 {
            console::notice(Notice::Success, "Logger shutdown completed successfully.");
            return Ok(ShutdownOutcome::Completed { path });
        }

        console::notice(
            Notice::Warning,
            &format!("No logs in {}. Deleting...", path.display()),
        );
        match fs::remove_file(&path) {
            Ok(()) => {
                console::notice(Notice::Success, "Logger shutdown completed successfully.");
                Ok(ShutdownOutcome::EmptyLogDeleted { path })
            }
            Err(e) => {
                console::notice(
                    Notice::Failure,
                    &format!(
                        "Can't delete {} but no logs were written: {}",
                        path.display(),
                        e
                    ),
                );
                Ok(ShutdownOutcome::DeleteFailed {
                    path,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Resolve the directory that receives log files, creating it as needed.
fn prepare_dir(dir: &Path, create_subdirectory: bool, dir_name: &str) -> Result<PathBuf> {
    let dir = std::path::absolute(dir).map_err(|source| Error::PathNotFound {
        path: dir.to_path_buf(),
        source,
    })?;

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|source| Error::PathNotFound {
            path: dir.clone(),
            source,
        })?;
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir));
    }

    let root = if create_subdirectory {
        dir.join(dir_name)
    } else {
        dir
    };
    if let Err(source) = fs::create_dir_all(&root) {
        if root.exists() && !root.is_dir() {
            return Err(Error::NotADirectory(root));
        }
        return Err(Error::PathNotFound { path: root, source });
    }
    Ok(root)
}

/// An asynchronous logger.
///
/// Records below the minimum priority are dropped before any formatting.
/// Admitted records are echoed to stdout according to the console policy and,
/// when an output directory is configured, handed to a background writer that
/// persists them in order and rotates files by size.
#[derive(Debug)]
pub struct Logger {
    color: bool,
    show_time: bool,
    console: bool,
    min_priority: Level,
    session_start: String,
    session_id: Option<String>,
    sink: Option<FileSink>,
}

macro_rules! severity_methods {
    ($($level:ident => $name:ident, $name_with:ident;)*) => {$(
        #[doc = concat!("Log a `", stringify!($level), "` record, printing it when echo is enabled.")]
        #[track_caller]
        pub fn $name<M: Serialize>(&self, message: M) {
            self.$name_with(message, Emit::default());
        }

        #[doc = concat!("Log a `", stringify!($level), "` record with per-call overrides.")]
        #[track_caller]
        pub fn $name_with<M: Serialize>(&self, message: M, options: Emit) {
            if let Some(line) = self.emit(CallSite::caller(), Level::$level, message, options) {
                println!("{}", line);
            }
        }
    )*};
}

impl Logger {
    /// Create a logger, its first log file, and the background writer.
    ///
    /// # Errors
    ///
    /// - `InvalidLevel` / `InvalidFormat` for unknown priority or format names
    /// - `PathNotFound` if the output directory cannot be created
    /// - `NotADirectory` if the output path is a file
    /// - `Config` for negative intervals or sizes
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let settings = config.validate()?;
        let session_start = record::session_timestamp()?;
        let session = config.aggregate_json.then(SessionAggregator::new);
        let session_id = session.as_ref().map(|s| s.id().to_string());

        let sink = match config.output_dir.as_deref() {
            Some(dir) => Some(FileSink::open(
                &config,
                dir,
                settings,
                &session_start,
                session,
            )?),
            None => None,
        };

        tracing::debug!(
            min_priority = %settings.min_priority,
            format = %settings.save_format,
            file_output = sink.is_some(),
            "logger initialized"
        );

        Ok(Self {
            color: config.color,
            show_time: config.show_time,
            console: config.console,
            min_priority: settings.min_priority,
            session_start,
            session_id,
            sink,
        })
    }

    /// Like [`Logger::new`], but prints the error and exits the process on failure.
    pub fn new_or_exit(config: LoggerConfig) -> Self {
        match Self::new(config) {
            Ok(logger) => logger,
            Err(e) => {
                console::report_failure("Error during logger initialization", &e);
                std::process::exit(1);
            }
        }
    }

    /// Filter, record, and queue one message.
    ///
    /// Returns the console line when the resolved echo policy is on; nothing
    /// is printed here. Records below the minimum priority yield `None` even
    /// when echo was requested explicitly.
    pub fn emit<M: Serialize>(
        &self,
        site: CallSite,
        level: Level,
        message: M,
        options: Emit,
    ) -> Option<String> {
        if !level.is_admitted(self.min_priority) {
            return None;
        }

        let show_time = options.show_time.unwrap_or(self.show_time);
        let timestamp = if show_time {
            record::record_timestamp().unwrap_or_default()
        } else {
            String::new()
        };
        let record = LogRecord::new(timestamp, level, site, record::message_value(&message));

        let echo = options.echo.unwrap_or(self.console);
        let line = echo.then(|| format::console_line(&record, self.color));

        if let Some(sink) = &self.sink {
            sink.enqueue(record);
        }

        line
    }

    severity_methods! {
        Debug => debug, debug_with;
        Info => info, info_with;
        Warning => warning, warning_with;
        Error => error, error_with;
        Critical => critical, critical_with;
    }

    /// Log an `Error` record describing `error` and its causes.
    #[track_caller]
    pub fn exception(&self, message: impl Display, error: &dyn StdError) {
        self.exception_with(message, error, Emit::default());
    }

    /// Like [`Logger::exception`], with per-call overrides.
    #[track_caller]
    pub fn exception_with(&self, message: impl Display, error: &dyn StdError, options: Emit) {
        let text = exception_text(message, error);
        if let Some(line) = self.emit(CallSite::caller(), Level::Error, text, options) {
            println!("{}", line);
        }
    }

    /// Path of the file currently receiving records, if file output is on.
    pub fn current_log_file_path(&self) -> Option<PathBuf> {
        self.sink.as_ref().map(FileSink::path)
    }

    /// Logger start time as used in file names (`YYYY-MM-DD_HH-MM-SS`).
    pub fn session_start_timestamp(&self) -> &str {
        &self.session_start
    }

    /// Session id in aggregate JSON mode.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn min_priority(&self) -> Level {
        self.min_priority
    }

    /// Stop the writer after it has drained every queued record.
    ///
    /// An empty final log file is deleted. Deletion problems are reported in
    /// the outcome, not as an error; an error means the writer itself failed.
    pub fn close(mut self) -> Result<ShutdownOutcome> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<ShutdownOutcome> {
        match self.sink.take() {
            Some(sink) => sink.finish(),
            None => Ok(ShutdownOutcome::ConsoleOnly),
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.sink.is_some()
            && let Err(e) = self.shutdown()
        {
            tracing::error!(error = %e, "logger shutdown failed");
        }
    }
}

fn exception_text(message: impl Display, error: &dyn StdError) -> String {
    let mut text = format!("{}\n{}", message, console::error_chain(error));
    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        let _ = write!(text, "\nBacktrace:\n{}", backtrace);
    }
    text
}
