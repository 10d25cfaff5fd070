//! Builder pattern for configuring and creating a logger.
//!
//! # Example
//!
//! ```rust,no_run
//! // Console only
//! let console = solelog::builder()
//!     .with_color(true)
//!     .with_min_priority("info")
//!     .init()
//!     .expect("Failed to initialize logging");
//!
//! // With file output, rotated every 10 MB
//! let logger = solelog::builder()
//!     .with_output_dir("/var/log/app")
//!     .with_save_format("txt")
//!     .with_max_file_size_mb(10.0)
//!     .init()
//!     .expect("Failed to initialize logging");
//! ```

use std::path::PathBuf;

use crate::rotation::megabytes;
use crate::{Error, Logger, LoggerConfig, Result};

/// A builder for configuring and creating a [`Logger`].
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    /// First invalid value passed to a setter, reported by `init`.
    invalid: Option<String>,
}

impl LoggerBuilder {
    /// Create a new LoggerBuilder with default configuration.
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::new())
    }

    /// Create a LoggerBuilder from an existing configuration.
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            invalid: None,
        }
    }

    /// Enable or disable ANSI colors on the console.
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.config = self.config.with_color(enabled);
        self
    }

    /// Include timestamps by default.
    pub fn with_show_time(mut self, enabled: bool) -> Self {
        self.config = self.config.with_show_time(enabled);
        self
    }

    /// Set the minimum priority (e.g., "debug", "INFO", "warning").
    pub fn with_min_priority(mut self, level: impl Into<String>) -> Self {
        self.config = self.config.with_min_priority(level.into());
        self
    }

    /// Set the persisted format ("json" or "txt").
    pub fn with_save_format(mut self, format: impl Into<String>) -> Self {
        self.config = self.config.with_save_format(format.into());
        self
    }

    /// Write log files below `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_output_dir(dir);
        self
    }

    /// Set the subdirectory and file name prefix.
    pub fn with_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_dir_name(name.into());
        self
    }

    /// Pause the writer for `seconds` after each record.
    pub fn with_flush_interval(mut self, seconds: f64) -> Self {
        self.config = self.config.with_flush_interval(seconds);
        self
    }

    /// Rotate once the active file reaches `bytes`.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.config = self.config.with_max_file_size(bytes);
        self
    }

    /// Rotate once the active file reaches `mb` megabytes.
    pub fn with_max_file_size_mb(mut self, mb: f64) -> Self {
        match megabytes(mb) {
            Ok(bytes) => self.config = self.config.with_max_file_size(bytes),
            Err(_) => {
                self.invalid.get_or_insert_with(|| {
                    format!("max file size must be a non-negative number of megabytes, got {}", mb)
                });
            }
        }
        self
    }

    /// Echo to the console by default.
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config = self.config.with_console(enabled);
        self
    }

    /// Keep the whole session in one JSON document.
    pub fn with_aggregate_json(mut self, enabled: bool) -> Self {
        self.config = self.config.with_aggregate_json(enabled);
        self
    }

    /// Place files in a `dir_name` subdirectory of the output directory.
    pub fn with_create_subdirectory(mut self, enabled: bool) -> Self {
        self.config = self.config.with_create_subdirectory(enabled);
        self
    }

    /// Terminate the process when the background writer fails.
    pub fn with_exit_on_failure(mut self, enabled: bool) -> Self {
        self.config = self.config.with_exit_on_failure(enabled);
        self
    }

    /// Get the current configuration without creating a logger.
    pub fn build(self) -> LoggerConfig {
        self.config
    }

    /// Create the logger with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A setter received an invalid value
    /// - The configuration does not validate
    /// - The output directory or first log file cannot be created
    pub fn init(self) -> Result<Logger> {
        if let Some(reason) = self.invalid {
            return Err(Error::Config(reason));
        }
        Logger::new(self.config)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
