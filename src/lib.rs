//! # Solelog
//!
//! An in-process logger that buffers records from any number of threads and
//! writes them from a single background thread, rotating files by size.
//!
//! ## Features
//!
//! - Colored or plain console output with caller file, module, and line
//! - Priority filtering before any formatting or I/O
//! - Text, JSON-lines, or session-aggregated JSON files
//! - Size-based rotation with numbered file names per session
//! - Diagnostics of the logger itself through the `tracing` ecosystem
//!
//! ## Example
//!
//! ```rust,no_run
//! use solelog::{Logger, LoggerConfig};
//!
//! let config = LoggerConfig::new()
//!     .with_color(true)
//!     .with_output_dir("logs")
//!     .with_max_file_size(1024 * 1024);
//! let logger = Logger::new(config)?;
//!
//! logger.info("This is an info message");
//! solelog::warning!(logger, "disk usage at {}%", 91);
//!
//! logger.close()?;
//! # Ok::<(), solelog::Error>(())
//! ```

pub mod builder;
pub mod config;
mod console;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
mod macros;
pub mod record;
pub mod rotation;
pub mod session;
mod writer;

#[cfg(feature = "tracing-integration")]
pub mod diagnostics;

pub use builder::LoggerBuilder;
pub use config::{LoggerConfig, SaveFormat, ValidatedSettings};
pub use error::{Error, Result};
pub use level::Level;
pub use logger::{Emit, Logger, ShutdownOutcome};
pub use record::{CallSite, LogRecord};
pub use rotation::RotationManager;
pub use session::SessionAggregator;

#[cfg(feature = "tracing-integration")]
pub use diagnostics::init_diagnostics;

/// Start configuring a logger.
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new()
}
