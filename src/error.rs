use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Errors that can occur in the logging library
#[derive(ThisError, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The output directory does not exist and could not be created.
    #[error("Log directory {} could not be created: {source}", .path.display())]
    PathNotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The output path exists but is not a directory.
    #[error("Log path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    /// Save format is neither `json` nor `txt`.
    #[error("Invalid save format '{0}': only accepts 'json' and 'txt'")]
    InvalidFormat(String),
    /// Severity name outside DEBUG, INFO, WARNING, ERROR, CRITICAL.
    #[error("Invalid log level '{0}': must be one of DEBUG, INFO, WARNING, ERROR, CRITICAL")]
    InvalidLevel(String),
    /// The ingest queue rejected a record.
    #[error("Queue error: {0}")]
    Queue(String),
    /// Creating or inspecting the next log file failed.
    #[error("Log rotation failed for {}: {source}", .path.display())]
    Rotation {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Persisting a record failed.
    #[error("Writing logs to {} failed: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A record or session could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// A timestamp could not be formatted.
    #[error("Time error: {0}")]
    Time(#[from] time::error::Format),
    /// Initialization failed.
    #[error("Initialization error: {0}")]
    Init(String),
    /// The background writer panicked before it could report an error.
    #[error("Log writer thread panicked")]
    WriterPanicked,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
