//! Severity levels and the priority filter.
//!
//! The filter runs on every emit before any formatting or I/O, so everything
//! here is a cheap, pure function over a fixed ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Severity of a log record, ordered by increasing importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels in rank order.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Numeric rank, DEBUG = 0 through CRITICAL = 4.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Whether a record at this level passes a `min` threshold.
    pub fn is_admitted(self, min: Level) -> bool {
        self.rank() >= min.rank()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so `{:<8}` widths apply
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::InvalidLevel(s.to_string()))
    }
}

/// Rank of a level given by name (case-insensitive).
pub fn rank(level: &str) -> Result<u8> {
    level.parse::<Level>().map(Level::rank)
}

/// Decide admit/drop for two level names.
pub fn is_admitted(level: &str, min_level: &str) -> Result<bool> {
    Ok(rank(level)? >= rank(min_level)?)
}
