//! Best-effort highlighted messages about the logger itself.
//!
//! These bypass the queue entirely: they are printed straight to the terminal
//! because they describe failures of the queue and writer.

use std::error::Error as StdError;
use std::fmt::Write as _;

use crate::format::ansi::{BOLD, GREEN, RED, RESET, YELLOW};

/// Print a failure and its cause chain to stderr.
pub(crate) fn report_failure(context: &str, error: &dyn StdError) {
    eprintln!("{RED}{BOLD}{context}:\n{}{RESET}", error_chain(error));
}

/// Print a shutdown notice to stdout.
pub(crate) fn notice(outcome: Notice, text: &str) {
    let color = match outcome {
        Notice::Success => GREEN,
        Notice::Warning => YELLOW,
        Notice::Failure => RED,
    };
    println!("{BOLD}>>>> {color}{text}{RESET}");
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Notice {
    Success,
    Warning,
    Failure,
}

/// An error followed by each of its sources on a `Caused by:` line.
pub(crate) fn error_chain(error: &dyn StdError) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(out, "\nCaused by: {}", cause);
        source = cause.source();
    }
    out
}
