//! Rendering of log records.
//!
//! A record has two independent representations: the console line, plain or
//! ANSI-styled, and the persisted form (a text line or a JSON object).

use crate::{Level, LogRecord, Result};

/// ANSI escape sequences used for console output.
pub(crate) mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const UNDERLINE: &str = "\x1b[4m";
    pub const GREEN: &str = "\x1b[92m";
    pub const MAGENTA: &str = "\x1b[95m";
    pub const WHITE: &str = "\x1b[97m";
    pub const GREY: &str = "\x1b[37m";
    pub const BLUE: &str = "\x1b[94m";
    pub const CYAN: &str = "\x1b[96m";
    pub const YELLOW: &str = "\x1b[93m";
    pub const RED: &str = "\x1b[91m";
}

const PATH_WIDTH: usize = 65;
const MODULE_WIDTH: usize = 20;
const LINE_WIDTH: usize = 5;

impl Level {
    /// Console color for this level.
    pub fn color(self) -> &'static str {
        match self {
            Level::Debug => ansi::BLUE,
            Level::Info => ansi::CYAN,
            Level::Warning => ansi::YELLOW,
            Level::Error | Level::Critical => ansi::RED,
        }
    }
}

/// Render the console line for a record.
pub fn console_line(record: &LogRecord, colored: bool) -> String {
    if colored {
        colored_line(record)
    } else {
        plain_line(record)
    }
}

fn time_prefix(record: &LogRecord) -> String {
    if record.timestamp.is_empty() {
        String::new()
    } else {
        format!("{} ", record.timestamp)
    }
}

fn plain_line(record: &LogRecord) -> String {
    format!(
        "{}| {:<8}| {:<pw$}{:<mw$} -> {:<lw$} - {}",
        time_prefix(record),
        record.level,
        record.path,
        record.module,
        record.line,
        record.message_text(),
        pw = PATH_WIDTH,
        mw = MODULE_WIDTH,
        lw = LINE_WIDTH,
    )
}

fn colored_line(record: &LogRecord) -> String {
    use self::ansi::*;

    let level_color = record.level.color();
    let emphasis = if record.level == Level::Critical {
        UNDERLINE
    } else {
        ""
    };

    format!(
        "{GREEN}{time}{BOLD}{MAGENTA}|{RESET} \
         {BOLD}{emphasis}{level_color}{level:<8}{RESET} \
         {MAGENTA}{BOLD}|{RESET}\
         {GREY} {path:<pw$}{MAGENTA}{BOLD} -> {RESET}\
         {CYAN}{module:<mw$}{MAGENTA}{BOLD} -> {RESET}\
         {WHITE}{BOLD}{line:<lw$}{MAGENTA} -{RESET}\
         {level_color}{BOLD} {emphasis}{message}{RESET}",
        time = time_prefix(record),
        level = record.level,
        path = record.path,
        module = record.module,
        line = record.line,
        message = record.message_text(),
        pw = PATH_WIDTH,
        mw = MODULE_WIDTH,
        lw = LINE_WIDTH,
    )
}

/// `[timestamp] -> [LEVEL   ] - message`
pub fn text_line(record: &LogRecord) -> String {
    format!(
        "[{}] -> [{:<8}] - {}",
        record.timestamp,
        record.level,
        record.message_text()
    )
}

/// Compact single-line JSON object.
pub fn json_line(record: &LogRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallSite;
    use serde_json::json;

    fn record(level: Level, timestamp: &str, message: serde_json::Value) -> LogRecord {
        LogRecord::new(
            timestamp.to_string(),
            level,
            CallSite::new("src/main.rs", "startup", 42),
            message,
        )
    }

    #[test]
    fn test_text_line_without_timestamp() {
        let r = record(Level::Info, "", json!("boot"));
        assert_eq!(text_line(&r), "[] -> [INFO    ] - boot");
    }

    #[test]
    fn test_text_line_with_timestamp() {
        let r = record(Level::Warning, "2026-01-09 10:00:00.000", json!("disk low"));
        assert_eq!(
            text_line(&r),
            "[2026-01-09 10:00:00.000] -> [WARNING ] - disk low"
        );
    }

    #[test]
    fn test_plain_console_line() {
        let r = record(Level::Error, "", json!("failed"));
        let line = console_line(&r, false);
        assert!(line.starts_with("| ERROR   | src/main.rs"));
        assert!(line.contains("startup"));
        assert!(line.contains(" -> 42    - failed"));
        assert!(!line.contains('\x1b'));
        assert_eq!(line.find("startup"), Some(2 + 8 + 2 + PATH_WIDTH));
    }

    #[test]
    fn test_plain_console_line_with_time() {
        let r = record(Level::Debug, "2026-01-09 10:00:00.000", json!(1));
        let line = console_line(&r, false);
        assert!(line.starts_with("2026-01-09 10:00:00.000 | DEBUG   |"));
        assert!(line.ends_with(" - 1"));
    }

    #[test]
    fn test_colored_line() {
        let r = record(Level::Info, "", json!("hello"));
        let line = console_line(&r, true);
        assert!(line.contains(ansi::CYAN));
        assert!(line.contains("hello"));
        assert!(line.ends_with(ansi::RESET));
        assert!(!line.contains(ansi::UNDERLINE));
    }

    #[test]
    fn test_critical_is_underlined() {
        let r = record(Level::Critical, "", json!("meltdown"));
        let line = console_line(&r, true);
        assert!(line.contains(&format!("{}{}CRITICAL", ansi::UNDERLINE, ansi::RED)));
        assert!(line.contains(&format!("{}meltdown", ansi::UNDERLINE)));
    }

    #[test]
    fn test_json_line_is_single_line() {
        let r = record(Level::Info, "", json!({"user": "ada", "retries": 3}));
        let line = json_line(&r).unwrap();
        assert!(!line.contains('\n'));
        let parsed: LogRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, r);
    }
}
