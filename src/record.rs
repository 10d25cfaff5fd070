//! Log records and the call-site metadata attached to them.

use std::panic::Location;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::{Level, Result};

/// Local time, or UTC when the local offset cannot be determined.
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Current time as `YYYY-MM-DD HH:MM:SS.mmm`.
pub fn record_timestamp() -> Result<String> {
    Ok(now().format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ))?)
}

/// Current time as `YYYY-MM-DD_HH-MM-SS`, used in generated file names.
pub fn session_timestamp() -> Result<String> {
    Ok(now().format(format_description!(
        "[year]-[month]-[day]_[hour]-[minute]-[second]"
    ))?)
}

/// Source location of the logical call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub module: &'static str,
    /// Enclosing function, when the call came through a macro.
    pub function: Option<&'static str>,
    pub line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, module: &'static str, line: u32) -> Self {
        Self {
            file,
            module,
            function: None,
            line,
        }
    }

    /// Attach the enclosing function's name.
    pub const fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// Name recorded in the `Module` field: the function when known.
    pub fn label(&self) -> &'static str {
        self.function.unwrap_or(self.module)
    }

    /// Call site of the nearest `#[track_caller]` boundary.
    ///
    /// `Location` carries no module path, so the module is taken from the file
    /// stem (`mod.rs` resolves to its directory name).
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(
            location.file(),
            module_from_file(location.file()),
            location.line(),
        )
    }
}

/// Reduce the type name of a marker `fn` nested in a function body to the
/// enclosing function's name.
///
/// `app::server::run::f` becomes `run`; closure segments are skipped so a
/// call inside `run`'s closure still reports `run`.
#[doc(hidden)]
pub fn function_name(marker_type_name: &'static str) -> &'static str {
    let mut path = marker_type_name
        .strip_suffix("::f")
        .unwrap_or(marker_type_name);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

fn module_from_file(file: &'static str) -> &'static str {
    let path = Path::new(file);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file);
    if stem == "mod" {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or(stem)
    } else {
        stem
    }
}

/// A single log entry as persisted to file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Empty when timestamps were suppressed for this record.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Level")]
    pub level: Level,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Module")]
    pub module: String,
    #[serde(rename = "Line")]
    pub line: u32,
    #[serde(rename = "Message")]
    pub message: Value,
}

impl LogRecord {
    pub fn new(timestamp: String, level: Level, site: CallSite, message: Value) -> Self {
        Self {
            timestamp,
            level,
            path: site.file.to_string(),
            module: site.label().to_string(),
            line: site.line,
            message,
        }
    }

    /// Message as display text; strings are unquoted.
    pub fn message_text(&self) -> String {
        match &self.message {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Convert any serializable message into a JSON value, or a placeholder string
/// when serialization fails.
pub fn message_value<M: Serialize>(message: &M) -> Value {
    serde_json::to_value(message)
        .unwrap_or_else(|e| Value::String(format!("<unserializable message: {}>", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_timestamp_shape() {
        let ts = record_timestamp().unwrap();
        // 2026-01-09 13:45:12.345
        assert_eq!(ts.len(), 23);
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[19..20], ".");
    }

    #[test]
    fn test_session_timestamp_shape() {
        let ts = session_timestamp().unwrap();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "_");
        assert!(!ts.contains(':'));
    }

    #[test]
    fn test_call_site_caller() {
        let site = CallSite::caller();
        assert!(site.file.ends_with("record.rs"));
        assert_eq!(site.module, "record");
        assert!(site.line > 0);
    }

    #[test]
    fn test_module_from_mod_rs() {
        assert_eq!(module_from_file("src/net/mod.rs"), "net");
        assert_eq!(module_from_file("src/net/server.rs"), "server");
    }

    #[test]
    fn test_function_name_from_marker() {
        assert_eq!(function_name("app::server::run::f"), "run");
        assert_eq!(function_name("app::server::run::{{closure}}::f"), "run");
        assert_eq!(function_name("main::f"), "main");
    }

    #[test]
    fn test_record_prefers_function_over_module() {
        let site = CallSite::new("src/server.rs", "server", 12).with_function("accept");
        let record = LogRecord::new(String::new(), Level::Info, site, json!("conn"));
        assert_eq!(record.module, "accept");

        let bare = LogRecord::new(String::new(), Level::Info, CallSite::caller(), json!("x"));
        assert_eq!(bare.module, "record");
    }

    #[test]
    fn test_record_serializes_with_capitalized_keys() {
        let record = LogRecord::new(
            String::new(),
            Level::Info,
            CallSite::new("src/main.rs", "app", 7),
            json!("boot"),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "Timestamp": "",
                "Level": "INFO",
                "Path": "src/main.rs",
                "Module": "app",
                "Line": 7,
                "Message": "boot"
            })
        );
    }

    #[test]
    fn test_message_text() {
        let site = CallSite::new("a.rs", "a", 1);
        let plain = LogRecord::new(String::new(), Level::Debug, site, json!("hello"));
        assert_eq!(plain.message_text(), "hello");

        let structured = LogRecord::new(String::new(), Level::Debug, site, json!({"k": 1}));
        assert_eq!(structured.message_text(), r#"{"k":1}"#);
    }
}
