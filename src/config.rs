use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rotation::{deserialize_size, serialize_size};
use crate::{Error, Result};

/// Persisted file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    Json,
    Txt,
}

impl SaveFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Json => "json",
            SaveFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SaveFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SaveFormat::Json),
            "txt" => Ok(SaveFormat::Txt),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

/// Configuration for a logger
///
/// Every field has a default, so a partial YAML or TOML document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Render console lines with ANSI colors
    pub color: bool,
    /// Include a timestamp unless a call overrides it
    pub show_time: bool,
    /// Minimum level that is echoed or persisted (e.g., "info", "WARNING")
    pub min_priority: String,
    /// Persisted format ("json" or "txt")
    pub save_format: String,
    /// Directory for log files; `None` means console only
    pub output_dir: Option<PathBuf>,
    /// Subdirectory name and file name prefix
    pub dir_name: String,
    /// Seconds the writer pauses after each record
    pub flush_interval: f64,
    /// Rotation threshold in bytes.
    /// Can be specified as a number (megabytes) or string with units (B/K/M/G, case-insensitive).
    /// Examples: 5 (5MB), 0.5 (512KB), "512K", "1G"
    #[serde(
        deserialize_with = "deserialize_size",
        serialize_with = "serialize_size"
    )]
    pub max_file_size: u64,
    /// Echo records to stdout unless a call overrides it
    pub console: bool,
    /// Keep every record of the session and rewrite the file as one JSON document
    pub aggregate_json: bool,
    /// Place files under `output_dir/dir_name` instead of `output_dir`
    pub create_subdirectory: bool,
    /// Terminate the process when the background writer fails
    pub exit_on_failure: bool,
}

impl LoggerConfig {
    /// Create a new LoggerConfig with defaults
    pub fn new() -> Self {
        Self {
            color: false,
            show_time: false,
            min_priority: default_priority(),
            save_format: default_save_format(),
            output_dir: None,
            dir_name: default_dir_name(),
            flush_interval: 0.0,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            console: true,
            aggregate_json: false,
            create_subdirectory: true,
            exit_on_failure: true,
        }
    }

    /// Enable colored console output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set the default timestamp policy
    pub fn with_show_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    /// Set the minimum priority
    pub fn with_min_priority(mut self, level: String) -> Self {
        self.min_priority = level;
        self
    }

    /// Set the save format
    pub fn with_save_format(mut self, format: String) -> Self {
        self.save_format = format;
        self
    }

    /// Write files below `dir`
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the directory and file prefix name
    pub fn with_dir_name(mut self, name: String) -> Self {
        self.dir_name = name;
        self
    }

    /// Set the post-write pause in seconds
    pub fn with_flush_interval(mut self, seconds: f64) -> Self {
        self.flush_interval = seconds;
        self
    }

    /// Set the rotation threshold in bytes
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the default console echo policy
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Enable the session-aggregated JSON document
    pub fn with_aggregate_json(mut self, aggregate: bool) -> Self {
        self.aggregate_json = aggregate;
        self
    }

    /// Choose whether files go into a `dir_name` subdirectory
    pub fn with_create_subdirectory(mut self, create: bool) -> Self {
        self.create_subdirectory = create;
        self
    }

    /// Choose whether writer failures terminate the process
    pub fn with_exit_on_failure(mut self, exit: bool) -> Self {
        self.exit_on_failure = exit;
        self
    }

    /// Parse and check the string-typed and numeric fields.
    pub fn validate(&self) -> Result<ValidatedSettings> {
        let min_priority = self.min_priority.parse::<crate::Level>()?;
        let save_format = self.save_format.parse::<SaveFormat>()?;

        if !self.flush_interval.is_finite() || self.flush_interval < 0.0 {
            return Err(Error::Config(format!(
                "flush_interval must be a non-negative number of seconds, got {}",
                self.flush_interval
            )));
        }
        if self.output_dir.is_some() && self.dir_name.trim().is_empty() {
            return Err(Error::Config("dir_name must not be empty".to_string()));
        }

        let flush_interval = Duration::try_from_secs_f64(self.flush_interval).map_err(|e| {
            Error::Config(format!(
                "flush_interval of {} seconds is out of range: {}",
                self.flush_interval, e
            ))
        })?;

        Ok(ValidatedSettings {
            min_priority,
            save_format,
            flush_interval,
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed values derived from a [`LoggerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedSettings {
    pub min_priority: crate::Level,
    pub save_format: SaveFormat,
    pub flush_interval: Duration,
}

const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

fn default_priority() -> String {
    "DEBUG".to_string()
}

fn default_save_format() -> String {
    "json".to_string()
}

fn default_dir_name() -> String {
    "myLog".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn test_logger_config_new() {
        let config = LoggerConfig::new();
        assert!(!config.color);
        assert!(!config.show_time);
        assert_eq!(config.min_priority, "DEBUG");
        assert_eq!(config.save_format, "json");
        assert!(config.output_dir.is_none());
        assert_eq!(config.dir_name, "myLog");
        assert_eq!(config.flush_interval, 0.0);
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert!(config.console);
        assert!(!config.aggregate_json);
        assert!(config.create_subdirectory);
        assert!(config.exit_on_failure);
    }

    #[test]
    fn test_logger_config_default() {
        assert_eq!(LoggerConfig::default(), LoggerConfig::new());
    }

    #[test]
    fn test_logger_config_chaining() {
        let config = LoggerConfig::new()
            .with_color(true)
            .with_show_time(true)
            .with_min_priority("warning".to_string())
            .with_save_format("TXT".to_string())
            .with_output_dir("/tmp/logs")
            .with_dir_name("svc".to_string())
            .with_flush_interval(0.25)
            .with_max_file_size(1024)
            .with_console(false)
            .with_aggregate_json(true)
            .with_create_subdirectory(false)
            .with_exit_on_failure(false);

        assert!(config.color);
        assert!(config.show_time);
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.dir_name, "svc");
        assert_eq!(config.max_file_size, 1024);
        assert!(!config.console);
        assert!(config.aggregate_json);
        assert!(!config.create_subdirectory);
        assert!(!config.exit_on_failure);

        let settings = config.validate().unwrap();
        assert_eq!(settings.min_priority, Level::Warning);
        assert_eq!(settings.save_format, SaveFormat::Txt);
        assert_eq!(settings.flush_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_validate_rejects_bad_format() {
        let config = LoggerConfig::new().with_save_format("xml".to_string());
        assert!(matches!(config.validate(), Err(Error::InvalidFormat(f)) if f == "xml"));
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let config = LoggerConfig::new().with_min_priority("verbose".to_string());
        assert!(matches!(config.validate(), Err(Error::InvalidLevel(_))));
    }

    #[test]
    fn test_validate_rejects_negative_interval() {
        let config = LoggerConfig::new().with_flush_interval(-1.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_interval() {
        let config = LoggerConfig::new().with_flush_interval(1e20);
        assert!(matches!(config.validate(), Err(Error::Config(msg)) if msg.contains("out of range")));
        assert!(crate::Logger::new(config).is_err());
    }

    #[test]
    fn test_save_format_parse() {
        assert_eq!(" Json ".parse::<SaveFormat>().unwrap(), SaveFormat::Json);
        assert_eq!("txt".parse::<SaveFormat>().unwrap(), SaveFormat::Txt);
        assert!("csv".parse::<SaveFormat>().is_err());
        assert_eq!(SaveFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
color: true
min_priority: warning
save_format: txt
output_dir: /var/log/app
max_file_size: "512K"
aggregate_json: true
"#;
        let config: LoggerConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.color);
        assert_eq!(config.min_priority, "warning");
        assert_eq!(config.save_format, "txt");
        assert_eq!(config.output_dir, Some(PathBuf::from("/var/log/app")));
        assert_eq!(config.max_file_size, 512 * 1024);
        assert!(config.aggregate_json);
        // untouched fields keep their defaults
        assert_eq!(config.dir_name, "myLog");
        assert!(config.console);
    }

    #[test]
    fn test_deserialize_toml() {
        let toml_str = r#"
dir_name = "service"
flush_interval = 0.5
max_file_size = 2
console = false
"#;
        let config: LoggerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dir_name, "service");
        assert_eq!(config.flush_interval, 0.5);
        assert_eq!(config.max_file_size, 2 * 1024 * 1024);
        assert!(!config.console);
    }

    #[test]
    fn test_deserialize_fractional_megabytes() {
        let config: LoggerConfig = serde_yaml::from_str("max_file_size: 0.25").unwrap();
        assert_eq!(config.max_file_size, 256 * 1024);
    }

    #[test]
    fn test_deserialize_rejects_bad_size() {
        assert!(serde_yaml::from_str::<LoggerConfig>("max_file_size: \"ten\"").is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = LoggerConfig::new()
            .with_max_file_size(12345)
            .with_output_dir("logs");
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: LoggerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
