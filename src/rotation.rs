use std::fs::{self, File, OpenOptions};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serializer, de};

use crate::{Error, Result, SaveFormat};

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a size expressed in megabytes to bytes.
pub fn megabytes(mb: f64) -> Result<u64> {
    scaled(mb, MIB).map_err(Error::Config)
}

fn scaled(num: f64, multiplier: f64) -> std::result::Result<u64, String> {
    if !num.is_finite() || num < 0.0 {
        return Err(format!("size must be a non-negative number, got {}", num));
    }
    let bytes = num * multiplier;
    if bytes > u64::MAX as f64 {
        return Err("size too large".to_string());
    }
    Ok(bytes as u64)
}

/// Parse a size string with optional units (B/K/M/G, case-insensitive), defaulting to MB if no unit.
fn parse_size(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let Some(last) = s.chars().last() else {
        return Err("empty size string".to_string());
    };

    let (num_str, unit) = if last.is_alphabetic() {
        (&s[..s.len() - last.len_utf8()], last.to_ascii_uppercase())
    } else {
        (s, 'M') // Default to MB
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    let multiplier = match unit {
        'B' => 1.0,
        'K' => KIB,
        'M' => MIB,
        'G' => GIB,
        _ => return Err(format!("invalid unit: {}, supported: B/K/M/G", unit)),
    };

    scaled(num, multiplier)
}

/// Size value that can be a number (megabytes) or string with units.
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Number(f64),
    String(String),
}

impl SizeValue {
    fn to_bytes(&self) -> std::result::Result<u64, String> {
        match self {
            SizeValue::Number(n) => scaled(*n, MIB),
            SizeValue::String(s) => parse_size(s),
        }
    }
}

pub(crate) fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    SizeValue::deserialize(deserializer)?
        .to_bytes()
        .map_err(de::Error::custom)
}

/// Sizes are written back in bytes so they survive a round trip unchanged.
pub(crate) fn serialize_size<S>(bytes: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{}B", bytes))
}

/// The file currently receiving records.
#[derive(Debug)]
struct ActiveFile {
    path: PathBuf,
    file: File,
}

impl ActiveFile {
    /// Create (or truncate) a file at `path`.
    fn create(path: PathBuf) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self { path, file })
    }
}

/// Owns the active log file and replaces it once it grows past a threshold.
///
/// Files are named `{dir_name}_{session_start}({counter}).{ext}`; the counter
/// starts at 1 and increases by one for every new file.
#[derive(Debug)]
pub struct RotationManager {
    dir: PathBuf,
    dir_name: String,
    session_start: String,
    extension: &'static str,
    max_size: u64,
    counter: u32,
    active: ActiveFile,
}

impl RotationManager {
    /// Create the first log file of a session, truncated empty.
    pub fn new(
        dir: &Path,
        dir_name: &str,
        session_start: &str,
        format: SaveFormat,
        max_size: u64,
    ) -> Result<Self> {
        let counter = 1;
        let path = dir.join(file_name(dir_name, session_start, counter, format.extension()));
        let active = ActiveFile::create(path.clone())
            .map_err(|source| Error::Rotation { path, source })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            dir_name: dir_name.to_string(),
            session_start: session_start.to_string(),
            extension: format.extension(),
            max_size,
            counter,
            active,
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.active.path
    }

    /// Counter of the active file.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Threshold in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Start a new file if the active one has reached the size threshold.
    ///
    /// Returns whether a rotation took place.
    pub fn check_and_rotate(&mut self) -> Result<bool> {
        let size = fs::metadata(&self.active.path)
            .map_err(|source| Error::Rotation {
                path: self.active.path.clone(),
                source,
            })?
            .len();

        if size < self.max_size {
            return Ok(false);
        }

        let next = self.counter + 1;
        let path = self.dir.join(file_name(
            &self.dir_name,
            &self.session_start,
            next,
            self.extension,
        ));
        let active = ActiveFile::create(path.clone())
            .map_err(|source| Error::Rotation { path, source })?;

        tracing::debug!(
            from = %self.active.path.display(),
            to = %active.path.display(),
            size,
            "rotated log file"
        );

        self.active = active;
        self.counter = next;
        Ok(true)
    }

    /// Append one line (a newline is added) to the active file.
    pub fn append_line(&mut self, line: &str) -> Result<()> {
        let file = &mut self.active.file;
        file.write_all(line.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.flush())
            .map_err(|source| Error::Write {
                path: self.active.path.clone(),
                source,
            })
    }

    /// Replace the whole content of the active file.
    pub fn overwrite(&mut self, contents: &[u8]) -> Result<()> {
        let file = &mut self.active.file;
        file.set_len(0)
            .and_then(|_| file.rewind())
            .and_then(|_| file.write_all(contents))
            .and_then(|_| file.flush())
            .map_err(|source| Error::Write {
                path: self.active.path.clone(),
                source,
            })
    }
}

fn file_name(dir_name: &str, session_start: &str, counter: u32, extension: &str) -> String {
    format!("{}_{}({}).{}", dir_name, session_start, counter, extension)
}
