//! Configuration loading for keyclick
//!
//! The settings file is TOML:
//!
//! ```toml
//! [logging]
//! file_path = "logs/keyclick.log"
//! level = "info"
//!
//! [key_bindings]
//! trigger_key = "z"
//! click_type = "left"
//!
//! [libraries]
//! priority = ["enigo", "rdev", "xtest"]
//! ```

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{KeyClickError, Result};

/// Mouse button sent on each trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickButton {
    Left,
    Right,
    Middle,
}

impl ClickButton {
    pub fn as_str(self) -> &'static str {
        match self {
            ClickButton::Left => "left",
            ClickButton::Right => "right",
            ClickButton::Middle => "middle",
        }
    }
}

impl fmt::Display for ClickButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log severity threshold
///
/// Accepts the usual names case-insensitively, plus `warning` and
/// `critical` as aliases for `warn` and `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = KeyClickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "critical" => Ok(LogLevel::Error),
            other => Err(KeyClickError::Config(format!("unknown log level '{}'", other))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = KeyClickError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// On-disk layout. Kept private; `Config` is the validated form.

#[derive(Debug, Deserialize)]
struct ConfigFile {
    logging: LoggingSection,
    key_bindings: KeyBindingsSection,
    libraries: LibrariesSection,
}

#[derive(Debug, Deserialize)]
struct LoggingSection {
    file_path: PathBuf,
    level: LogLevel,
}

#[derive(Debug, Deserialize)]
struct KeyBindingsSection {
    trigger_key: String,
    click_type: ClickButton,
}

#[derive(Debug, Deserialize)]
struct LibrariesSection {
    priority: Vec<String>,
}

/// Settings loaded once at startup and read-only afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Character that fires a click
    pub trigger_key: char,

    /// Button to click
    pub click_button: ClickButton,

    /// Backend names in preference order. Unknown names are kept so the
    /// selector can warn about them.
    pub backend_priority: Vec<String>,

    /// Log file destination
    pub log_path: PathBuf,

    /// Log severity threshold
    pub log_level: LogLevel,
}

impl Config {
    /// Read and validate the config file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| KeyClickError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate config text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        let trigger_key = single_char(&file.key_bindings.trigger_key)?;

        Ok(Self {
            trigger_key,
            click_button: file.key_bindings.click_type,
            backend_priority: file.libraries.priority,
            log_path: file.logging.file_path,
            log_level: file.logging.level,
        })
    }
}

fn single_char(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(KeyClickError::Config(format!(
            "key_bindings.trigger_key must be a single character, got {:?}",
            value
        ))),
    }
}
