//! Log file setup

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::{KeyClickError, Result};

/// Install the global subscriber writing timestamped lines to the
/// configured log file (appending, parent directories created).
pub fn init(config: &Config) -> Result<()> {
    let path = &config.log_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| KeyClickError::Logging(format!("{}: {}", parent.display(), e)))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| KeyClickError::Logging(format!("{}: {}", path.display(), e)))?;

    FmtSubscriber::builder()
        .with_max_level(Level::from(config.log_level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| KeyClickError::Logging(e.to_string()))
}
