//! keyclick - turns a configured trigger key into a synthetic mouse click
//!
//! This library provides components for:
//! - Configuration loading (TOML)
//! - Backend selection with priority fallback
//! - Global key listening
//! - Click dispatch through several input-automation backends

pub mod backend;
pub mod config;
pub mod controller;
pub mod input_listener;
pub mod input_simulator;
pub mod logging;
pub mod xtest;
pub mod ydotool;

pub use backend::{select_backend, Backend, ClickOutcome};
pub use config::{ClickButton, Config, LogLevel};
pub use controller::{Controller, ListenerState, StopReason};
pub use input_listener::{InputListener, KeyPress, ListenerEvent};
pub use input_simulator::{ClickPrimitives, SystemInput};

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for keyclick
#[derive(Error, Debug)]
pub enum KeyClickError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read config at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("No available mouse control backend")]
    NoBackend,

    #[error("Failed to access input backend: {0}")]
    InputAccess(String),

    #[error("Failed to send input event: {0}")]
    SendEvent(String),

    #[error("Unsupported mouse button: {0}")]
    UnsupportedButton(String),

    #[error("Failed to set up logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, KeyClickError>;
