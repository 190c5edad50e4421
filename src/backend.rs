//! Click backends and the priority-based selector

use clap::ValueEnum;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::ClickButton;
use crate::input_simulator::ClickPrimitives;
use crate::{xtest, KeyClickError, Result};

/// The five interchangeable ways of producing a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Backend {
    /// Keyboard hook only; clicks go through the generic automation path
    KeysOnly,
    /// Generic mouse automation via enigo
    Enigo,
    /// rdev event simulation
    Rdev,
    /// `ydotool click`
    Ydotool,
    /// Raw button down/up events through X11 XTest
    Xtest,
}

impl Backend {
    pub const ALL: [Backend; 5] = [
        Backend::KeysOnly,
        Backend::Enigo,
        Backend::Rdev,
        Backend::Ydotool,
        Backend::Xtest,
    ];

    /// Identifier used in the config file and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::KeysOnly => "keys-only",
            Backend::Enigo => "enigo",
            Backend::Rdev => "rdev",
            Backend::Ydotool => "ydotool",
            Backend::Xtest => "xtest",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|backend| backend.as_str() == name)
    }

    /// Send one click of `button` through this backend
    pub fn click<P>(self, button: ClickButton, input: &mut P) -> Result<ClickOutcome>
    where
        P: ClickPrimitives + ?Sized,
    {
        match self {
            Backend::KeysOnly | Backend::Enigo => input.automation_click(button)?,
            Backend::Rdev => input.rdev_click(button.as_str())?,
            Backend::Ydotool => input.platform_click(button)?,
            Backend::Xtest => match xtest::button_event_codes(button) {
                Some((down, up)) => {
                    // Release even when the press reports an error; the press
                    // may still have reached the server.
                    let pressed = input.raw_mouse_event(down);
                    let released = input.raw_mouse_event(up);
                    pressed.and(released)?;
                }
                None => {
                    debug!("{} has no event codes for {} button", self, button);
                    return Ok(ClickOutcome::Skipped);
                }
            },
        }
        Ok(ClickOutcome::Sent)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dispatch actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Sent,
    /// Backend cannot express the button; nothing reached the OS
    Skipped,
}

/// Pick the active backend.
///
/// A `requested` backend wins if it appears in `priority`. Otherwise the first
/// recognized name in `priority` is chosen. Unknown names are skipped.
pub fn select_backend(priority: &[String], requested: Option<Backend>) -> Result<Backend> {
    if let Some(backend) = requested {
        if priority.iter().any(|name| name == backend.as_str()) {
            info!("Using requested backend {}", backend);
            return Ok(backend);
        }
        warn!(
            "Requested backend {} is not in libraries.priority, using priority order",
            backend
        );
    }

    for name in priority {
        match Backend::from_name(name) {
            Some(backend) => {
                info!("Selected backend {}", backend);
                return Ok(backend);
            }
            None => warn!("Unknown backend '{}' in libraries.priority, skipping", name),
        }
    }

    Err(KeyClickError::NoBackend)
}
