//! Click primitives used by the backends
//!
//! Each backend maps onto one primitive. `SystemInput` opens the underlying
//! devices lazily, so a backend that cannot start fails on its first click
//! and the controller falls back to another one.

use enigo::{Direction, Enigo, Mouse, Settings};
use rdev::{simulate, Button, EventType};
use std::thread;
use std::time::Duration;
use tracing::debug;

use crate::config::ClickButton;
use crate::xtest::XTestClicker;
use crate::ydotool::YdotoolClicker;
use crate::{KeyClickError, Result};

/// rdev drops events sent back to back on some platforms
const RDEV_EVENT_GAP: Duration = Duration::from_millis(20);

/// Low-level click operations, one per backend family
pub trait ClickPrimitives {
    /// Press and release `button` through the generic automation library
    fn automation_click(&mut self, button: ClickButton) -> Result<()>;

    /// Click through rdev; the button is given by name
    fn rdev_click(&mut self, button: &str) -> Result<()>;

    /// Click through the platform click tool
    fn platform_click(&mut self, button: ClickButton) -> Result<()>;

    /// Emit one raw mouse event code (see [`crate::xtest`])
    fn raw_mouse_event(&mut self, code: u32) -> Result<()>;
}

/// Real input devices, opened on first use
#[derive(Default)]
pub struct SystemInput {
    enigo: Option<Enigo>,
    ydotool: Option<YdotoolClicker>,
    xtest: Option<XTestClicker>,
}

impl SystemInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn enigo(&mut self) -> Result<&mut Enigo> {
        if self.enigo.is_none() {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| KeyClickError::InputAccess(format!("enigo: {}", e)))?;
            self.enigo = Some(enigo);
        }
        self.enigo
            .as_mut()
            .ok_or_else(|| KeyClickError::InputAccess("enigo not initialized".to_string()))
    }

    fn ydotool(&mut self) -> Result<&mut YdotoolClicker> {
        if self.ydotool.is_none() {
            self.ydotool = Some(YdotoolClicker::new()?);
        }
        self.ydotool
            .as_mut()
            .ok_or_else(|| KeyClickError::InputAccess("ydotool not initialized".to_string()))
    }

    fn xtest(&mut self) -> Result<&mut XTestClicker> {
        if self.xtest.is_none() {
            self.xtest = Some(XTestClicker::new()?);
        }
        self.xtest
            .as_mut()
            .ok_or_else(|| KeyClickError::InputAccess("XTest not initialized".to_string()))
    }
}

impl ClickPrimitives for SystemInput {
    fn automation_click(&mut self, button: ClickButton) -> Result<()> {
        let button = match button {
            ClickButton::Left => enigo::Button::Left,
            ClickButton::Right => enigo::Button::Right,
            ClickButton::Middle => enigo::Button::Middle,
        };
        debug!("Sending {:?} click via enigo", button);
        self.enigo()?
            .button(button, Direction::Click)
            .map_err(|e| KeyClickError::SendEvent(format!("enigo: {}", e)))
    }

    fn rdev_click(&mut self, button: &str) -> Result<()> {
        let button = rdev_button(button)?;
        debug!("Sending {:?} click via rdev", button);
        send_rdev(&EventType::ButtonPress(button))?;
        thread::sleep(RDEV_EVENT_GAP);
        send_rdev(&EventType::ButtonRelease(button))
    }

    fn platform_click(&mut self, button: ClickButton) -> Result<()> {
        self.ydotool()?.click(button)
    }

    fn raw_mouse_event(&mut self, code: u32) -> Result<()> {
        self.xtest()?.send_raw(code)
    }
}

fn rdev_button(name: &str) -> Result<Button> {
    match name {
        "left" => Ok(Button::Left),
        "right" => Ok(Button::Right),
        "middle" => Ok(Button::Middle),
        other => Err(KeyClickError::UnsupportedButton(other.to_string())),
    }
}

fn send_rdev(event: &EventType) -> Result<()> {
    simulate(event).map_err(|e| KeyClickError::SendEvent(format!("rdev {:?}: {:?}", event, e)))
}
