//! Raw mouse button events through the X11 XTest extension
//!
//! Clicks are described as a pair of numeric event codes (button down, then
//! button up). Only left and right have codes; there is no middle pair.

use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{Window, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;
use x11rb::CURRENT_TIME;

use crate::config::ClickButton;
use crate::{KeyClickError, Result};

pub const LEFT_DOWN: u32 = 0x0002;
pub const LEFT_UP: u32 = 0x0004;
pub const RIGHT_DOWN: u32 = 0x0008;
pub const RIGHT_UP: u32 = 0x0010;

/// Down/up codes for `button`, or `None` if it has no raw representation
pub fn button_event_codes(button: ClickButton) -> Option<(u32, u32)> {
    match button {
        ClickButton::Left => Some((LEFT_DOWN, LEFT_UP)),
        ClickButton::Right => Some((RIGHT_DOWN, RIGHT_UP)),
        ClickButton::Middle => None,
    }
}

/// Map an event code to an X event type and core button number
fn x_event_for(code: u32) -> Option<(u8, u8)> {
    match code {
        LEFT_DOWN => Some((BUTTON_PRESS_EVENT, 1)),
        LEFT_UP => Some((BUTTON_RELEASE_EVENT, 1)),
        RIGHT_DOWN => Some((BUTTON_PRESS_EVENT, 3)),
        RIGHT_UP => Some((BUTTON_RELEASE_EVENT, 3)),
        _ => None,
    }
}

/// Holds an X connection with XTest available
pub struct XTestClicker {
    conn: RustConnection,
    root: Window,
}

impl XTestClicker {
    /// Connect to the X server and check for XTest
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| KeyClickError::InputAccess(format!("Failed to connect to X11: {}", e)))?;

        let has_xtest = conn
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(|e| KeyClickError::InputAccess(format!("X11 query failed: {}", e)))?
            .is_some();
        if !has_xtest {
            return Err(KeyClickError::InputAccess(
                "X server does not support XTest".to_string(),
            ));
        }

        let root = conn.setup().roots[screen_num].root;
        info!("Connected to X11 with XTest");
        Ok(Self { conn, root })
    }

    /// Send one raw event code
    pub fn send_raw(&mut self, code: u32) -> Result<()> {
        let (event_type, detail) = x_event_for(code)
            .ok_or_else(|| KeyClickError::SendEvent(format!("unknown mouse event code {}", code)))?;

        debug!("XTest fake input type={} button={}", event_type, detail);
        self.conn
            .xtest_fake_input(event_type, detail, CURRENT_TIME, self.root, 0, 0, 0)
            .map_err(|e| KeyClickError::SendEvent(format!("XTest: {}", e)))?
            .check()
            .map_err(|e| KeyClickError::SendEvent(format!("XTest: {}", e)))?;
        self.conn
            .flush()
            .map_err(|e| KeyClickError::SendEvent(format!("X11 flush: {}", e)))
    }
}
