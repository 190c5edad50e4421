//! Platform clicks using ydotool
//!
//! Uses ydotool to send mouse events via uinput at the kernel level.
//! Works on Wayland by bypassing the display server entirely.
//! Requires ydotoold daemon to be running: sudo systemctl enable --now ydotoold

use std::process::Command;
use tracing::{debug, info};

use crate::config::ClickButton;
use crate::{KeyClickError, Result};

/// Get the ydotool socket path
fn get_socket_path() -> String {
    let uid = unsafe { libc::getuid() };
    format!("/run/user/{}/.ydotool_socket", uid)
}

/// ydotool button code with the press (0x40) and release (0x80) bits set
fn click_code(button: ClickButton) -> &'static str {
    match button {
        ClickButton::Left => "0xC0",
        ClickButton::Right => "0xC1",
        ClickButton::Middle => "0xC2",
    }
}

/// Sends clicks by shelling out to ydotool
pub struct YdotoolClicker {
    socket_path: String,
}

impl YdotoolClicker {
    /// Check that ydotool is installed and reachable
    pub fn new() -> Result<Self> {
        let output = Command::new("which")
            .arg("ydotool")
            .output()
            .map_err(|e| KeyClickError::InputAccess(format!("Failed to check for ydotool: {}", e)))?;

        if !output.status.success() {
            return Err(KeyClickError::InputAccess(
                "ydotool not found in PATH".to_string(),
            ));
        }

        info!("ydotool found");
        Ok(Self {
            socket_path: get_socket_path(),
        })
    }

    fn run_ydotool(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("ydotool")
            .env("YDOTOOL_SOCKET", &self.socket_path)
            .args(args)
            .output()
            .map_err(|e| KeyClickError::SendEvent(format!("Failed to run ydotool: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KeyClickError::SendEvent(format!("ydotool failed: {}", stderr.trim())));
        }

        Ok(())
    }

    /// Send a click (press and release)
    pub fn click(&mut self, button: ClickButton) -> Result<()> {
        debug!("Sending {} click via ydotool", button);
        self.run_ydotool(&["click", click_code(button)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_codes_set_press_and_release_bits() {
        assert_eq!(click_code(ClickButton::Left), "0xC0");
        assert_eq!(click_code(ClickButton::Right), "0xC1");
        assert_eq!(click_code(ClickButton::Middle), "0xC2");
    }

    #[test]
    fn socket_path_is_per_user() {
        let uid = unsafe { libc::getuid() };
        assert_eq!(get_socket_path(), format!("/run/user/{}/.ydotool_socket", uid));
    }
}
