//! Trigger-key controller
//!
//! Owns the active backend and turns listener events into clicks. Events are
//! handled one at a time on the thread that calls [`Controller::run`].

use rdev::Key;
use std::fmt;
use std::sync::mpsc::Receiver;
use tracing::{error, info, warn};

use crate::backend::{select_backend, Backend, ClickOutcome};
use crate::config::{ClickButton, Config};
use crate::input_listener::{KeyPress, ListenerEvent};
use crate::input_simulator::ClickPrimitives;
use crate::Result;

/// Key that stops the program
pub const QUIT_KEY: Key = Key::Escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Listening,
    Stopped,
}

/// Why the event loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuitKey,
    Interrupt,
    HookFailed,
    /// Every sender was dropped
    Disconnected,
}

impl StopReason {
    /// Normal stops exit with status 0
    pub fn is_success(self) -> bool {
        matches!(self, StopReason::QuitKey | StopReason::Interrupt)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::QuitKey => "quit key pressed",
            StopReason::Interrupt => "interrupted",
            StopReason::HookFailed => "keyboard hook failed",
            StopReason::Disconnected => "listener disconnected",
        };
        f.write_str(text)
    }
}

pub struct Controller<P> {
    active_backend: Option<Backend>,
    trigger_key: char,
    click_button: ClickButton,
    backend_priority: Vec<String>,
    input: P,
    state: ListenerState,
}

impl<P: ClickPrimitives> Controller<P> {
    /// Select a backend and build a controller ready to listen.
    ///
    /// Fails with [`crate::KeyClickError::NoBackend`] (logged once here) when
    /// the priority list has no usable entry.
    pub fn new(config: &Config, requested: Option<Backend>, input: P) -> Result<Self> {
        let backend = select_backend(&config.backend_priority, requested).inspect_err(|e| {
            error!("{}: none of {:?} can be used", e, config.backend_priority);
        })?;

        Ok(Self {
            active_backend: Some(backend),
            trigger_key: config.trigger_key,
            click_button: config.click_button,
            backend_priority: config.backend_priority.clone(),
            input,
            state: ListenerState::Listening,
        })
    }

    pub fn active_backend(&self) -> Option<Backend> {
        self.active_backend
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn input(&self) -> &P {
        &self.input
    }

    /// Click once with the active backend.
    ///
    /// A failure re-runs backend selection without the command-line override;
    /// the missed click is not retried.
    pub fn perform_click(&mut self) {
        let Some(backend) = self.active_backend else {
            error!("Click skipped: no active backend");
            self.reselect_backend();
            return;
        };

        match backend.click(self.click_button, &mut self.input) {
            Ok(ClickOutcome::Sent) => {
                info!("Mouse {} click performed using {}", self.click_button, backend)
            }
            Ok(ClickOutcome::Skipped) => warn!(
                "{} cannot send a {} click, nothing was sent",
                backend, self.click_button
            ),
            Err(e) => {
                error!("Click failed using {}: {}", backend, e);
                self.reselect_backend();
            }
        }
    }

    fn reselect_backend(&mut self) {
        match select_backend(&self.backend_priority, None) {
            Ok(backend) => {
                if self.active_backend != Some(backend) {
                    info!(
                        "Falling back from {:?} to {}",
                        self.active_backend.map(Backend::as_str),
                        backend
                    );
                }
                self.active_backend = Some(backend);
            }
            Err(e) => {
                error!("Backend re-selection failed: {}", e);
                self.active_backend = None;
            }
        }
    }

    /// Handle one key-down event
    pub fn handle_key(&mut self, press: &KeyPress) -> ListenerState {
        if self.state == ListenerState::Stopped {
            return self.state;
        }

        info!("Key pressed: {}", press);

        if press.text == Some(self.trigger_key) {
            info!("Trigger key [{}] pressed, clicking", self.trigger_key);
            self.perform_click();
        } else if press.key == QUIT_KEY {
            self.shutdown(StopReason::QuitKey);
        }

        self.state
    }

    fn shutdown(&mut self, reason: StopReason) {
        if self.state == ListenerState::Stopped {
            return;
        }
        info!("Shutting down: {}", reason);
        self.state = ListenerState::Stopped;
    }

    /// Handle one listener message; returns the stop reason once stopped
    pub fn handle_event(&mut self, event: ListenerEvent) -> Option<StopReason> {
        match event {
            ListenerEvent::Key(press) => match self.handle_key(&press) {
                ListenerState::Listening => None,
                ListenerState::Stopped => Some(StopReason::QuitKey),
            },
            ListenerEvent::Interrupt => {
                info!("Interrupt received");
                self.shutdown(StopReason::Interrupt);
                Some(StopReason::Interrupt)
            }
            ListenerEvent::HookFailed(message) => {
                error!("Keyboard hook stopped: {}", message);
                self.shutdown(StopReason::HookFailed);
                Some(StopReason::HookFailed)
            }
        }
    }

    /// Block on `events` until the quit key, an interrupt, or a hook failure
    pub fn run(&mut self, events: &Receiver<ListenerEvent>) -> StopReason {
        info!("Mouse controller started");

        loop {
            match events.recv() {
                Ok(event) => {
                    if let Some(reason) = self.handle_event(event) {
                        return reason;
                    }
                }
                Err(_) => {
                    warn!("Input listener disconnected");
                    self.shutdown(StopReason::Disconnected);
                    return StopReason::Disconnected;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use crate::KeyClickError;
    use std::path::PathBuf;

    #[derive(Default)]
    struct CountingInput {
        clicks: usize,
        fail: bool,
    }

    impl CountingInput {
        fn attempt(&mut self) -> Result<()> {
            self.clicks += 1;
            if self.fail {
                Err(KeyClickError::SendEvent("simulated".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl ClickPrimitives for CountingInput {
        fn automation_click(&mut self, _button: ClickButton) -> Result<()> {
            self.attempt()
        }

        fn rdev_click(&mut self, _button: &str) -> Result<()> {
            self.attempt()
        }

        fn platform_click(&mut self, _button: ClickButton) -> Result<()> {
            self.attempt()
        }

        fn raw_mouse_event(&mut self, _code: u32) -> Result<()> {
            self.attempt()
        }
    }

    fn config(priority: &[&str]) -> Config {
        Config {
            trigger_key: 'z',
            click_button: ClickButton::Left,
            backend_priority: priority.iter().map(|s| s.to_string()).collect(),
            log_path: PathBuf::from("keyclick.log"),
            log_level: LogLevel::Info,
        }
    }

    #[test]
    fn new_selects_first_recognized() {
        let controller = Controller::new(&config(&["bogus", "rdev"]), None, CountingInput::default())
            .unwrap();
        assert_eq!(controller.active_backend(), Some(Backend::Rdev));
        assert_eq!(controller.state(), ListenerState::Listening);
    }

    #[test]
    fn new_fails_without_backend() {
        let result = Controller::new(&config(&["bogus"]), None, CountingInput::default());
        assert!(matches!(result, Err(KeyClickError::NoBackend)));
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut controller =
            Controller::new(&config(&["enigo"]), None, CountingInput::default()).unwrap();
        let state = controller.handle_key(&KeyPress::new(Key::KeyA, Some('a')));
        assert_eq!(state, ListenerState::Listening);
        assert_eq!(controller.input().clicks, 0);
        assert_eq!(controller.active_backend(), Some(Backend::Enigo));
    }

    #[test]
    fn stopped_controller_ignores_triggers() {
        let mut controller =
            Controller::new(&config(&["enigo"]), None, CountingInput::default()).unwrap();
        controller.handle_key(&KeyPress::new(Key::Escape, None));
        controller.handle_key(&KeyPress::new(Key::KeyZ, Some('z')));
        assert_eq!(controller.state(), ListenerState::Stopped);
        assert_eq!(controller.input().clicks, 0);
    }

    #[test]
    fn failed_reselection_clears_backend_and_recovers() {
        let mut controller =
            Controller::new(&config(&["enigo"]), None, CountingInput::default()).unwrap();
        controller.backend_priority.clear();
        controller.input.fail = true;
        controller.perform_click();
        assert_eq!(controller.active_backend(), None);

        controller.backend_priority.push("rdev".to_string());
        controller.perform_click();
        assert_eq!(controller.active_backend(), Some(Backend::Rdev));
        assert_eq!(controller.input().clicks, 1);
    }

    #[test]
    fn stop_reasons_map_to_success() {
        assert!(StopReason::QuitKey.is_success());
        assert!(StopReason::Interrupt.is_success());
        assert!(!StopReason::HookFailed.is_success());
        assert!(!StopReason::Disconnected.is_success());
    }
}
