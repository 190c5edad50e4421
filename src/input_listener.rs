//! Global key listening using rdev

use rdev::{listen, Event, EventType, Key};
use std::fmt;
use std::sync::mpsc;
use std::thread;
use tracing::{error, info};

/// A resolved key-down event
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    /// Physical key
    pub key: Key,

    /// Printable character produced by the key, if any
    pub text: Option<char>,
}

impl KeyPress {
    pub fn new(key: Key, text: Option<char>) -> Self {
        Self { key, text }
    }

    /// Resolve an rdev event, ignoring everything but key presses
    pub fn from_event(event: &Event) -> Option<Self> {
        match event.event_type {
            EventType::KeyPress(key) => Some(Self {
                key,
                text: printable_char(event.name.as_deref()),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "{:?}", self.key),
        }
    }
}

fn printable_char(name: Option<&str>) -> Option<char> {
    let mut chars = name?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Messages delivered to the controller loop
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    Key(KeyPress),
    /// Ctrl+C or SIGINT
    Interrupt,
    /// The keyboard hook could not be installed or died
    HookFailed(String),
}

/// Input listener that captures global key events
pub struct InputListener {
    sender: mpsc::Sender<ListenerEvent>,
}

impl InputListener {
    /// Create a new InputListener with the given channel sender
    pub fn new(sender: mpsc::Sender<ListenerEvent>) -> Self {
        Self { sender }
    }

    /// Start listening for key events in a background thread
    ///
    /// rdev's hook blocks for the life of the process, so it lives on its own
    /// thread and forwards key presses through the channel. The controller
    /// consumes them one at a time on the main thread.
    pub fn start(self) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            info!("Input listener started");

            let sender = self.sender;
            let hook_sender = sender.clone();

            let callback = move |event: Event| {
                if let Some(press) = KeyPress::from_event(&event) {
                    if let Err(e) = hook_sender.send(ListenerEvent::Key(press)) {
                        error!("Failed to forward key event: {}", e);
                    }
                }
            };

            if let Err(e) = listen(callback) {
                error!("Error in input listener: {:?}", e);
                let _ = sender.send(ListenerEvent::HookFailed(format!("{:?}", e)));
            }
        })
    }
}

/// Create a channel for listener events and return both ends
pub fn create_event_channel() -> (mpsc::Sender<ListenerEvent>, mpsc::Receiver<ListenerEvent>) {
    mpsc::channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn event(event_type: EventType, name: Option<&str>) -> Event {
        Event {
            time: SystemTime::now(),
            name: name.map(str::to_string),
            event_type,
        }
    }

    #[test]
    fn resolves_printable_key() {
        let press = KeyPress::from_event(&event(EventType::KeyPress(Key::KeyZ), Some("z"))).unwrap();
        assert_eq!(press, KeyPress::new(Key::KeyZ, Some('z')));
        assert_eq!(press.to_string(), "z");
    }

    #[test]
    fn control_characters_resolve_to_key_name() {
        let press =
            KeyPress::from_event(&event(EventType::KeyPress(Key::Escape), Some("\u{1b}"))).unwrap();
        assert_eq!(press.text, None);
        assert_eq!(press.to_string(), "Escape");
    }

    #[test]
    fn releases_and_mouse_events_are_ignored() {
        assert!(KeyPress::from_event(&event(EventType::KeyRelease(Key::KeyZ), None)).is_none());
        assert!(
            KeyPress::from_event(&event(EventType::ButtonPress(rdev::Button::Left), None)).is_none()
        );
    }

    #[test]
    fn multi_character_names_are_not_text() {
        assert_eq!(printable_char(Some("ab")), None);
        assert_eq!(printable_char(None), None);
        assert_eq!(printable_char(Some("é")), Some('é'));
    }
}
