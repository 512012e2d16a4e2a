//! Scripted session double.
//!
//! Plays back an ordered list of screen frames: every AID key (a bracketed
//! mnemonic other than local cursor movement) advances to the next frame,
//! the way a block terminal repaints after host-side processing. Typed
//! text and cursor keys never repaint. Used by the test suite and by
//! `greenline run --screens <file>` for offline end-to-end runs.

use std::cell::Cell;
use std::collections::VecDeque;
use std::path::Path;

use crate::error::{GreenlineError, Result};
use crate::workflow::StepDefinition;

use super::{SessionFactory, TerminalSession};

/// Frame separator in a screens file.
const FRAME_SEPARATOR: &str = "---";

/// An in-memory terminal session backed by canned screen frames.
#[derive(Debug)]
pub struct ScriptedSession {
    connected: bool,
    current: String,
    frames: VecDeque<String>,
    /// How many `is_busy` polls report true after each AID key.
    busy_polls: u32,
    busy_remaining: Cell<u32>,
    sent: Vec<String>,
}

impl ScriptedSession {
    /// Session with no frames: every screen reads as empty.
    pub fn new() -> Self {
        Self::from_frames(Vec::new())
    }

    /// Session that presents `frames` in order; the first frame becomes
    /// the screen shown after connect.
    pub fn from_frames(frames: Vec<String>) -> Self {
        Self {
            connected: false,
            current: String::new(),
            frames: frames.into(),
            busy_polls: 0,
            busy_remaining: Cell::new(0),
            sent: Vec::new(),
        }
    }

    /// Number of `is_busy() == true` polls to report after each AID key.
    /// Zero (the default) means the lock is never observed to engage.
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Keys sent so far, in order.
    pub fn sent_keys(&self) -> &[String] {
        &self.sent
    }

    /// Whether `keys` is an AID mnemonic that triggers host processing,
    /// as opposed to local cursor movement or typed text.
    fn is_aid_key(keys: &str) -> bool {
        keys.starts_with('[') && keys.ends_with(']') && keys != "[tab]" && keys != "[home]"
    }

    fn advance_frame(&mut self) {
        if let Some(next) = self.frames.pop_front() {
            self.current = next;
        }
        self.busy_remaining.set(self.busy_polls);
    }
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSession for ScriptedSession {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        if let Some(first) = self.frames.pop_front() {
            self.current = first;
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Err(GreenlineError::Session {
                message: "session already closed".into(),
            });
        }
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send_keys(&mut self, keys: &str) -> Result<()> {
        if !self.connected {
            return Err(GreenlineError::Session {
                message: "send_keys on a disconnected session".into(),
            });
        }
        self.sent.push(keys.to_string());
        if Self::is_aid_key(keys) {
            self.advance_frame();
        }
        Ok(())
    }

    fn screen_text(&self) -> String {
        self.current.clone()
    }

    fn is_busy(&self) -> bool {
        let remaining = self.busy_remaining.get();
        if remaining > 0 {
            self.busy_remaining.set(remaining - 1);
            true
        } else {
            false
        }
    }
}

/// Parse a screens file into frames, separated by `---` lines.
pub fn load_frames(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    let frames: Vec<String> = raw
        .split(&format!("\n{}\n", FRAME_SEPARATOR))
        .map(str::to_string)
        .collect();
    if frames.iter().all(|f| f.trim().is_empty()) {
        return Err(GreenlineError::Session {
            message: format!("screens file {} contains no frames", path.display()),
        });
    }
    Ok(frames)
}

/// Factory producing one fresh [`ScriptedSession`] per row, all playing
/// the same frame sequence.
pub struct ScriptedSessionFactory {
    frames: Vec<String>,
    busy_polls: u32,
}

impl ScriptedSessionFactory {
    pub fn new(frames: Vec<String>) -> Self {
        Self {
            frames,
            busy_polls: 0,
        }
    }

    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }
}

impl SessionFactory for ScriptedSessionFactory {
    fn open(&self, login: &StepDefinition) -> Result<Box<dyn TerminalSession>> {
        super::require_login_settings(login)?;
        Ok(Box::new(
            ScriptedSession::from_frames(self.frames.clone()).with_busy_polls(self.busy_polls),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_presents_first_frame() {
        let mut session = ScriptedSession::from_frames(vec!["SIGN ON".into(), "MAIN MENU".into()]);
        assert!(!session.is_connected());
        session.connect().unwrap();
        assert!(session.is_connected());
        assert_eq!(session.screen_text(), "SIGN ON");
    }

    #[test]
    fn aid_keys_advance_frames() {
        let mut session = ScriptedSession::from_frames(vec!["SIGN ON".into(), "MAIN MENU".into()]);
        session.connect().unwrap();

        session.send_keys("[enter]").unwrap();
        assert_eq!(session.screen_text(), "MAIN MENU");
    }

    #[test]
    fn typed_text_and_cursor_keys_do_not_repaint() {
        let mut session = ScriptedSession::from_frames(vec!["SIGN ON".into(), "MAIN MENU".into()]);
        session.connect().unwrap();

        session.send_keys("QSECOFR").unwrap();
        session.send_keys("[tab]").unwrap();
        session.send_keys("[home]").unwrap();
        assert_eq!(session.screen_text(), "SIGN ON");
        assert_eq!(session.sent_keys().len(), 3);
    }

    #[test]
    fn busy_polls_count_down() {
        let mut session =
            ScriptedSession::from_frames(vec!["A".into(), "B".into()]).with_busy_polls(2);
        session.connect().unwrap();
        assert!(!session.is_busy());

        session.send_keys("[enter]").unwrap();
        assert!(session.is_busy());
        assert!(session.is_busy());
        assert!(!session.is_busy());
    }

    #[test]
    fn disconnect_twice_is_an_error() {
        let mut session = ScriptedSession::new();
        session.connect().unwrap();
        session.disconnect().unwrap();
        assert!(session.disconnect().is_err());
    }

    #[test]
    fn send_keys_requires_connection() {
        let mut session = ScriptedSession::new();
        assert!(session.send_keys("[enter]").is_err());
    }

    #[test]
    fn factory_validates_login_settings() {
        let factory = ScriptedSessionFactory::new(vec![]);
        let incomplete = StepDefinition::default();
        assert!(factory.open(&incomplete).is_err());
    }
}
