//! Session port for block-mode terminal hosts.
//!
//! The executor only needs a narrow capability surface: connect, inject
//! keys, read the screen buffer, and poll the busy/lock indicator. A real
//! TN transport implements [`TerminalSession`] out of tree; in-repo the
//! [`ScriptedSession`] double plays back canned screen frames for tests
//! and offline runs.

pub mod scripted;

pub use scripted::ScriptedSession;

use crate::error::{GreenlineError, Result};
use crate::workflow::StepDefinition;

/// Capability interface over one live terminal session.
///
/// All step-execution waiting is expressed purely in terms of polling
/// [`is_busy`](TerminalSession::is_busy).
pub trait TerminalSession: Send {
    /// Establish the connection. Idempotent callers check
    /// [`is_connected`](TerminalSession::is_connected) first.
    fn connect(&mut self) -> Result<()>;

    /// Tear down the connection. Already-closed sessions are expected;
    /// callers may swallow this error.
    fn disconnect(&mut self) -> Result<()>;

    /// Whether the session is currently connected.
    fn is_connected(&self) -> bool;

    /// Inject a keystroke sequence (text or a bracketed key mnemonic).
    fn send_keys(&mut self, keys: &str) -> Result<()>;

    /// Full text content of the current display buffer.
    fn screen_text(&self) -> String;

    /// The busy/lock indicator: true while the host is processing and
    /// will not accept input.
    fn is_busy(&self) -> bool;
}

/// Creates one session per workflow run.
///
/// Batch execution opens a fresh session per row from the workflow's
/// LOGIN step; sessions are row-exclusive and never shared.
pub trait SessionFactory: Send + Sync {
    /// Open a session for the given LOGIN step.
    fn open(&self, login: &StepDefinition) -> Result<Box<dyn TerminalSession>>;
}

/// Check that a LOGIN step carries the settings a session needs.
pub fn require_login_settings(login: &StepDefinition) -> Result<()> {
    for (field, value) in [
        ("host", &login.host),
        ("user", &login.user),
        ("password", &login.password),
    ] {
        if value.as_ref().map_or(true, |v| v.trim().is_empty()) {
            return Err(GreenlineError::Session {
                message: format!("LOGIN step requires '{}' to open a session", field),
            });
        }
    }
    Ok(())
}
