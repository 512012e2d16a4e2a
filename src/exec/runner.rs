//! Step execution against a live session.
//!
//! One [`StepRunner`] owns exactly one session and processes steps
//! strictly sequentially; the first fatal error aborts the remaining
//! steps. Synchronization with the host is expressed entirely as bounded
//! polling of the busy/lock indicator; the transport offers no callback.

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::artifact::ArtifactSink;
use crate::dataset::substitute;
use crate::error::{GreenlineError, Result};
use crate::session::TerminalSession;
use crate::workflow::{Action, StepDefinition, WorkflowDefinition};

/// Wait for the sign-on screen to settle after connect.
const KEYBOARD_UNLOCK_TIMEOUT_MS: u64 = 30_000;
/// Wait for the host to repaint after navigation or submission.
const LOCK_CYCLE_TIMEOUT_MS: u64 = 5_000;
/// Wait after homing the cursor before filling fields.
const HOME_UNLOCK_TIMEOUT_MS: u64 = 1_000;
/// Wait after each field value and field-advance key.
const FIELD_FILL_TIMEOUT_MS: u64 = 500;
/// Grace period for the lock to engage after a submit.
const LOCK_ENGAGE_GRACE_MS: u64 = 1_000;
/// Unlock poll interval.
const POLL_INTERVAL_MS: u64 = 100;
/// Lock-engage poll interval (shorter: the window is only 1s).
const ENGAGE_POLL_INTERVAL_MS: u64 = 50;
/// Screen dumps attached to navigation failures are capped at this many lines.
const DUMP_MAX_LINES: usize = 80;
/// Display buffer width used when wrapping raw screen text.
const SCREEN_COLS: usize = 80;

/// Executes one workflow's steps against one session.
pub struct StepRunner<'a> {
    session: Box<dyn TerminalSession>,
    sink: &'a dyn ArtifactSink,
    row: &'a HashMap<String, String>,
}

impl<'a> StepRunner<'a> {
    pub fn new(
        session: Box<dyn TerminalSession>,
        sink: &'a dyn ArtifactSink,
        row: &'a HashMap<String, String>,
    ) -> Self {
        Self { session, sink, row }
    }

    /// Run every step in order; the first error aborts the rest.
    pub fn run_workflow(&mut self, workflow: &WorkflowDefinition) -> Result<()> {
        for (index, step) in workflow.steps.iter().enumerate() {
            let step = step.as_ref().ok_or_else(|| GreenlineError::InvalidStep {
                message: format!("step {} is null", index),
            })?;
            self.run_step(step)?;
        }
        Ok(())
    }

    /// Convert one raw step and dispatch to its handler.
    ///
    /// The conversion here must agree with the one the validator already
    /// performed; both are pure.
    pub fn run_step(&mut self, step: &StepDefinition) -> Result<()> {
        let action = Action::try_from(step)?;
        debug!("executing {} step", action.kind());

        match action {
            Action::Login { host, .. } => self.handle_login(&host),
            Action::Navigate { screen, keys } => self.handle_navigate(&screen, &keys),
            Action::Fill { fields, .. } => self.handle_fill(&fields),
            Action::Submit { key } => self.handle_submit(&key),
            Action::Assert { text, screen } => self.handle_assert(text.as_deref(), screen.as_deref()),
            Action::Wait { timeout_ms } => self.handle_wait(timeout_ms),
            Action::Capture { name } => self.handle_capture(name.as_deref()),
        }
    }

    /// Disconnect the session, surfacing any transport error.
    pub fn disconnect(&mut self) -> Result<()> {
        self.session.disconnect()
    }

    fn handle_login(&mut self, host: &str) -> Result<()> {
        if !self.session.is_connected() {
            self.session.connect()?;
        }
        self.wait_for_unlock(KEYBOARD_UNLOCK_TIMEOUT_MS)?;
        self.sink
            .append_ledger("LOGIN", &format!("Connected to {}", host))
    }

    fn handle_navigate(&mut self, screen: &str, keys: &str) -> Result<()> {
        let target = substitute(screen, self.row);

        self.session.send_keys(keys)?;
        self.wait_for_unlock(LOCK_CYCLE_TIMEOUT_MS)?;

        let content = self.session.screen_text();
        if !content.contains(&target) {
            return Err(GreenlineError::NavigationFailed {
                message: format!("Failed to reach {}", target),
                screen_dump: truncate_dump(&wrap_screen(&content)),
            });
        }

        self.sink
            .append_ledger("NAVIGATE", &format!("Navigated to {}", target))
    }

    fn handle_fill(&mut self, fields: &indexmap::IndexMap<String, String>) -> Result<()> {
        self.session.send_keys("[home]")?;
        self.wait_for_unlock(HOME_UNLOCK_TIMEOUT_MS)?;

        for value in fields.values() {
            let value = substitute(value, self.row);
            let value = value.trim();

            self.session.send_keys(value)?;
            self.wait_for_unlock(FIELD_FILL_TIMEOUT_MS)?;
            self.session.send_keys("[tab]")?;
            self.wait_for_unlock(FIELD_FILL_TIMEOUT_MS)?;
        }

        self.sink
            .append_ledger("FILL", &format!("Fields populated: {}", fields.len()))
    }

    fn handle_submit(&mut self, key: &str) -> Result<()> {
        let key = key.to_lowercase();
        let mnemonic = format!("[{}]", key);

        self.session.send_keys(&mnemonic)?;
        self.wait_for_lock_cycle(LOCK_CYCLE_TIMEOUT_MS)?;

        self.sink
            .append_ledger("SUBMIT", &format!("Submitted with {}", key))
    }

    fn handle_assert(&mut self, text: Option<&str>, screen: Option<&str>) -> Result<()> {
        let expected_text = text.map(|t| substitute(t, self.row));
        let expected_screen = screen.map(|s| substitute(s, self.row));

        let content = self.session.screen_text();
        let passed = expected_text
            .iter()
            .chain(expected_screen.iter())
            .all(|criterion| content.contains(criterion.as_str()));

        if !passed {
            return Err(GreenlineError::AssertionFailed {
                message: "Assertion failed".into(),
                screen_dump: wrap_screen(&content),
            });
        }

        self.sink.append_ledger("ASSERT", "Assertion passed")
    }

    fn handle_wait(&mut self, timeout_ms: u64) -> Result<()> {
        thread::sleep(Duration::from_millis(timeout_ms));
        self.sink
            .append_ledger("WAIT", &format!("Waited {}ms", timeout_ms))
    }

    fn handle_capture(&mut self, name: Option<&str>) -> Result<()> {
        let name = substitute(name.unwrap_or("screenshot"), self.row);
        let content = wrap_screen(&self.session.screen_text());
        let path = self.sink.write_capture(&name, &content)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.sink
            .append_ledger("CAPTURE", &format!("Text: {}", filename))
    }

    /// Poll until the busy/lock indicator clears, or time out.
    fn wait_for_unlock(&self, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        while self.session.is_busy() {
            if Instant::now() >= deadline {
                return Err(GreenlineError::LockTimeout { timeout_ms });
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
        Ok(())
    }

    /// Two-phase wait after a submission: first give the lock a short
    /// grace period to engage (a host that never locks within it is
    /// treated as having completed instantly), then wait for it to clear.
    fn wait_for_lock_cycle(&self, timeout_ms: u64) -> Result<()> {
        let engage_deadline = Instant::now() + Duration::from_millis(LOCK_ENGAGE_GRACE_MS);
        while !self.session.is_busy() {
            if Instant::now() >= engage_deadline {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(ENGAGE_POLL_INTERVAL_MS));
        }

        self.wait_for_unlock(timeout_ms)
    }
}

/// Wrap raw screen text to the display width, one line per row.
pub fn wrap_screen(content: &str) -> String {
    if content.contains('\n') {
        // Already line-structured (scripted sessions, captures).
        return content.to_string();
    }
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len() + chars.len() / SCREEN_COLS + 1);
    for chunk in chars.chunks(SCREEN_COLS) {
        out.extend(chunk.iter());
        out.push('\n');
    }
    out
}

/// Cap a dump at [`DUMP_MAX_LINES`] lines, marking how many were dropped.
pub fn truncate_dump(dump: &str) -> String {
    let lines: Vec<&str> = dump.lines().collect();
    if lines.len() <= DUMP_MAX_LINES {
        return dump.to_string();
    }
    let kept = &lines[..DUMP_MAX_LINES];
    let dropped = lines.len() - DUMP_MAX_LINES;
    format!(
        "{}\n({} additional lines truncated)",
        kept.join("\n"),
        dropped
    )
}
