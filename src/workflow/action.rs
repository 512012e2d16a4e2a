//! Typed action model.
//!
//! [`Action`] is the closed, validated form of a [`StepDefinition`]. Every
//! variant enforces its required fields at construction, so the executor can
//! match exhaustively without re-checking presence. Conversion is pure: the
//! same definition always produces the same action (or the same error).

use indexmap::IndexMap;

use crate::error::{GreenlineError, Result};

use super::schema::{ActionKind, StepDefinition};

/// A validated, immutable scripted step.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Connect the session and wait for the host sign-on to settle.
    Login {
        host: String,
        user: String,
        password: String,
    },

    /// Send a keystroke sequence and verify the named screen was reached.
    Navigate { screen: String, keys: String },

    /// Enter field values in declared order.
    Fill {
        fields: IndexMap<String, String>,
        timeout: Option<u64>,
    },

    /// Press an AID key to submit entered data.
    Submit { key: String },

    /// Check that configured criteria appear on the current screen.
    ///
    /// At least one of `text` / `screen` is present.
    Assert {
        text: Option<String>,
        screen: Option<String>,
    },

    /// Block for a fixed number of milliseconds.
    Wait { timeout_ms: u64 },

    /// Write the current screen text to the artifact sink.
    ///
    /// `name` defaults to "screenshot" at execution time, not here.
    Capture { name: Option<String> },
}

impl Action {
    /// The action kind this variant corresponds to.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Login { .. } => ActionKind::Login,
            Action::Navigate { .. } => ActionKind::Navigate,
            Action::Fill { .. } => ActionKind::Fill,
            Action::Submit { .. } => ActionKind::Submit,
            Action::Assert { .. } => ActionKind::Assert,
            Action::Wait { .. } => ActionKind::Wait,
            Action::Capture { .. } => ActionKind::Capture,
        }
    }
}

/// Extract a required non-blank string field.
fn require(value: &Option<String>, kind: ActionKind, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(GreenlineError::InvalidStep {
            message: format!("{} step requires '{}'", kind, field),
        }),
    }
}

/// Treat empty-string criteria the same as absent ones.
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

impl TryFrom<&StepDefinition> for Action {
    type Error = GreenlineError;

    fn try_from(def: &StepDefinition) -> Result<Self> {
        let kind = def.action.ok_or_else(|| GreenlineError::InvalidStep {
            message: "step requires 'action'".into(),
        })?;

        match kind {
            ActionKind::Login => Ok(Action::Login {
                host: require(&def.host, kind, "host")?,
                user: require(&def.user, kind, "user")?,
                password: require(&def.password, kind, "password")?,
            }),
            ActionKind::Navigate => Ok(Action::Navigate {
                screen: require(&def.screen, kind, "screen")?,
                keys: require(&def.keys, kind, "keys")?,
            }),
            ActionKind::Fill => {
                let fields = match &def.fields {
                    Some(f) if !f.is_empty() => f.clone(),
                    _ => {
                        return Err(GreenlineError::InvalidStep {
                            message: format!("{} step requires non-empty 'fields'", kind),
                        })
                    }
                };
                Ok(Action::Fill {
                    fields,
                    timeout: def.timeout,
                })
            }
            ActionKind::Submit => Ok(Action::Submit {
                key: require(&def.key, kind, "key")?,
            }),
            ActionKind::Assert => {
                let text = non_blank(&def.text);
                let screen = non_blank(&def.screen);
                if text.is_none() && screen.is_none() {
                    return Err(GreenlineError::InvalidStep {
                        message: format!("{} step requires 'text' or 'screen'", kind),
                    });
                }
                Ok(Action::Assert { text, screen })
            }
            ActionKind::Wait => match def.timeout {
                Some(ms) if ms > 0 => Ok(Action::Wait { timeout_ms: ms }),
                _ => Err(GreenlineError::InvalidStep {
                    message: format!("{} step requires 'timeout' > 0", kind),
                }),
            },
            ActionKind::Capture => Ok(Action::Capture {
                name: non_blank(&def.name),
            }),
        }
    }
}
