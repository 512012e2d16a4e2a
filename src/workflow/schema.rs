//! Raw workflow schema as deserialized from YAML.
//!
//! [`StepDefinition`] is deliberately loose: it carries optional fields for
//! every action kind, and most are unused for any given kind. The validator
//! and the [`Action`](super::Action) factory are responsible for rejecting
//! incomplete definitions; deserialization itself never fails on a missing
//! field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::tolerance::{ToleranceSpec, WorkflowTolerance};

/// The closed set of scripted step kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Login,
    Navigate,
    Fill,
    Submit,
    Assert,
    Wait,
    Capture,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionKind::Login => "LOGIN",
            ActionKind::Navigate => "NAVIGATE",
            ActionKind::Fill => "FILL",
            ActionKind::Submit => "SUBMIT",
            ActionKind::Assert => "ASSERT",
            ActionKind::Wait => "WAIT",
            ActionKind::Capture => "CAPTURE",
        };
        write!(f, "{}", s)
    }
}

/// One raw scripted step, before conversion to a typed action.
///
/// Field order in `fields` is preserved from the source document; FILL
/// steps enter values in declared order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepDefinition {
    /// Action kind. Absence is a validation error, not a parse error.
    #[serde(default)]
    pub action: Option<ActionKind>,

    /// LOGIN: target host.
    #[serde(default)]
    pub host: Option<String>,

    /// LOGIN: user profile.
    #[serde(default)]
    pub user: Option<String>,

    /// LOGIN: password.
    #[serde(default)]
    pub password: Option<String>,

    /// NAVIGATE: target screen name. ASSERT: expected screen criterion.
    #[serde(default)]
    pub screen: Option<String>,

    /// NAVIGATE: keystroke sequence to send.
    #[serde(default)]
    pub keys: Option<String>,

    /// SUBMIT: AID key name (e.g. "enter", "pf3").
    #[serde(default)]
    pub key: Option<String>,

    /// ASSERT: expected text criterion.
    #[serde(default)]
    pub text: Option<String>,

    /// FILL: field name → value, entered in declared order.
    #[serde(default)]
    pub fields: Option<IndexMap<String, String>>,

    /// FILL (advisory) / WAIT (required): timeout in milliseconds.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// CAPTURE: artifact base name (defaults to "screenshot" at execution).
    #[serde(default)]
    pub name: Option<String>,
}

/// A named, ordered workflow as loaded from a YAML file.
///
/// Steps are `Option` so that a literal `null` entry survives parsing and
/// reaches the validator, which reports it as a structured error instead
/// of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Workflow name; also the default artifact directory stem.
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Target environment label (dev/test/prod).
    #[serde(default)]
    pub environment: Option<String>,

    /// Ordered steps.
    #[serde(default)]
    pub steps: Vec<Option<StepDefinition>>,

    /// Declared reliability bounds.
    #[serde(default)]
    pub tolerance: Option<ToleranceSpec>,
}

impl WorkflowDefinition {
    /// The workflow name with whitespace runs replaced by underscores,
    /// suitable for use as a filesystem path component.
    pub fn path_stem(&self) -> String {
        self.name.split_whitespace().collect::<Vec<_>>().join("_")
    }

    /// First LOGIN step, if any. Batch execution derives per-row session
    /// settings from it.
    pub fn login_step(&self) -> Option<&StepDefinition> {
        self.steps
            .iter()
            .flatten()
            .find(|s| s.action == Some(ActionKind::Login))
    }

    /// The declared tolerance resolved against the defaults.
    pub fn resolved_tolerance(&self) -> Result<WorkflowTolerance> {
        match &self.tolerance {
            Some(spec) => WorkflowTolerance::from_spec(&self.name, spec),
            None => WorkflowTolerance::defaults(&self.name),
        }
    }
}
