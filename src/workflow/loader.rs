//! Workflow file loading.

use std::path::Path;

use crate::error::{GreenlineError, Result};

use super::schema::WorkflowDefinition;

/// Load a workflow definition from a YAML file.
///
/// Rejects missing files and files that parse to nothing; all other
/// structural problems are left to the validator so they surface as
/// structured errors rather than parse failures.
pub fn load_workflow(path: &Path) -> Result<WorkflowDefinition> {
    if !path.is_file() {
        return Err(GreenlineError::WorkflowLoad {
            path: path.to_path_buf(),
            message: "file not found".into(),
        });
    }

    let raw = std::fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Err(GreenlineError::WorkflowLoad {
            path: path.to_path_buf(),
            message: "file is empty".into(),
        });
    }

    serde_yaml::from_str(&raw).map_err(|e| GreenlineError::WorkflowLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
