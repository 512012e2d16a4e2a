//! Dataset loading and parameter substitution.
//!
//! A dataset is a CSV file whose header row names the available columns
//! and whose first column is the row key. Workflows reference columns with
//! `${data.<column>}` tokens; [`substitute`] resolves them against one row.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{GreenlineError, Result};

/// A loaded dataset: column names plus ordered rows keyed by their first
/// column's value.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<(String, HashMap<String, String>)>,
}

impl Dataset {
    /// Load a CSV file. The first record is the header; the first column
    /// of each subsequent record becomes that row's key.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| GreenlineError::Dataset {
            message: format!("{}: {}", path.display(), e),
        })?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| GreenlineError::Dataset {
                message: format!("{}: {}", path.display(), e),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            return Err(GreenlineError::Dataset {
                message: format!("{}: no header row", path.display()),
            });
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| GreenlineError::Dataset {
                message: format!("{}: {}", path.display(), e),
            })?;
            let row_key = record.get(0).unwrap_or_default().to_string();
            let row: HashMap<String, String> = columns
                .iter()
                .zip(record.iter())
                .map(|(c, v)| (c.clone(), v.to_string()))
                .collect();
            rows.push((row_key, row));
        }

        Ok(Self { columns, rows })
    }

    /// Column names from the header row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in file order, as `(row_key, column → value)`.
    pub fn rows(&self) -> &[(String, HashMap<String, String>)] {
        &self.rows
    }

    /// First row's values, for single-run parameter substitution.
    pub fn first_row(&self) -> Option<&HashMap<String, String>> {
        self.rows.first().map(|(_, row)| row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume into owned rows, for batch fan-out.
    pub fn into_rows(self) -> Vec<(String, HashMap<String, String>)> {
        self.rows
    }
}

/// Replace every literal `${data.<key>}` occurrence with `row[key]`.
///
/// Tokens whose key is absent from the row are left verbatim, so a second
/// pass over already-substituted text is a no-op.
pub fn substitute(template: &str, row: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in row {
        let token = format!("${{data.{}}}", key);
        result = result.replace(&token, value);
    }
    result
}
