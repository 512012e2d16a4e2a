//! Greenline - scripted workflow automation for block-mode terminal hosts.
//!
//! Greenline drives interactive sessions against legacy block-mode
//! terminal hosts from declarative YAML workflows: sign-on, screen
//! navigation, form fill, submission, assertion, timed waits, and screen
//! capture. The same workflow can be validated statically, simulated
//! offline for approval gates, executed live, or fanned out concurrently
//! across a CSV dataset with per-run reliability scoring.
//!
//! # Modules
//!
//! - [`artifact`] - Execution ledgers and screen captures
//! - [`batch`] - Concurrent per-row fan-out and metrics reduction
//! - [`cli`] - Command-line interface and argument parsing
//! - [`dataset`] - CSV datasets and `${data.*}` parameter substitution
//! - [`error`] - Error types and result aliases
//! - [`exec`] - Step execution against a live session
//! - [`score`] - Reliability scoring against declared tolerances
//! - [`session`] - Session port and the scripted test double
//! - [`sim`] - Offline workflow simulation
//! - [`validate`] - Static workflow validation
//! - [`workflow`] - Workflow schema, typed actions, tolerances
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use greenline::dataset::substitute;
//!
//! let mut row = HashMap::new();
//! row.insert("account".to_string(), "10042".to_string());
//! let prompt = substitute("inquiry for ${data.account}", &row);
//! assert_eq!(prompt, "inquiry for 10042");
//! ```

pub mod artifact;
pub mod batch;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod exec;
pub mod score;
pub mod session;
pub mod sim;
pub mod validate;
pub mod workflow;

pub use error::{GreenlineError, Result};
