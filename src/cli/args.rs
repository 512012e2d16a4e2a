//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Greenline - scripted workflow automation for block-mode terminal hosts.
#[derive(Debug, Parser)]
#[command(name = "greenline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a workflow against a session (batch mode when the dataset
    /// has more than one row)
    Run(RunArgs),

    /// Validate a workflow file without opening a session
    Validate(ValidateArgs),

    /// Predict a workflow's outcome offline (approval gate)
    Simulate(SimulateArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Workflow YAML file
    pub workflow: PathBuf,

    /// CSV dataset; first column is the row key
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Target environment label (dev/test/prod)
    #[arg(long, value_name = "ENV")]
    pub env: Option<String>,

    /// Scripted screen frames file (separated by `---` lines); stands in
    /// for a live transport
    #[arg(long)]
    pub screens: Option<PathBuf>,

    /// Directory artifact subdirectories are created under
    #[arg(long, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Per-row timeout in seconds for batch runs
    #[arg(long, default_value_t = 300)]
    pub row_timeout: u64,

    /// Maximum rows executing at once (default: all rows)
    #[arg(long)]
    pub max_concurrent: Option<usize>,
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// Workflow YAML file
    pub workflow: PathBuf,

    /// CSV dataset to check parameter references against
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// Arguments for the `simulate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SimulateArgs {
    /// Workflow YAML file
    pub workflow: PathBuf,

    /// CSV dataset; the first row feeds parameter substitution
    #[arg(long)]
    pub data: Option<PathBuf>,
}
