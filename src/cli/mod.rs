//! Command-line interface for Greenline.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, RunArgs, SimulateArgs, ValidateArgs};
pub use commands::dispatch;
