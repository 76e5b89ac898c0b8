//! CLI module for giff.
//!
//! This module provides the command-line interface for previewing
//! CloudFormation changesets.

mod commands;
mod output;
mod runner;

pub use commands::{ChangesArgs, Cli, Commands, DiffArgs, OutputFormat};
pub use output::{NO_CHANGES, OutputFormatter};
pub use runner::{run_changes, run_diff, run_version};
