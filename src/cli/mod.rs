//! CLI module for the stackform tool.
//!
//! This module provides the command-line interface for validating stack
//! files and compiling them into provisioning manifests.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
