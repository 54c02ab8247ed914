//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stackform - declarative container-task stack compiler.
#[derive(Parser, Debug)]
#[command(name = "stackform")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the stack file.
    #[arg(short, long, global = true, env = "STACKFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new stack file.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite an existing stack file.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the stack file.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Compile the stack file into a provisioning manifest.
    Build {
        /// Path to write the manifest to.
        #[arg(short, long, default_value = "stackform.manifest.json")]
        out: PathBuf,

        /// Base URL of the network inventory service.
        #[arg(long, env = "STACKFORM_INVENTORY_URL")]
        inventory_url: Option<String>,

        /// Local network inventory fixture (JSON list of records).
        #[arg(long, conflicts_with = "inventory_url")]
        inventory_file: Option<PathBuf>,

        /// Local configuration-store fixture (JSON map of plain entries).
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Show per-container binding details.
        #[arg(short, long)]
        detailed: bool,
    },

    /// Render a previously built manifest.
    Show {
        /// Path to the manifest file.
        #[arg(default_value = "stackform.manifest.json")]
        manifest: PathBuf,

        /// Show per-container binding details.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
