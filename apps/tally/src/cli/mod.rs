//! # Tally CLI Module
//!
//! This module implements the CLI interface for Tally.
//!
//! ## Available Commands
//!
//! - `calculate` - Run a calculation request through the standard pipeline
//! - `rules` - Show the registered rule execution order

mod commands;

use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tally - Cart Calculator
///
/// Folds a calculation request through the standard priority-ordered rule
/// set and prints the completed cart structure.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the provider configuration file
    #[arg(short = 'c', long, global = true, default_value = "tally.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a calculation request through the pipeline
    Calculate {
        /// Path to the request file (JSON)
        #[arg(short, long)]
        request: PathBuf,
    },

    /// Show the rule execution order
    Rules,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Calculate { request }) => {
            cmd_calculate(&cli.config, &request, json_mode).await
        }
        Some(Commands::Rules) => cmd_rules(json_mode),
        None => {
            // No subcommand - show the rule order by default
            cmd_rules(json_mode)
        }
    }
}
