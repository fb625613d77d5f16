//! # Teamform CLI Module
//!
//! This module implements the CLI interface for Teamform.
//!
//! ## Available Commands
//!
//! - `form` - Form teams for a cycle and persist them
//! - `sizes` - Show how a goal group would be partitioned
//! - `config` - Show the effective configuration

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use teamform::{AppConfig, AppError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Teamform - goal-aligned team formation
///
/// Partitions participants into teams around the goals they voted for,
/// anchoring every team with an advanced participant.
#[derive(Parser, Debug)]
#[command(name = "teamform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./teamform.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Form teams for a cycle
    Form {
        /// Participants file (JSON array)
        #[arg(short, long)]
        participants: PathBuf,

        /// Votes file (JSON array)
        #[arg(long)]
        votes: PathBuf,

        /// Cycle the teams are formed for
        #[arg(long)]
        cycle: String,

        /// Chapter the participants belong to
        #[arg(long, default_value = "default")]
        chapter: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the advanced score threshold
        #[arg(long)]
        threshold: Option<u64>,

        /// Override the default recommended team size
        #[arg(long)]
        team_size: Option<usize>,
    },

    /// Show the team sizes computed for one goal group
    Sizes {
        /// Recommended team size
        #[arg(short = 's', long)]
        team_size: usize,

        /// Regular participants in the group
        #[arg(short, long)]
        regular: usize,

        /// Advanced participants in the group
        #[arg(short, long)]
        advanced: usize,
    },

    /// Show the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Form {
            participants,
            votes,
            cycle,
            chapter,
            output,
            threshold,
            team_size,
        }) => {
            let mut config = config;
            config.apply_overrides(threshold, team_size);
            cmd_form(
                &config,
                json_mode,
                &participants,
                &votes,
                &cycle,
                &chapter,
                output,
            )
            .await
        }
        Some(Commands::Sizes {
            team_size,
            regular,
            advanced,
        }) => cmd_sizes(json_mode, team_size, regular, advanced),
        Some(Commands::Config) | None => cmd_config(&config, json_mode),
    }
}
