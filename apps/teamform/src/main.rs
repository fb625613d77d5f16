//! # Teamform - Goal-Aligned Team Formation
//!
//! The command-line front end of the formation engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/teamform (THE BINARY)             │
//! │                                                      │
//! │  ┌───────────┐   ┌────────────┐   ┌──────────────┐   │
//! │  │   CLI     │   │  Config    │   │ JSON roster  │   │
//! │  │  (clap)   │   │ (toml/env) │   │   & sink     │   │
//! │  └─────┬─────┘   └─────┬──────┘   └──────┬───────┘   │
//! │        └───────────────┼─────────────────┘           │
//! │                        ▼                             │
//! │               ┌─────────────────┐                    │
//! │               │  teamform-core  │                    │
//! │               │   (THE LOGIC)   │                    │
//! │               └─────────────────┘                    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! teamform form -p participants.json --votes votes.json --cycle 2026-10 -o teams.json
//! teamform sizes -s 5 -r 17 -a 6
//! teamform config
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. TEAMFORM_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TEAMFORM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "teamform=debug,teamform_core=debug"
    } else {
        "teamform=info,teamform_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr; stdout may carry the formed teams.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Teamform startup banner.
fn print_banner() {
    eprintln!(
        r#"
  ▀█▀ █▀▀ ▄▀█ █▀▄▀█ █▀▀ █▀█ █▀█ █▀▄▀█
   █  ██▄ █▀█ █ ▀ █ █▀  █▄█ █▀▄ █ ▀ █

  Team Formation v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
