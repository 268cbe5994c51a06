//! # Tally - Cart Calculator
//!
//! The main binary for the Tally rule-pipeline engine.
//!
//! This application provides:
//! - CLI interface for running cart calculations
//! - The standard rule set (catalog, promo, tax, totals)
//! - File-backed providers loaded from TOML configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                apps/tally (THE BINARY)              │
//! │                                                     │
//! │  ┌───────────┐   ┌────────────────┐   ┌──────────┐  │
//! │  │   CLI     │   │ Standard rules │   │ Providers│  │
//! │  │  (clap)   │   │ (catalog, ...) │   │  (toml)  │  │
//! │  └─────┬─────┘   └───────┬────────┘   └────┬─────┘  │
//! │        │                 │                 │        │
//! │        └─────────────────┼─────────────────┘        │
//! │                          ▼                          │
//! │                  ┌──────────────┐                   │
//! │                  │  tally-core  │                   │
//! │                  │ (THE LOGIC)  │                   │
//! │                  └──────────────┘                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Run a calculation
//! tally calculate --request cart.json --config tally.toml
//!
//! # Show the rule execution order
//! tally rules
//! ```

use clap::Parser;
use tally::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — TALLY_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TALLY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tally=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Tally startup banner.
fn print_banner() {
    println!(
        r#"
  tally v{}

  Priority-ordered • Sequential • All-or-nothing
"#,
        env!("CARGO_PKG_VERSION")
    );
}
