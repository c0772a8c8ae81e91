//! # Cheevos - Moderator Achievement Tracker
//!
//! The main binary for the Cheevos achievement engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) that clients post progress to
//! - CLI interface for inspecting and editing progress
//! - TOML catalog loading with a built-in default set
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  apps/cheevos (THE BINARY)                │
//! │                                                           │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │   Catalog    │  │
//! │  │  (clap)     │    │   (axum)    │    │   (toml)     │  │
//! │  └──────┬──────┘    └──────┬──────┘    └──────┬───────┘  │
//! │         └──────────────────┼──────────────────┘          │
//! │                            ▼                             │
//! │                    ┌───────────────┐                     │
//! │                    │ cheevos-core  │                     │
//! │                    │ (THE ENGINE)  │                     │
//! │                    └───────────────┘                     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cheevos server --host 0.0.0.0 --port 8437
//!
//! # CLI operations
//! cheevos status
//! cheevos record --block 5 --delta 3
//! cheevos list --unlocked
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // CHEEVOS_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("CHEEVOS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cheevos::cli::Cli::parse();

    let default_filter = if cli.verbose {
        "cheevos=debug,cheevos_core=debug,tower_http=debug"
    } else {
        "cheevos=info,cheevos_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

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

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cheevos::cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ___ _
  / __| |_  ___ _____ _____ ___ ___
 | (__| ' \/ -_) -_) V / _ \/ _ (_-<
  \___|_||_\___\___|\_/\___/\___/__/

  Mod achievement tracker v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
