//! # Cheevos CLI Module
//!
//! This module implements the CLI interface for Cheevos.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show counts and the save/catalog consistency check
//! - `list` - List every achievement with its progress
//! - `record` - Record progress on a block
//! - `export` - Print the raw save string
//! - `import` - Replace progress with a save string
//! - `reset` - Zero all progress

mod commands;

use cheevos_core::CheevoError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Cheevos - moderator achievement tracker
///
/// Keeps per-achievement counters and announces each unlock exactly once.
#[derive(Parser, Debug)]
#[command(name = "cheevos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the settings database
    #[arg(short = 'D', long, global = true, default_value = "cheevos.db")]
    pub database: PathBuf,

    /// Achievement catalog (TOML). Uses the built-in catalog if omitted.
    #[arg(short = 'C', long, global = true)]
    pub catalog: Option<PathBuf>,

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
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8437")]
        port: u16,
    },

    /// Show achievement counts
    Status,

    /// List achievements with progress
    List {
        /// Only show unlocked achievements
        #[arg(short, long)]
        unlocked: bool,
    },

    /// Record progress on a block
    Record {
        /// Block index (registration order)
        #[arg(short, long)]
        block: usize,

        /// Amount to add
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        delta: i64,
    },

    /// Print the raw save string
    Export,

    /// Replace progress with a save string
    Import {
        /// Save string as produced by `export`
        #[arg(short, long)]
        save: String,
    },

    /// Zero all progress
    Reset {
        /// Required confirmation
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CheevoError> {
    let ctx = Context {
        database: cli.database,
        catalog: cli.catalog,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&ctx, &host, port).await,
        Some(Commands::Status) | None => cmd_status(&ctx),
        Some(Commands::List { unlocked }) => cmd_list(&ctx, unlocked),
        Some(Commands::Record { block, delta }) => cmd_record(&ctx, block, delta),
        Some(Commands::Export) => cmd_export(&ctx),
        Some(Commands::Import { save }) => cmd_import(&ctx, &save),
        Some(Commands::Reset { force }) => cmd_reset(&ctx, force),
    }
}
