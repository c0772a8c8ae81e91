//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::catalog_file::CatalogFile;
use cheevos_core::{BlockIndex, CheevoError, Engine, RedbSettings};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub database: PathBuf,
    pub catalog: Option<PathBuf>,
    pub json_mode: bool,
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(ctx: &Context, host: &str, port: u16) -> Result<(), CheevoError> {
    let Startup { engine, .. } = load_engine(ctx)?;

    println!("Cheevos Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Database: {:?}", ctx.database);
    println!("  Blocks:   {}", engine.catalog().block_count());
    println!();
    println!("Endpoints:");
    println!("  POST /progress     - Record progress on a block");
    println!("  GET  /achievements - List achievements");
    println!("  GET  /status       - Counts");
    println!("  GET  /save         - Raw save string");
    println!("  POST /flush        - Force a save");
    println!("  GET  /health       - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, engine).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show achievement counts.
pub fn cmd_status(ctx: &Context) -> Result<(), CheevoError> {
    let Startup {
        engine,
        previous_seen: last_seen,
    } = load_engine(ctx)?;
    let summary = engine.summary();
    let consistency = engine.check_consistency();

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "database": ctx.database.to_string_lossy(),
            "blocks": summary.blocks,
            "thresholds": summary.thresholds,
            "unlocked": summary.unlocked,
            "persisted_slots": consistency.persisted_slots,
            "consistent": consistency.is_consistent(),
            "last_seen_ms": last_seen,
        }));
        return Ok(());
    }

    println!("Cheevos Status");
    println!("==============");
    println!("Database:   {:?}", ctx.database);
    println!();
    println!("Blocks:     {}", summary.blocks);
    println!("Unlocked:   {} / {}", summary.unlocked, summary.thresholds);
    println!(
        "Save slots: {}{}",
        consistency.persisted_slots,
        if consistency.is_consistent() {
            ""
        } else {
            " (more than registered blocks!)"
        }
    );
    match last_seen {
        Some(ms) => println!("Last seen:  {} ms since epoch", ms),
        None => println!("Last seen:  never"),
    }

    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List achievements.
pub fn cmd_list(ctx: &Context, unlocked_only: bool) -> Result<(), CheevoError> {
    let engine = load_engine(ctx)?.engine;
    let statuses: Vec<_> = engine
        .statuses()
        .into_iter()
        .filter(|s| !unlocked_only || s.unlocked)
        .collect();

    if ctx.json_mode {
        print_json(&serde_json::json!({ "achievements": statuses }));
        return Ok(());
    }

    for s in &statuses {
        println!(
            "[{}] #{}.{} {:<32} {:>6}/{:<6} {}",
            if s.unlocked { "x" } else { " " },
            s.block,
            s.threshold,
            s.label,
            s.progress,
            s.target,
            s.description
        );
    }
    if statuses.is_empty() {
        println!("No achievements to show");
    }

    Ok(())
}

// =============================================================================
// RECORD COMMAND
// =============================================================================

/// Record progress on a block.
pub fn cmd_record(ctx: &Context, block: usize, delta: i64) -> Result<(), CheevoError> {
    let mut engine = load_engine(ctx)?.engine;
    let block = BlockIndex(block);
    let outcome = engine.record_progress(block, delta)?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "block": block.value(),
            "progress": engine.get(block),
            "unlocked": outcome.events,
            "warning": outcome.persist_warning,
        }));
        return Ok(());
    }

    println!("Block {} is now at {}", block, engine.get(block));
    if !outcome.unlocked_any() {
        println!("No new achievements");
    }
    for event in &outcome.events {
        println!(
            "{} {} - {}",
            cheevos_core::UNLOCK_TITLE,
            event.label,
            event.description
        );
    }
    if let Some(warning) = outcome.persist_warning {
        eprintln!("Warning: progress not saved: {}", warning);
    }

    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Print the raw save string.
pub fn cmd_export(ctx: &Context) -> Result<(), CheevoError> {
    let engine = load_engine(ctx)?.engine;
    let save = engine.snapshot();

    if ctx.json_mode {
        print_json(&serde_json::json!({ "save": save }));
    } else {
        println!("{}", save);
    }
    Ok(())
}

/// Replace progress with a save string.
pub fn cmd_import(ctx: &Context, save: &str) -> Result<(), CheevoError> {
    let mut engine = load_engine(ctx)?.engine;
    engine.import_save(save)?;
    let consistency = engine.check_consistency();
    let summary = engine.summary();

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "imported_slots": engine.progress().len(),
            "unlocked": summary.unlocked,
        }));
        return Ok(());
    }

    println!(
        "Imported {} slots ({} unlocked)",
        engine.progress().len(),
        summary.unlocked
    );
    if !consistency.is_consistent() {
        println!("Note: the previous save had more slots than the catalog has blocks");
    }
    Ok(())
}

// =============================================================================
// RESET COMMAND
// =============================================================================

/// Zero all progress.
pub fn cmd_reset(ctx: &Context, force: bool) -> Result<(), CheevoError> {
    if !force {
        return Err(CheevoError::InvalidArgument(
            "Reset discards all progress. Use --force to confirm.".to_string(),
        ));
    }
    let mut engine = load_engine(ctx)?.engine;
    engine.reset()?;
    println!("Progress reset for {} blocks", engine.catalog().block_count());
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// A loaded engine and the start time it replaced.
pub struct Startup {
    pub engine: Engine,
    /// `Achievements.lastSeen` before this start, in ms since the epoch.
    pub previous_seen: Option<u64>,
}

/// Open the settings database, load progress, register the catalog and
/// stamp `Achievements.lastSeen`. Every command starts here.
pub fn load_engine(ctx: &Context) -> Result<Startup, CheevoError> {
    let settings = RedbSettings::open(&ctx.database)?;
    let mut engine = Engine::load(settings)?;
    let catalog = CatalogFile::load(ctx.catalog.as_deref())?;
    catalog.register_all(&mut engine)?;
    engine.check_consistency();

    let previous_seen = engine.touch_last_seen(now_millis())?;
    if let Some(ms) = previous_seen {
        tracing::debug!(last_seen_ms = ms, "Previous session recorded");
    }
    Ok(Startup {
        engine,
        previous_seen,
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
