//! ompwatch CLI - development-loop supervisor for open.mp servers
//!
//! Usage: ompwatch <COMMAND>
//!
//! Commands:
//!   watch   Watch for changes, sync them into the server and restart it
//!   sync    One-shot copy of every watched file into the server
//!   init    Write a template config file

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ompwatch::config::{Config, CONFIG_FILE_NAME, CONFIG_TEMPLATE};

/// ompwatch - development-loop supervisor for open.mp servers
#[derive(Parser, Debug)]
#[command(name = "ompwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch for changes, sync them into the server and restart it
    Watch {
        /// Path to the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Quiet period in milliseconds before a coalesced restart fires
        #[arg(long, default_value_t = ompwatch::QUIET_PERIOD_MS)]
        quiet_period: u64,
    },

    /// Copy every watched file into the server once, without watching
    Sync {
        /// Path to the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },

    /// Write a template config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            config,
            quiet_period,
        } => cmd_watch(&config, quiet_period, cli.json),
        Commands::Sync { config } => cmd_sync(&config, cli.json),
        Commands::Init { force } => cmd_init(force, cli.json),
    }
}

fn cmd_watch(config_path: &PathBuf, quiet_period_ms: u64, json: bool) -> Result<()> {
    use ompwatch::watcher::{watch, WatchEvent, WatchOptions};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    let config = Config::load(config_path)?;

    let options = WatchOptions::new(config.clone())
        .with_quiet_period(Duration::from_millis(quiet_period_ms))
        .with_json(json);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !json {
        println!("👀 ompwatch");
        println!("Server: {}", config.server.directory.display());
        println!("Press Ctrl+C to stop\n");
    }

    // Start watching
    watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            match event {
                WatchEvent::WatchStarted { directory, files } => {
                    println!("📂 Watching: {} ({} files)", directory, files.len());
                }
                WatchEvent::ServerStarted { pid } => {
                    println!("🚀 Server started (pid {})", pid);
                }
                WatchEvent::ServerStopping { pid } => {
                    println!("🛑 Stopping server (pid {})", pid);
                }
                WatchEvent::FileChanged { path } => {
                    println!("📝 Changed: {}", path);
                }
                WatchEvent::FileCopied { file, destination } => {
                    println!("📋 Copied {} -> {}", file, destination);
                }
                WatchEvent::SyncError { file, message } => {
                    eprintln!("⚠ Copy failed for {}: {}", file, message);
                }
                WatchEvent::Error { message } => {
                    eprintln!("✗ Error: {}", message);
                }
                WatchEvent::Shutdown => {
                    println!("\n👋 Shutting down (server left running)...");
                }
            }
        }
    })?;

    Ok(())
}

fn cmd_sync(config_path: &PathBuf, json: bool) -> Result<()> {
    use ompwatch::watcher::sync_all;

    let config = Config::load(config_path)?;

    if !json {
        println!("📦 ompwatch Sync");
        println!("Source: {}", config.watcher.directory.display());
        println!("Destination: {}", config.components_dir().display());
    }

    let results = sync_all(&config);
    let copied: Vec<&String> = results
        .iter()
        .filter(|(_, r)| r.is_ok())
        .map(|(f, _)| f)
        .collect();
    let errors: Vec<(&String, String)> = results
        .iter()
        .filter_map(|(f, r)| r.as_ref().err().map(|e| (f, e.to_string())))
        .collect();

    if json {
        let output = serde_json::json!({
            "command": "sync",
            "status": if errors.is_empty() { "success" } else { "partial" },
            "copied": copied.len(),
            "errors": errors.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Sync Results:");
        if !copied.is_empty() {
            println!("  ✓ Copied: {} files", copied.len());
            for file in &copied {
                println!("    - {}", file);
            }
        }
        if !errors.is_empty() {
            println!("  ✗ Errors: {}", errors.len());
            for (file, message) in &errors {
                println!("    - {}: {}", file, message);
            }
        }
        println!();
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_init(force: bool, json: bool) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(&path, CONFIG_TEMPLATE)?;

    if json {
        let output = serde_json::json!({
            "command": "init",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("✓ Wrote {}", path.display());
        println!("Edit it to point at your server and watched files.");
    }

    Ok(())
}
