//! `flavor` command-line host.
//!
//! Drives the [`ConfigManager`] against a JSON-file flag store so flavor
//! configurations can be inspected, edited, and moved between users from a
//! terminal or a script.
//!
//! # Usage
//!
//! ```text
//! flavor [--config PATH] [--user ID] <COMMAND>
//!
//! Commands:
//!   init          Write a default host config file if none exists
//!   show [USER]   Print a user's stored config (default: the effective config)
//!   save FILE     Validate and store a config read from FILE ("-" = stdin)
//!   update JSON   Merge a partial config into the current one
//!   reset         Restore the default template
//!   has           Print whether a config is stored
//!   export        Print the effective config as JSON
//!   import FILE   Import a config exported earlier ("-" = stdin)
//! ```
//!
//! Logging goes to stderr.  The level comes from `host.log_level` in the
//! config file and is overridden by `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use flavor_core::UserId;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flavor_manager::application::manage_config::ConfigManager;
use flavor_manager::infrastructure::storage::config::{
    config_file_path, load_config, save_config, HostConfig,
};
use flavor_manager::infrastructure::store::file::JsonFileFlagStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Per-user flavor configuration manager.
#[derive(Debug, Parser)]
#[command(
    name = "flavor",
    about = "Inspect and edit per-user flavor configurations",
    version
)]
struct Cli {
    /// Host config file.  Defaults to the platform config directory.
    #[arg(long, env = "FLAVOR_CONFIG")]
    config: Option<PathBuf>,

    /// Act as this user instead of `session.user_id`.
    #[arg(long, env = "FLAVOR_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a default host config file if none exists.
    Init,
    /// Print a user's stored config, or the effective config when USER is omitted.
    Show { user: Option<String> },
    /// Validate and store a config read from FILE ("-" reads stdin).
    Save { file: PathBuf },
    /// Merge a partial JSON config into the current one.
    Update { json: String },
    /// Restore the default template.
    Reset,
    /// Print whether the acting user has a stored config.
    Has,
    /// Print the effective config as JSON.
    Export,
    /// Import a config exported earlier from FILE ("-" reads stdin).
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path().context("no --config given and no platform config dir")?,
    };
    let host = load_config(&config_path)
        .with_context(|| format!("loading host config {}", config_path.display()))?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&host.host.log_level)),
        )
        .init();

    match cli.command {
        Command::Init => init_host_config(&config_path),
        command => {
            let manager = build_manager(&host, &config_path, cli.user.as_deref())?;
            manager.initialize().await;
            run(&manager, command).await
        }
    }
}

/// Dispatches every command that operates on the flag store.
async fn run(manager: &ConfigManager, command: Command) -> anyhow::Result<()> {
    match command {
        // Writes the host config only; `main` runs it before opening a store.
        Command::Init => {}
        Command::Show { user: Some(user) } => {
            let config = manager.get_config(&UserId::new(user)).await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Show { user: None } => {
            let config = manager.get_current_config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Save { file } => {
            let text = read_input(&file).await?;
            let candidate: Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let saved = manager.save_config(&candidate).await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        Command::Update { json } => {
            let updates: Value =
                serde_json::from_str(&json).context("update argument is not valid JSON")?;
            let saved = manager.update_config(&updates).await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        Command::Reset => {
            manager.reset_config().await?;
            info!("flavor configuration reset to defaults");
        }
        Command::Has => println!("{}", manager.has_config().await?),
        Command::Export => println!("{}", manager.export_config().await?),
        Command::Import { file } => {
            let text = read_input(&file).await?;
            if !manager.import_config(&text).await? {
                bail!("{} is not a valid flavor configuration", file.display());
            }
            info!("flavor configuration imported from {}", file.display());
        }
    }

    Ok(())
}

/// Wires the host config into a manager backed by the JSON file store.
fn build_manager(
    host: &HostConfig,
    config_path: &Path,
    user_override: Option<&str>,
) -> anyhow::Result<ConfigManager> {
    let session = host
        .session(user_override)
        .context("resolving acting user")?;
    let store = JsonFileFlagStore::new(host.store_path(config_path));
    info!("using flag store {}", store.path().display());

    Ok(ConfigManager::new(
        Arc::new(store),
        Arc::new(host.directory()),
        Arc::new(host.world_settings()),
        session,
    ))
}

fn init_host_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        info!("host config already exists at {}", path.display());
        return Ok(());
    }
    save_config(path, &HostConfig::default())
        .with_context(|| format!("writing host config {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

async fn read_input(file: &Path) -> anyhow::Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("reading stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))
}
