//! Standalone reordering server.
//!
//! Serves the reorder routes over an in-memory store, optionally seeded from
//! a JSON file.
//!
//! Usage:
//!   sortable-server --port 1337 --seed seed.json --config sortable.toml

use anyhow::{Context, Result};
use clap::Parser;
use sortable_core::{MemoryDocumentStore, PluginConfig, SortablePlugin};
use sortable_server::{SeedFile, build_router};
use std::{fs, path::PathBuf, sync::Arc};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "sortable-server")]
#[command(about = "Drag-and-drop reordering server over an in-memory store")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "1337")]
    port: u16,

    /// Path to the plugin config file
    #[arg(short, long, default_value = "sortable.toml")]
    config: PathBuf,

    /// JSON file with content types and entries to load at startup
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.as_str())),
        )
        .with_target(false)
        .compact()
        .init();

    info!("Sortable server starting...");
    let config = PluginConfig::load_from(&args.config);

    let seed = match &args.seed {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read seed file {}", path.display()))?;
            SeedFile::from_json_str(&contents)
                .with_context(|| format!("Failed to parse seed file {}", path.display()))?
        }
        None => SeedFile::default(),
    };

    let store = Arc::new(MemoryDocumentStore::new());
    let registry = Arc::new(seed.registry());
    info!("Registered {} content types", registry.len());

    let plugin = Arc::new(SortablePlugin::new(store, registry, config));
    let seeded = seed
        .populate(&plugin)
        .await
        .context("Failed to seed entries")?;
    info!("Seeded {} entries", seeded);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.port))?;
    info!("HTTP API listening on port {}", args.port);

    axum::serve(listener, build_router(plugin))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
