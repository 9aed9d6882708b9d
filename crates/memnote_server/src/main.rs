//! memnote HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use memnote_core::{core_version, init_logging};
use memnote_server::{serve, NoteStore, Settings};
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "memnote-server", version, about = "Serve the memnote /texts API")]
struct Args {
    /// TOML settings file (defaults to ./memnote.toml when present)
    #[arg(long, env = "MEMNOTE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    init_logging(&settings.log.level, settings.log.dir.as_deref())
        .context("failed to start logging")?;
    info!(
        "event=server_boot module=server status=start version={} db={}",
        core_version(),
        settings.database.path
    );

    let location = settings.database.location();
    let max_connections = settings.database.max_connections;
    let store = tokio::task::spawn_blocking(move || NoteStore::open(&location, max_connections))
        .await?
        .context("failed to open note store")?;

    let listener = TcpListener::bind(settings.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr()))?;

    serve(listener, store, async {
        tokio::signal::ctrl_c().await.ok();
        info!("event=shutdown_signal module=server status=ok");
    })
    .await?;
    Ok(())
}
