// crates/app/src/main.rs
//! Headless proman runner.
//!
//! Loads the configuration, opens the store, runs one project sync and
//! prints the resulting project and editor lists as JSON on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use proman_app::AppState;
use proman_core::{validate_config, ConfigFile};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "proman")]
#[command(about = "Sync the project catalog with the configured project directory")]
#[command(version)]
struct Cli {
    /// Configuration file path (default: <config_dir>/proman/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store file path (default: <config_dir>/proman/store.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log sync progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    projects: &'a [proman_types::Project],
    editors: &'a [proman_types::Editor],
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match cli.config {
        Some(path) => ConfigFile::at(path),
        None => ConfigFile::default_location()?,
    };
    let db_path = match cli.db {
        Some(path) => path,
        None => proman_db::default_db_path()?,
    };

    let state = AppState::open(config, &db_path)
        .await
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;

    let result = run(&state).await;
    state.shutdown().await;
    result
}

async fn run(state: &AppState) -> Result<()> {
    let config = state.config.load()?;
    for (field, problem) in validate_config(&config) {
        tracing::warn!(field = %field, problem = %problem, "Invalid configuration");
    }

    let report = state.projects.sync().await.context("project sync failed")?;
    tracing::info!(
        root = %report.root.display(),
        projects = report.projects.len(),
        "Synced projects"
    );

    let editors = state.editors.get_all(false).await?;
    let output = Output {
        projects: &report.projects,
        editors: &editors,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
