//! `lancer` command-line front end.
//!
//! Every command prints a single JSON document on stdout; logs go to
//! stderr.

pub mod config;
mod profile_cmd;
mod services_cmd;
mod stats_cmd;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lancer_store::{FileStore, ProfileRepository};
use serde::Serialize;
use serde_json::Value;

pub use profile_cmd::{ProfileCli, ProfileSubcommand};
pub use services_cmd::{ServicesCli, ServicesSubcommand};
pub use stats_cmd::{RefreshArgs, StatsArgs};

use crate::config::{AppConfig, ConfigLoader};

#[derive(Debug, Parser)]
#[command(name = "lancer", version, about = "Freelancer workspace and profile tools")]
pub struct Cli {
    /// Configuration file (TOML). Defaults to ./lancer.toml or the user
    /// config directory.
    #[arg(long = "config", short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive workspace statistics from a JSON file.
    Stats(StatsArgs),
    /// Fetch a workspace from the backend and derive its statistics.
    Refresh(RefreshArgs),
    /// Stored freelancer profile.
    Profile(ProfileCli),
    /// Service catalog.
    Services(ServicesCli),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigLoader::load_default(cli.config.as_deref())?;
    tracing::debug!(storage = %config.storage.path.display(), api = %config.api.base_url, "configuration loaded");

    match cli.command {
        Command::Stats(args) => stats_cmd::run_stats(&args, &config),
        Command::Refresh(args) => stats_cmd::run_refresh(&args, &config).await,
        Command::Profile(profile) => profile_cmd::run(profile, &config).await,
        Command::Services(services) => services_cmd::run(&services),
    }
}

pub(crate) fn repository(config: &AppConfig) -> ProfileRepository {
    ProfileRepository::new(Arc::new(FileStore::new(config.storage.path.clone())))
}

pub(crate) fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
