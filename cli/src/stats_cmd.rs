use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::{DateTime, Utc};
use clap::Parser;
use lancer_backend_client::BackendClient;
use lancer_stats::{RefreshOutcome, StatsController, Workspace, derive_stats};

use crate::config::AppConfig;
use crate::{print_json, read_json, repository};

#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Workspace JSON, as returned by the backend.
    #[arg(long = "file", short = 'f')]
    pub file: PathBuf,

    /// Reference time for activity windows (RFC 3339). Defaults to now.
    #[arg(long = "now")]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Parser)]
pub struct RefreshArgs {
    /// Workspace id.
    pub workspace_id: String,

    /// Bearer token. Defaults to the stored session token.
    #[arg(long = "token")]
    pub token: Option<String>,
}

pub(crate) fn run_stats(args: &StatsArgs, config: &AppConfig) -> anyhow::Result<()> {
    let raw = read_json(&args.file)?;
    let workspace = Workspace::from_json(&raw);
    let now = args.now.unwrap_or_else(Utc::now);
    print_json(&derive_stats(&workspace, &config.stats_options(), now))
}

pub(crate) async fn run_refresh(args: &RefreshArgs, config: &AppConfig) -> anyhow::Result<()> {
    let session = repository(config).session()?;
    let mut client = BackendClient::new(config.backend_config())?.with_session(&session);
    if let Some(token) = &args.token {
        client = client.with_token(token.clone());
    }

    let controller = StatsController::new(
        args.workspace_id.clone(),
        Arc::new(client),
        config.stats_options(),
    );
    match controller.refresh().await {
        RefreshOutcome::Applied(stats) => print_json(stats.as_ref()),
        RefreshOutcome::Failed(err) => bail!("refresh failed: {err}"),
        RefreshOutcome::Superseded { seq, latest } => {
            bail!("refresh {seq} superseded by {latest}")
        }
        RefreshOutcome::Detached => bail!("refresh cancelled"),
    }
}
