use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lancer_backend_client::BackendClient;
use lancer_profile::{DataUrlEncoder, ProfileWizard, PublicProfile, completeness, load_existing};
use serde_json::json;

use crate::config::AppConfig;
use crate::{print_json, read_json, repository};

#[derive(Debug, Parser)]
pub struct ProfileCli {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileSubcommand {
    /// Print the stored profile as a public profile card.
    Show,
    /// Run a payload through the profile wizard and store it.
    Import(ImportArgs),
    /// Remove the stored profile.
    Clear,
}

#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Profile payload JSON (current or legacy shape).
    pub file: PathBuf,

    /// Upload picked files to the backend instead of inlining them.
    #[arg(long = "upload")]
    pub upload: bool,
}

pub(crate) async fn run(cli: ProfileCli, config: &AppConfig) -> anyhow::Result<()> {
    let repo = repository(config);
    match cli.command {
        ProfileSubcommand::Show => {
            let submitted = repo.is_submitted()?;
            let Some(stored) = repo.load_profile()? else {
                return print_json(&json!({ "stored": false, "submitted": submitted }));
            };
            print_json(&json!({
                "stored": true,
                "submitted": submitted,
                "schemaVersion": stored.schema_version,
                "migrated": stored.was_migrated(),
                "completeness": completeness(&load_existing(&stored.profile)),
                "profile": PublicProfile::from_payload(&stored.profile),
            }))
        }
        ProfileSubcommand::Import(args) => {
            let payload = read_json(&args.file)?;
            let wizard = ProfileWizard::edit(&payload);
            let outcome = if args.upload {
                let session = repo.session()?;
                let client = BackendClient::new(config.backend_config())?.with_session(&session);
                wizard.submit(&repo, &client).await?
            } else {
                wizard.submit(&repo, &DataUrlEncoder::default()).await?
            };
            tracing::info!(name = %outcome.payload.profile.name, "profile imported");
            print_json(&json!({
                "redirect": outcome.redirect.path(),
                "payload": outcome.payload,
            }))
        }
        ProfileSubcommand::Clear => {
            repo.clear_profile()?;
            repo.mark_submitted(false)?;
            print_json(&json!({ "cleared": true }))
        }
    }
}
