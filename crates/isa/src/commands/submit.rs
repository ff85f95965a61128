//! `isa submit` command implementation.

use std::path::PathBuf;

use clap::Args;
use isa_batch::{Session, parse_batch};
use isa_commons::AccessCredential;
use isa_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the submit command.
#[derive(Args)]
pub(crate) struct SubmitArgs {
    /// JSON file holding the array of edit intents.
    batch_file: PathBuf,

    /// Contributor username.
    #[arg(short, long)]
    user: String,

    /// OAuth access token key.
    #[arg(long, env = "ISA_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// OAuth access token secret.
    #[arg(long, env = "ISA_ACCESS_SECRET", hide_env_values = true)]
    access_secret: Option<String>,

    /// Claim marker attached to the first edit.
    #[arg(long)]
    initial_claim: Option<String>,

    /// Do not send edits to the platform.
    #[arg(long)]
    simulate: bool,

    /// SQLite database file (overrides config).
    #[arg(long)]
    database: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover isa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (log every remote call and commit).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SubmitArgs {
    /// Execute the submit command.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is invalid or no edit was confirmed.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            simulate: self.simulate.then_some(true),
            database_path: self.database.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let session = self.session()?;
        if session.access.is_none() && !config.submission.simulate {
            return Err(CliError::Validation(
                "--access-key and --access-secret are required unless --simulate is set".to_owned(),
            ));
        }

        let batch = parse_batch(&std::fs::read(&self.batch_file)?)?;
        output.info(&format!(
            "Submitting {} edit(s) from {} for campaign {}",
            batch.len(),
            self.batch_file.display(),
            batch.campaign_id()
        ));

        let store = super::open_store(&config).await?;
        super::describe_database(&output, &config.database_resolved.path);
        let submitter = super::build_submitter(&config, store, &output)?;

        let report = submitter.submit(session, batch).await?;
        output.submit_report(&report);
        Ok(())
    }

    /// Session for this invocation.
    fn session(&self) -> Result<Session, CliError> {
        let access = match (&self.access_key, &self.access_secret) {
            (Some(key), Some(secret)) => Some(AccessCredential::new(key, secret)),
            (None, None) => None,
            _ => {
                return Err(CliError::Validation(
                    "--access-key and --access-secret must be given together".to_owned(),
                ));
            }
        };

        Ok(Session {
            username: self.user.clone(),
            access,
            initial_claim: self.initial_claim.clone(),
        })
    }
}
