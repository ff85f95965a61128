//! CLI command implementations.

pub(crate) mod rejected;
pub(crate) mod serve;
pub(crate) mod submit;

use std::path::Path;
use std::sync::Arc;

use isa_batch::BatchSubmitter;
use isa_commons::{CommonsClient, CredentialProvider};
use isa_config::Config;
use isa_store::{ContributionStore, SqliteStore};

pub(crate) use rejected::RejectedArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use submit::SubmitArgs;

use crate::error::CliError;
use crate::output::Output;

/// Open the configured store, creating it on first use.
async fn open_store(config: &Config) -> Result<Arc<dyn ContributionStore>, CliError> {
    let store = SqliteStore::open(&config.database_resolved.path).await?;
    Ok(Arc::new(store))
}

/// Build the submitter for the configured mode.
fn build_submitter(
    config: &Config,
    store: Arc<dyn ContributionStore>,
    output: &Output,
) -> Result<BatchSubmitter, CliError> {
    if config.submission.simulate {
        output.simulation_notice();
        return Ok(BatchSubmitter::simulated(store));
    }

    let commons = config.require_commons().inspect_err(|_| {
        output.error("Error: [commons] configuration required in isa.toml");
        output.info("\nAdd the following to your isa.toml:");
        output.info("\n[commons]");
        output.info(r#"consumer_key = "your-consumer-key""#);
        output.info(r#"consumer_secret = "${ISA_CONSUMER_SECRET}""#);
        output.info("\nor run with --simulate.");
    })?;
    let client = Arc::new(CommonsClient::from_config(commons)?);
    output.info(&format!("Platform: {}", client.api_url()));
    Ok(BatchSubmitter::new(
        Arc::clone(&client) as Arc<dyn CredentialProvider>,
        client,
        store,
    ))
}

/// Describe where the store lives.
fn describe_database(output: &Output, path: &Path) {
    output.info(&format!("Database: {}", path.display()));
}
