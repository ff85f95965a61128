//! `isa rejected` command implementation.

use std::path::PathBuf;

use clap::Args;
use isa_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rejected command.
#[derive(Args)]
pub(crate) struct RejectedArgs {
    /// Contributor username.
    #[arg(short, long)]
    user: String,

    /// File title, e.g. "File:Example.jpg".
    #[arg(short, long)]
    file: String,

    /// Path to configuration file (default: auto-discover isa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RejectedArgs {
    /// Execute the rejected command.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let store = super::open_store(&config).await?;

        let depicts = store.rejected_depicts(&self.user, &self.file).await?;
        output.rejected_depicts(&self.user, &self.file, &depicts);
        Ok(())
    }
}
