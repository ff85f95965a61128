//! `isa serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use isa_config::{CliSettings, Config};
use isa_server::{run_server, server_config_from_isa_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover isa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides config).
    #[arg(long)]
    database: Option<PathBuf>,

    /// Do not send edits to the platform.
    #[arg(long)]
    simulate: bool,

    /// Enable verbose output (log every remote call and commit).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            simulate: self.simulate.then_some(true),
            database_path: self.database,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;

        let server_config = server_config_from_isa_config(&config)?;

        output.info(&format!(
            "Starting server on {}:{}",
            server_config.host, server_config.port
        ));
        super::describe_database(&output, &server_config.database_path);
        match &server_config.commons {
            Some(commons) => output.info(&format!("Platform: {}", commons.api_url)),
            None => output.simulation_notice(),
        }

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
