//! HTTP server for ISA contribution submission.
//!
//! Exposes the batch pipeline and the suggestion feedback store to the
//! contribution UI:
//! - `POST /api/post-contribution` submits a batch of edit intents
//! - `POST /api/reject-suggestion` records a rejected depict suggestion
//! - `GET /api/get-rejected-statements` lists a user's rejections for a file
//!
//! Sign-in happens in front of this service; the resolved session travels in
//! the request body.
//!
//! # Quick Start
//!
//! ```ignore
//! use isa_server::{run_server, server_config_from_isa_config};
//!
//! let config = isa_config::Config::load(None, None)?;
//! run_server(server_config_from_isa_config(&config)?).await?;
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use isa_batch::BatchSubmitter;
use isa_commons::{CommonsClient, CredentialProvider};
use isa_config::{CommonsConfig, ConfigError};
use isa_store::{ContributionStore, SqliteStore};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Platform access; `None` runs in simulation mode.
    pub commons: Option<CommonsConfig>,
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the platform client
/// cannot be built, or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn ContributionStore> =
        Arc::new(SqliteStore::open(&config.database_path).await?);

    let submitter = match &config.commons {
        Some(commons) => {
            let client = Arc::new(CommonsClient::from_config(commons)?);
            tracing::info!(api_url = %client.api_url(), "Submitting to platform");
            BatchSubmitter::new(
                Arc::clone(&client) as Arc<dyn CredentialProvider>,
                client,
                store,
            )
        }
        None => {
            tracing::warn!("Simulation mode: edits are not sent to the platform");
            BatchSubmitter::simulated(store)
        }
    };

    let app = app::create_router(Arc::new(AppState { submitter }));

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        database = %config.database_path.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from ISA config.
///
/// # Errors
///
/// Returns an error if submission is live and the `[commons]` section is
/// incomplete.
pub fn server_config_from_isa_config(
    config: &isa_config::Config,
) -> Result<ServerConfig, ConfigError> {
    let commons = if config.submission.simulate {
        None
    } else {
        Some(config.require_commons()?.clone())
    };

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        database_path: config.database_resolved.path.clone(),
        commons,
    })
}
