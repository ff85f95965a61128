//! CLI error types.

use isa_batch::{SubmitError, ValidationError};
use isa_commons::CommonsError;
use isa_config::ConfigError;
use isa_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Commons(#[from] CommonsError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Batch(#[from] ValidationError),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
