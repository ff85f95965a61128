//! Store error types.

/// Error from local store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or transaction failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// I/O error preparing the database file.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
