//! Error types for batch submission.

use isa_store::StoreError;

/// Batch rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Payload is not a JSON array.
    #[error("batch is not a JSON array of edit intents: {0}")]
    InvalidJson(String),

    /// Nothing to submit.
    #[error("batch is empty")]
    Empty,

    /// An intent requests a remote action outside the allow-list.
    #[error("intent {index}: action '{action}' is not allowed")]
    DisallowedAction {
        /// Position of the offending intent.
        index: usize,
        /// Action as sent.
        action: String,
    },

    /// An intent is structurally invalid.
    #[error("intent {index}: {message}")]
    Malformed {
        /// Position of the offending intent.
        index: usize,
        /// What is wrong with it.
        message: String,
    },

    /// Intents of one batch name different campaigns.
    #[error("intent {index}: campaign {found} differs from campaign {expected} of the batch")]
    MixedCampaigns {
        /// Position of the offending intent.
        index: usize,
        /// Campaign of the first intent.
        expected: i64,
        /// Campaign of the offending intent.
        found: i64,
    },
}

/// Why the orchestrator stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortKind {
    /// Credential minting failed.
    Authentication,
    /// The platform rejected the edit or the call failed in transit.
    RemoteEdit,
}

/// Batch submission failure.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Batch rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No remote edit was confirmed.
    #[error("no edit was confirmed: {message}")]
    NothingConfirmed {
        /// Failure class of the first intent.
        kind: AbortKind,
        /// Underlying error message.
        message: String,
    },

    /// Blocking worker running the batch panicked or was cancelled.
    #[error("batch worker failed: {0}")]
    Worker(String),
}

/// Suggestion rejection failure.
#[derive(Debug, thiserror::Error)]
pub enum RejectionError {
    /// Required keys are missing or the body is not an object.
    #[error("missing required fields: {0}")]
    MissingFields(String),

    /// `campaign_id` is not a positive integer.
    #[error("invalid campaign id")]
    InvalidCampaign,

    /// `file` is empty or not a string.
    #[error("invalid file")]
    InvalidFile,

    /// `depict_item` is empty or not a string.
    #[error("invalid depict_item")]
    InvalidDepictItem,

    /// A confidence is not within `0.0..=1.0`.
    #[error("invalid {0}")]
    InvalidValue(&'static str),

    /// Store write failed.
    #[error("store error")]
    Store(#[from] StoreError),
}
