//! Application state.

use isa_batch::BatchSubmitter;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Batch pipeline, also the owner of the store.
    pub(crate) submitter: BatchSubmitter,
}
