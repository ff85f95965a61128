//! Store abstraction.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{ContributionRecord, SuggestionFeedback, WriteSet};

/// Durable record of contributions and suggestion feedback.
///
/// Implementations rely on their backend's transactions for isolation
/// between concurrent batches; no in-process locking is expected.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    /// Commit every record in `writes` in one transaction.
    ///
    /// Either all records become visible or none do.
    async fn commit(&self, writes: &WriteSet) -> Result<(), StoreError>;

    /// Record one rejected suggestion.
    ///
    /// When more than one earlier rejection exists for the same file and
    /// depict item (from any contributor), the source flags are copied
    /// into the `*_submitted` columns of the new row.
    async fn record_rejection(&self, rejection: &SuggestionFeedback) -> Result<(), StoreError>;

    /// Depict items the user rejected for a file, in rejection order.
    async fn rejected_depicts(&self, username: &str, file: &str)
    -> Result<Vec<String>, StoreError>;

    /// Contributions recorded for a user, oldest first.
    async fn contributions(&self, username: &str) -> Result<Vec<ContributionRecord>, StoreError>;

    /// Suggestion feedback recorded for a file, oldest first.
    async fn suggestions(&self, file: &str) -> Result<Vec<SuggestionFeedback>, StoreError>;
}
