//! Local contribution store for ISA.
//!
//! Keeps the audit trail of remotely confirmed edits and the feedback on
//! machine-suggested depict items:
//!
//! - [`ContributionStore`] trait with all-or-nothing [`ContributionStore::commit`]
//! - [`SqliteStore`] backed by SQLite with embedded migrations
//! - [`WriteSet`], [`ContributionRecord`], [`SuggestionFeedback`] records

mod error;
mod models;
mod sqlite;
mod store;

pub use error::StoreError;
pub use models::{
    ContributionAction, ContributionRecord, EditType, SuggestionFeedback, SuggestionStatus,
    WriteSet,
};
pub use sqlite::SqliteStore;
pub use store::ContributionStore;
