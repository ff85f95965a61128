//! Batch-edit submission pipeline for ISA.
//!
//! A contributor's batch of structured-data edits is validated as a whole,
//! submitted to the platform one intent at a time, and recorded locally:
//!
//! - [`parse_intents`] and [`BatchSubmission`] reject a batch before any
//!   remote call when an action is outside the allow-list
//! - [`BatchOrchestrator`] walks the batch, chaining each edit onto the
//!   revision produced by the previous one and stopping at the first failure
//! - [`stage`] and [`reconcile`] persist records for confirmed edits only,
//!   plus suggestion feedback for every intent
//! - [`BatchSubmitter`] ties the three together for async callers
//! - [`reject_suggestion`] records a contributor's rejection of a suggested
//!   depict item
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use isa_batch::{BatchSubmitter, Session};
//! use isa_store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::open(path).await?);
//! let submitter = BatchSubmitter::simulated(store);
//! let report = submitter.submit_json(session, &intents).await?;
//! println!("{}", report.revision);
//! ```

mod error;
mod feedback;
mod intent;
mod orchestrator;
mod reconciler;
mod session;
mod submitter;
mod values;

pub use error::{AbortKind, RejectionError, SubmitError, ValidationError};
pub use feedback::{RejectionRequest, reject_suggestion};
pub use intent::{ApiOptions, BatchSubmission, EditIntent, SourceFlag, parse_batch, parse_intents};
pub use orchestrator::{BatchOrchestrator, BatchOutcome, RevisionChain, Termination};
pub use reconciler::{LocalRecord, SubmitReport, reconcile, stage};
pub use session::Session;
pub use submitter::BatchSubmitter;
