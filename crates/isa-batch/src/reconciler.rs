//! Local persistence after a batch walk.
//!
//! Contribution records are written only for confirmed edits. Suggestion
//! feedback is written for every intent that carried a suggestion, whatever
//! happened remotely.

use chrono::NaiveDate;
use isa_commons::RevisionId;
use isa_store::{
    ContributionRecord, ContributionStore, SuggestionFeedback, SuggestionStatus, WriteSet,
};
use tracing::{error, info, warn};

use crate::error::{AbortKind, SubmitError};
use crate::intent::{BatchSubmission, EditIntent};
use crate::orchestrator::{BatchOutcome, Termination};
use crate::session::Session;

/// Whether the local audit trail matches the remote edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalRecord {
    /// Every staged record was committed.
    Written,
    /// The commit failed; the remote edits have no local record.
    Missing,
}

/// What the caller is told about a batch with at least one confirmed edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Revision of the last confirmed edit.
    pub revision: RevisionId,
    pub confirmed: usize,
    pub attempted: usize,
    /// Intents in the batch.
    pub total: usize,
    pub local_record: LocalRecord,
}

fn contribution_record(
    session: &Session,
    intent: &EditIntent,
    date: NaiveDate,
) -> ContributionRecord {
    ContributionRecord {
        username: session.username.clone(),
        campaign_id: intent.campaign_id,
        file: intent.image.clone(),
        edit_action: intent.edit_action,
        edit_type: intent.edit_type,
        country: intent.country.clone(),
        depict_item: intent.depict_item.clone(),
        depict_prominent: intent.depict_prominent,
        caption_language: intent.caption_language.clone(),
        caption_text: intent.caption_text.clone(),
        date,
    }
}

fn suggestion_feedback(
    session: &Session,
    intent: &EditIntent,
    date: NaiveDate,
) -> SuggestionFeedback {
    SuggestionFeedback {
        campaign_id: intent.campaign_id,
        username: session.username.clone(),
        file_name: intent.image.clone(),
        depict_item: intent.depict_item.clone(),
        status: SuggestionStatus::Accepted,
        google_vision: intent.google_vision.value(),
        google_vision_confidence: intent.google_vision_confidence,
        metadata_to_concept: intent.metadata_to_concept.value(),
        metadata_to_concept_confidence: intent.metadata_to_concept_confidence,
        google_vision_submitted: 0,
        metadata_to_concept_submitted: 0,
        date,
    }
}

/// Build the write set for a finished walk.
///
/// A contribution record is staged for each non-`edit` intent inside the
/// confirmed prefix of the batch.
pub fn stage(
    session: &Session,
    batch: &BatchSubmission,
    outcome: &BatchOutcome,
    date: NaiveDate,
) -> WriteSet {
    let contributions = batch
        .intents()
        .iter()
        .take(outcome.confirmed)
        .filter(|intent| intent.creates_record())
        .map(|intent| contribution_record(session, intent, date))
        .collect();

    let suggestions = batch
        .intents()
        .iter()
        .filter(|intent| intent.has_suggestion())
        .map(|intent| suggestion_feedback(session, intent, date))
        .collect();

    WriteSet {
        contributions,
        suggestions,
    }
}

/// Commit the write set and decide what the caller is told.
///
/// A failed commit after at least one confirmed edit still reports
/// success, flagged [`LocalRecord::Missing`] and logged at warn level.
///
/// # Errors
///
/// Returns [`SubmitError::NothingConfirmed`] when no edit was confirmed.
pub async fn reconcile(
    store: &dyn ContributionStore,
    writes: &WriteSet,
    outcome: &BatchOutcome,
    total: usize,
) -> Result<SubmitReport, SubmitError> {
    let committed = if writes.is_empty() {
        Ok(())
    } else {
        store.commit(writes).await
    };

    let Some(revision) = outcome.last_revision.filter(|_| outcome.confirmed > 0) else {
        if let Err(e) = committed {
            error!(
                error = %e,
                suggestions = writes.suggestions.len(),
                "Failed to record suggestion feedback"
            );
        }
        let (kind, message) = match &outcome.termination {
            Termination::Aborted { kind, message, .. } => (*kind, message.clone()),
            Termination::Completed => (AbortKind::RemoteEdit, "batch was empty".to_owned()),
        };
        return Err(SubmitError::NothingConfirmed { kind, message });
    };

    let local_record = match committed {
        Ok(()) => {
            info!(
                contributions = writes.contributions.len(),
                suggestions = writes.suggestions.len(),
                "Recorded batch locally"
            );
            LocalRecord::Written
        }
        Err(e) => {
            warn!(
                error = %e,
                confirmed = outcome.confirmed,
                revision = %revision,
                "Remote edits applied but not recorded locally"
            );
            LocalRecord::Missing
        }
    };

    Ok(SubmitReport {
        revision,
        confirmed: outcome.confirmed,
        attempted: outcome.attempted,
        total,
        local_record,
    })
}
