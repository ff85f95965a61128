//! Rejection of machine-suggested depict items.

use chrono::NaiveDate;
use isa_store::{ContributionStore, SuggestionFeedback, SuggestionStatus};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::RejectionError;
use crate::values;

/// Rejection as posted by the contribution UI.
///
/// Every key must be present; values are validated by [`reject_suggestion`].
#[derive(Debug, Clone, Deserialize)]
pub struct RejectionRequest {
    pub file: Value,
    pub depict_item: Value,
    pub campaign_id: Value,
    pub google_vision: Value,
    pub google_vision_confidence: Value,
    pub metadata_to_concept: Value,
    pub metadata_to_concept_confidence: Value,
}

impl RejectionRequest {
    /// Read a rejection from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RejectionError::MissingFields`] when a key is absent.
    pub fn from_value(value: Value) -> Result<Self, RejectionError> {
        serde_json::from_value(value).map_err(|e| RejectionError::MissingFields(e.to_string()))
    }

    fn validate(
        &self,
        username: &str,
        date: NaiveDate,
    ) -> Result<SuggestionFeedback, RejectionError> {
        let campaign_id = values::integer(&self.campaign_id)
            .filter(|id| *id > 0)
            .ok_or(RejectionError::InvalidCampaign)?;
        let file = non_empty(&self.file).ok_or(RejectionError::InvalidFile)?;
        let depict_item = non_empty(&self.depict_item).ok_or(RejectionError::InvalidDepictItem)?;

        let google_vision_confidence = values::confidence(&self.google_vision_confidence)
            .map_err(|_| RejectionError::InvalidValue("google_vision_confidence"))?;
        let metadata_to_concept_confidence =
            values::confidence(&self.metadata_to_concept_confidence)
                .map_err(|_| RejectionError::InvalidValue("metadata_to_concept_confidence"))?;
        let google_vision = values::flag(&self.google_vision)
            .map_err(|_| RejectionError::InvalidValue("google_vision"))?;
        let metadata_to_concept = values::flag(&self.metadata_to_concept)
            .map_err(|_| RejectionError::InvalidValue("metadata_to_concept"))?;

        Ok(SuggestionFeedback {
            campaign_id,
            username: username.to_owned(),
            file_name: file.to_owned(),
            depict_item: Some(depict_item.to_owned()),
            status: SuggestionStatus::Rejected,
            google_vision: google_vision.unwrap_or_default(),
            google_vision_confidence,
            metadata_to_concept: metadata_to_concept.unwrap_or_default(),
            metadata_to_concept_confidence,
            google_vision_submitted: 0,
            metadata_to_concept_submitted: 0,
            date,
        })
    }
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Validate and record a rejected suggestion.
///
/// # Errors
///
/// Returns a [`RejectionError`] describing the first invalid value, or
/// [`RejectionError::Store`] if the write fails.
pub async fn reject_suggestion(
    store: &dyn ContributionStore,
    username: &str,
    request: &RejectionRequest,
) -> Result<(), RejectionError> {
    let rejection = request.validate(username, chrono::Utc::now().date_naive())?;
    store.record_rejection(&rejection).await?;
    info!(
        file = %rejection.file_name,
        depict_item = ?rejection.depict_item,
        "Suggestion rejected"
    );
    Ok(())
}
