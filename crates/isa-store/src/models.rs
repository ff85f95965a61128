//! Records persisted by the store.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a contribution did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ContributionAction {
    /// New statement or caption.
    Add,
    /// Removed statement.
    Remove,
    /// Correction of an earlier contribution; never recorded on its own.
    Edit,
}

impl ContributionAction {
    /// Lowercase name as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for ContributionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "edit" => Ok(Self::Edit),
            other => Err(format!("unknown edit action '{other}'")),
        }
    }
}

/// Which kind of metadata a contribution touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EditType {
    /// File caption (label).
    Caption,
    /// "Depicts" statement.
    Depicts,
}

impl EditType {
    /// Lowercase name as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::Depicts => "depicts",
        }
    }
}

impl fmt::Display for EditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remotely confirmed edit.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ContributionRecord {
    pub username: String,
    pub campaign_id: i64,
    pub file: String,
    pub edit_action: ContributionAction,
    pub edit_type: EditType,
    pub country: String,
    pub depict_item: Option<String>,
    pub depict_prominent: Option<bool>,
    pub caption_language: Option<String>,
    pub caption_text: Option<String>,
    pub date: NaiveDate,
}

/// Whether the contributor took a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Dismissed by the contributor.
    Rejected = 0,
    /// Submitted with a batch.
    Accepted = 1,
}

/// Record of a machine-suggested depict item offered to a contributor.
///
/// Source flags mark which suggestion service proposed the item.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SuggestionFeedback {
    pub campaign_id: i64,
    pub username: String,
    pub file_name: String,
    pub depict_item: Option<String>,
    #[sqlx(rename = "update_status")]
    pub status: SuggestionStatus,
    pub google_vision: i64,
    pub google_vision_confidence: Option<f64>,
    pub metadata_to_concept: i64,
    pub metadata_to_concept_confidence: Option<f64>,
    pub google_vision_submitted: i64,
    pub metadata_to_concept_submitted: i64,
    pub date: NaiveDate,
}

/// Records committed together after a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSet {
    pub contributions: Vec<ContributionRecord>,
    pub suggestions: Vec<SuggestionFeedback>,
}

impl WriteSet {
    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty() && self.suggestions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_action_parse() {
        assert_eq!("add".parse(), Ok(ContributionAction::Add));
        assert_eq!("remove".parse(), Ok(ContributionAction::Remove));
        assert_eq!("edit".parse(), Ok(ContributionAction::Edit));
        assert!("delete".parse::<ContributionAction>().is_err());
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&EditType::Depicts).ok().as_deref(),
            Some("\"depicts\"")
        );
        assert_eq!(
            serde_json::to_string(&SuggestionStatus::Rejected)
                .ok()
                .as_deref(),
            Some("\"rejected\"")
        );
    }

    #[test]
    fn test_empty_write_set() {
        assert!(WriteSet::default().is_empty());
    }
}
