//! Edit intents and batch validation.

use std::collections::BTreeMap;

use isa_commons::{EditAction, EditRequest};
use isa_store::{ContributionAction, EditType};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::values;

/// Remote-call parameters of one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOptions {
    /// Requested remote operation.
    pub action: EditAction,
    /// Session claim marker, local only.
    pub initial_claim: Option<String>,
    /// Remaining module parameters, stringified.
    pub params: BTreeMap<String, String>,
}

impl ApiOptions {
    /// Build from the `api_options` object of an intent.
    ///
    /// Strings are taken as-is, other values are serialized as compact JSON
    /// (claims travel as JSON text), nulls are dropped.
    fn from_map(map: &Map<String, Value>) -> Result<Self, String> {
        let action = match map.get("action") {
            Some(Value::String(s)) => s.parse::<EditAction>().map_err(|e| e.to_string())?,
            Some(other) => return Err(format!("action '{other}' is not allowed")),
            None => return Err("api_options.action is required".to_owned()),
        };

        let initial_claim = match map.get("initial_claim") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        let params = map
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "action" | "initial_claim"))
            .filter_map(|(k, v)| match v {
                Value::Null => None,
                Value::String(s) => Some((k.clone(), s.clone())),
                other => Some((k.clone(), other.to_string())),
            })
            .collect();

        Ok(Self {
            action,
            initial_claim,
            params,
        })
    }

    /// Request as the remote client expects it.
    pub fn to_request(&self) -> EditRequest {
        EditRequest {
            action: self.action,
            params: self.params.clone(),
            initial_claim: self.initial_claim.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for ApiOptions {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        Self::from_map(&map).map_err(serde::de::Error::custom)
    }
}

/// Suggestion-source flag of an intent.
///
/// A key sent as null still marks the intent as suggested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceFlag {
    #[default]
    Absent,
    Null,
    Set(i64),
}

impl SourceFlag {
    pub fn is_present(self) -> bool {
        self != Self::Absent
    }

    /// Stored value; absent and null are 0.
    pub fn value(self) -> i64 {
        match self {
            Self::Set(flag) => flag,
            Self::Absent | Self::Null => 0,
        }
    }
}

impl<'de> Deserialize<'de> for SourceFlag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flag = values::flag(&Value::deserialize(deserializer)?)
            .map_err(serde::de::Error::custom)?;
        Ok(flag.map_or(Self::Null, Self::Set))
    }
}

/// One requested change to a file's structured data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditIntent {
    #[serde(deserialize_with = "values::de_integer")]
    pub campaign_id: i64,
    /// Target file (`File:...` title or bare name).
    pub image: String,
    pub edit_action: ContributionAction,
    pub edit_type: EditType,
    pub country: String,
    pub api_options: ApiOptions,

    #[serde(default)]
    pub depict_item: Option<String>,
    #[serde(default)]
    pub depict_prominent: Option<bool>,
    #[serde(default)]
    pub caption_language: Option<String>,
    #[serde(default)]
    pub caption_text: Option<String>,

    #[serde(default)]
    pub google_vision: SourceFlag,
    #[serde(default, deserialize_with = "values::de_confidence")]
    pub google_vision_confidence: Option<f64>,
    #[serde(default)]
    pub metadata_to_concept: SourceFlag,
    #[serde(default, deserialize_with = "values::de_confidence")]
    pub metadata_to_concept_confidence: Option<f64>,
}

impl EditIntent {
    /// Whether the intent leaves a contribution record once confirmed.
    ///
    /// `edit` corrects an earlier contribution and adds none.
    pub fn creates_record(&self) -> bool {
        self.edit_action != ContributionAction::Edit
    }

    /// Whether a suggestion service proposed the depict item.
    pub fn has_suggestion(&self) -> bool {
        self.google_vision.is_present() || self.metadata_to_concept.is_present()
    }
}

/// Ordered intents of one session, all for one campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSubmission {
    campaign_id: i64,
    intents: Vec<EditIntent>,
}

impl BatchSubmission {
    /// Validate batch-level constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] for an empty batch and
    /// [`ValidationError::MixedCampaigns`] when intents disagree on the campaign.
    pub fn new(intents: Vec<EditIntent>) -> Result<Self, ValidationError> {
        let first = intents.first().ok_or(ValidationError::Empty)?;
        let campaign_id = first.campaign_id;

        if campaign_id <= 0 {
            return Err(ValidationError::Malformed {
                index: 0,
                message: format!("campaign_id must be positive, got {campaign_id}"),
            });
        }
        if let Some((index, intent)) = intents
            .iter()
            .enumerate()
            .find(|(_, intent)| intent.campaign_id != campaign_id)
        {
            return Err(ValidationError::MixedCampaigns {
                index,
                expected: campaign_id,
                found: intent.campaign_id,
            });
        }

        Ok(Self {
            campaign_id,
            intents,
        })
    }

    /// Campaign every intent belongs to.
    pub fn campaign_id(&self) -> i64 {
        self.campaign_id
    }

    /// Intents in submission order.
    pub fn intents(&self) -> &[EditIntent] {
        &self.intents
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Parse raw intents.
///
/// Every `api_options.action` is checked against the allow-list first, so a
/// disallowed action anywhere rejects the whole batch even when an earlier
/// intent is malformed in some other way.
///
/// # Errors
///
/// Returns [`ValidationError::DisallowedAction`] or [`ValidationError::Malformed`]
/// naming the first offending intent.
pub fn parse_intents(values: &[Value]) -> Result<Vec<EditIntent>, ValidationError> {
    for (index, value) in values.iter().enumerate() {
        match value.pointer("/api_options/action") {
            Some(Value::String(action)) => {
                if action.parse::<EditAction>().is_err() {
                    return Err(ValidationError::DisallowedAction {
                        index,
                        action: action.clone(),
                    });
                }
            }
            Some(other) => {
                return Err(ValidationError::DisallowedAction {
                    index,
                    action: other.to_string(),
                });
            }
            None => {
                return Err(ValidationError::Malformed {
                    index,
                    message: "api_options.action is required".to_owned(),
                });
            }
        }
    }

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            EditIntent::deserialize(value).map_err(|e| ValidationError::Malformed {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Parse and validate a JSON batch.
///
/// # Errors
///
/// Returns [`ValidationError`] if the payload is not an array of valid intents
/// or violates a batch-level constraint.
pub fn parse_batch(json: &[u8]) -> Result<BatchSubmission, ValidationError> {
    let values: Vec<Value> =
        serde_json::from_slice(json).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    BatchSubmission::new(parse_intents(&values)?)
}
