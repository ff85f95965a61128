//! Value types shared by the credential and edit paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Remote operation kinds an edit intent may request.
///
/// This is the complete allow-list: anything else is rejected before a
/// remote call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditAction {
    /// Create or replace a structured-data statement.
    #[serde(rename = "wbsetclaim", alias = "set-claim")]
    SetClaim,
    /// Remove one or more statements by GUID.
    #[serde(rename = "wbremoveclaims", alias = "remove-claims")]
    RemoveClaims,
    /// Set a caption (label) in one language.
    #[serde(rename = "wbsetlabel", alias = "set-label")]
    SetLabel,
}

impl EditAction {
    /// All allowed actions.
    pub const ALL: [Self; 3] = [Self::SetClaim, Self::RemoveClaims, Self::SetLabel];

    /// Action API module name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetClaim => "wbsetclaim",
            Self::RemoveClaims => "wbremoveclaims",
            Self::SetLabel => "wbsetlabel",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action string outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("action '{0}' is not allowed")]
pub struct ParseEditActionError(pub String);

impl FromStr for EditAction {
    type Err = ParseEditActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wbsetclaim" | "set-claim" => Ok(Self::SetClaim),
            "wbremoveclaims" | "remove-claims" => Ok(Self::RemoveClaims),
            "wbsetlabel" | "set-label" => Ok(Self::SetLabel),
            other => Err(ParseEditActionError(other.to_owned())),
        }
    }
}

/// Revision identifier issued by the platform for one successful edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(pub u64);

impl RevisionId {
    /// Sentinel returned by every simulated edit.
    pub const SIMULATED: Self = Self(1);
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Long-lived per-session OAuth access token.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessCredential {
    /// Access token.
    pub key: String,
    /// Access token secret.
    pub secret: String,
}

impl AccessCredential {
    /// Create a credential from its two halves.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}
