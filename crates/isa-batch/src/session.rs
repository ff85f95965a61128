//! Contribution session passed into the pipeline.

use isa_commons::AccessCredential;
use serde::Deserialize;

/// Resolved state of the contributor's session.
///
/// Produced by the login layer in front of the pipeline and handed in
/// explicitly with every batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    /// Contributor's platform username, empty when signed out.
    #[serde(default)]
    pub username: String,
    /// Long-lived OAuth access token, absent until the user signs in.
    #[serde(default)]
    pub access: Option<AccessCredential>,
    /// Claim marker attached to the first edit of a batch.
    #[serde(default)]
    pub initial_claim: Option<String>,
}
