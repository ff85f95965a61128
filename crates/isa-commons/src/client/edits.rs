//! Edit submission (`wbsetclaim`, `wbremoveclaims`, `wbsetlabel`).

use serde::Deserialize;
use tracing::{debug, info};

use super::{ApiErrorBody, CommonsClient, read_body};
use crate::credentials::EditCredentials;
use crate::edit::{EditRequest, RemoteEditClient};
use crate::error::CommonsError;
use crate::types::RevisionId;

#[derive(Debug, Deserialize)]
struct EditResponse {
    error: Option<ApiErrorBody>,
    pageinfo: Option<LastRevision>,
    entity: Option<LastRevision>,
}

#[derive(Debug, Deserialize)]
struct LastRevision {
    lastrevid: Option<u64>,
}

/// Extract the new revision id from an edit response body.
///
/// Claim edits report it under `pageinfo`, label edits under `entity`.
fn parse_edit_response(body: &str) -> Result<RevisionId, CommonsError> {
    let response: EditResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        return Err(error.into());
    }

    response
        .pageinfo
        .and_then(|p| p.lastrevid)
        .or_else(|| response.entity.and_then(|e| e.lastrevid))
        .map(RevisionId)
        .ok_or(CommonsError::MissingRevision)
}

impl RemoteEditClient for CommonsClient {
    fn submit(
        &self,
        credentials: &EditCredentials,
        request: &EditRequest,
    ) -> Result<RevisionId, CommonsError> {
        let signer = credentials
            .signer
            .as_ref()
            .ok_or_else(|| CommonsError::Authentication("credentials carry no signer".to_owned()))?;

        let form = request.form_params(&credentials.csrf_token);
        debug!(
            action = %request.action,
            baserevid = ?request.base_revision(),
            "Submitting edit"
        );

        let auth_header = signer.sign("POST", &self.api_url, &form)?;

        let response = self
            .agent
            .post(&self.api_url)
            .header("Authorization", &auth_header)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send_form(form.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

        let revision = parse_edit_response(&read_body(response)?)?;
        info!(action = %request.action, revision = %revision, "Edit applied");
        Ok(revision)
    }
}
