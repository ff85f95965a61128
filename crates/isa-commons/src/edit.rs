//! Remote edit requests.

use std::collections::BTreeMap;

use crate::credentials::EditCredentials;
use crate::error::CommonsError;
use crate::types::{EditAction, RevisionId};

/// Parameters for one Action API edit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Action API module.
    pub action: EditAction,
    /// Module parameters (`claim`, `id`, `language`, `value`, `baserevid`, ...).
    pub params: BTreeMap<String, String>,
    /// Session claim marker carried by the first edit of a batch.
    ///
    /// Local bookkeeping only; never sent to the platform.
    pub initial_claim: Option<String>,
}

/// Parameters the client always sets itself.
const RESERVED_PARAMS: [&str; 3] = ["action", "token", "format"];

impl EditRequest {
    /// Create a request with no parameters.
    pub fn new(action: EditAction) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
            initial_claim: None,
        }
    }

    /// Builder-style parameter setter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// `baserevid` parameter, if present and numeric.
    pub fn base_revision(&self) -> Option<RevisionId> {
        self.params
            .get("baserevid")
            .and_then(|v| v.parse().ok())
            .map(RevisionId)
    }

    /// Form fields sent on the wire, including the CSRF token.
    pub fn form_params(&self, csrf_token: &str) -> Vec<(String, String)> {
        let mut form = vec![("action".to_owned(), self.action.as_str().to_owned())];
        form.extend(
            self.params
                .iter()
                .filter(|(k, _)| !RESERVED_PARAMS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        form.push(("format".to_owned(), "json".to_owned()));
        form.push(("token".to_owned(), csrf_token.to_owned()));
        form
    }
}

/// Issues one authenticated edit and reports the new revision.
pub trait RemoteEditClient: Send + Sync {
    /// Perform the edit.
    ///
    /// # Errors
    ///
    /// Any rejection, transport error or timeout is a failure; callers do not
    /// distinguish between them.
    fn submit(
        &self,
        credentials: &EditCredentials,
        request: &EditRequest,
    ) -> Result<RevisionId, CommonsError>;
}

/// Remote client for simulation mode.
///
/// Never touches the network and always reports [`RevisionId::SIMULATED`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedEditClient;

impl RemoteEditClient for SimulatedEditClient {
    fn submit(
        &self,
        _credentials: &EditCredentials,
        request: &EditRequest,
    ) -> Result<RevisionId, CommonsError> {
        tracing::debug!(action = %request.action, "Simulated edit");
        Ok(RevisionId::SIMULATED)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::credentials::{CredentialProvider, SimulatedCredentials};

    #[test]
    fn test_form_params_order_and_reserved_fields() {
        let mut request = EditRequest::new(EditAction::SetLabel)
            .with_param("id", "M12345")
            .with_param("language", "en")
            .with_param("value", "A red bridge")
            .with_param("token", "stale")
            .with_param("format", "xml");
        request.initial_claim = Some("M12345$abc".to_owned());

        let form = request.form_params("fresh+\\");

        let expected: Vec<(String, String)> = [
            ("action", "wbsetlabel"),
            ("id", "M12345"),
            ("language", "en"),
            ("value", "A red bridge"),
            ("format", "json"),
            ("token", "fresh+\\"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
        assert_eq!(form, expected);
    }

    #[test]
    fn test_initial_claim_not_sent() {
        let mut request = EditRequest::new(EditAction::SetClaim);
        request.initial_claim = Some("M1$claim".to_owned());

        let form = request.form_params("t");

        assert!(
            form.iter()
                .all(|(k, v)| k != "initial_claim" && v != "M1$claim")
        );
    }

    #[test]
    fn test_base_revision() {
        let request = EditRequest::new(EditAction::SetClaim).with_param("baserevid", "42");
        assert_eq!(request.base_revision(), Some(RevisionId(42)));

        let request = EditRequest::new(EditAction::SetClaim).with_param("baserevid", "abc");
        assert_eq!(request.base_revision(), None);
    }

    #[test]
    fn test_simulated_client_returns_sentinel() {
        let credentials = SimulatedCredentials.mint(None).unwrap();
        let request = EditRequest::new(EditAction::RemoveClaims).with_param("claim", "M1$x");

        let revision = SimulatedEditClient.submit(&credentials, &request).unwrap();

        assert_eq!(revision, RevisionId::SIMULATED);
    }
}
