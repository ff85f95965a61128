//! Test doubles for the credential and edit paths.
//!
//! Provides [`StaticCredentials`] and [`ScriptedEditClient`] for exercising
//! batch logic without a platform.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::credentials::{CredentialProvider, EditCredentials};
use crate::edit::{EditRequest, RemoteEditClient};
use crate::error::CommonsError;
use crate::types::{AccessCredential, RevisionId};

/// Credential provider returning a fixed token.
///
/// Requires an access credential like the live provider does, and can be
/// told to fail on a given call.
///
/// # Example
///
/// ```ignore
/// use isa_commons::{CredentialProvider, StaticCredentials};
///
/// let credentials = StaticCredentials::new().fail_on_call(1);
/// ```
#[derive(Debug, Default)]
pub struct StaticCredentials {
    fail_on: Option<usize>,
    minted: Mutex<usize>,
}

impl StaticCredentials {
    /// Token handed out by every successful mint.
    pub const TOKEN: &'static str = "mock-csrf+\\";

    /// Create a provider that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the mint with the given zero-based call index.
    #[must_use]
    pub fn fail_on_call(mut self, index: usize) -> Self {
        self.fail_on = Some(index);
        self
    }

    /// Number of mint calls so far, failed ones included.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn mint_count(&self) -> usize {
        *self.minted.lock().unwrap()
    }
}

impl CredentialProvider for StaticCredentials {
    fn mint(&self, access: Option<&AccessCredential>) -> Result<EditCredentials, CommonsError> {
        let call = {
            let mut minted = self.minted.lock().unwrap();
            *minted += 1;
            *minted - 1
        };

        if access.is_none() {
            return Err(CommonsError::MissingAccessCredential);
        }
        if self.fail_on == Some(call) {
            return Err(CommonsError::Authentication(
                "mwoauth-invalid-authorization".to_owned(),
            ));
        }

        Ok(EditCredentials {
            csrf_token: Self::TOKEN.to_owned(),
            signer: None,
        })
    }
}

/// Outcome of one scripted edit.
#[derive(Debug, Clone)]
enum Scripted {
    Revision(RevisionId),
    Failure(String),
}

/// Remote client replaying scripted outcomes in call order.
///
/// Once the script is exhausted every further call succeeds with an
/// increasing revision id. Every request is recorded.
///
/// # Example
///
/// ```ignore
/// use isa_commons::{RevisionId, ScriptedEditClient};
///
/// let client = ScriptedEditClient::new()
///     .then_revision(RevisionId(101))
///     .then_failure("editconflict");
/// ```
#[derive(Debug)]
pub struct ScriptedEditClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<EditRequest>>,
    next_revision: Mutex<u64>,
}

impl Default for ScriptedEditClient {
    fn default() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            next_revision: Mutex::new(1000),
        }
    }
}

impl ScriptedEditClient {
    /// Create a client whose every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful edit returning `revision`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn then_revision(self, revision: RevisionId) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Revision(revision));
        self
    }

    /// Queue a rejected edit with the given API error code.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn then_failure(self, code: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(code.into()));
        self
    }

    /// Requests received so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn requests(&self) -> Vec<EditRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of submit calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl RemoteEditClient for ScriptedEditClient {
    fn submit(
        &self,
        _credentials: &EditCredentials,
        request: &EditRequest,
    ) -> Result<RevisionId, CommonsError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Revision(revision)) => Ok(revision),
            Some(Scripted::Failure(code)) => Err(CommonsError::Api {
                info: format!("scripted failure: {code}"),
                code,
            }),
            None => {
                let mut next = self.next_revision.lock().unwrap();
                *next += 1;
                Ok(RevisionId(*next))
            }
        }
    }
}
