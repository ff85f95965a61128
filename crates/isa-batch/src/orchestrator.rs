//! Sequential walk over a batch with revision chaining.
//!
//! Each intent gets freshly minted credentials and is submitted with the
//! revision produced by the previous intent as its `baserevid`. The first
//! failure ends the walk; nothing after it is attempted.

use isa_commons::{CredentialProvider, EditRequest, RemoteEditClient, RevisionId};
use tracing::{debug, info, warn};

use crate::error::AbortKind;
use crate::intent::{BatchSubmission, EditIntent};
use crate::session::Session;

/// State carried from one intent to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevisionChain {
    /// Revision returned by the last confirmed edit.
    pub head: Option<RevisionId>,
    /// Edits confirmed so far.
    pub confirmed: usize,
}

/// How the walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every intent was confirmed.
    Completed,
    /// The intent at `index` failed; later intents were not attempted.
    Aborted {
        index: usize,
        kind: AbortKind,
        message: String,
    },
}

/// Result of one batch walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Number of confirmed edits; always a prefix of the batch.
    pub confirmed: usize,
    /// Revision of the last confirmed edit.
    pub last_revision: Option<RevisionId>,
    /// Remote edit calls issued, failed ones included.
    pub attempted: usize,
    pub termination: Termination,
}

impl BatchOutcome {
    /// Whether every intent was confirmed.
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Completed
    }
}

/// Failure of a single step.
struct StepFailure {
    kind: AbortKind,
    message: String,
}

/// Walks a batch against a credential provider and a remote client.
pub struct BatchOrchestrator<'a> {
    credentials: &'a dyn CredentialProvider,
    client: &'a dyn RemoteEditClient,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(credentials: &'a dyn CredentialProvider, client: &'a dyn RemoteEditClient) -> Self {
        Self {
            credentials,
            client,
        }
    }

    /// Submit every intent in order, stopping at the first failure.
    ///
    /// Blocks for the duration of the remote calls.
    pub fn run(&self, session: &Session, batch: &BatchSubmission) -> BatchOutcome {
        let walk = batch
            .intents()
            .iter()
            .enumerate()
            .try_fold(RevisionChain::default(), |chain, (index, intent)| {
                self.advance(session, chain, index, intent)
                    .map_err(|failure| (chain, index, failure))
            });

        match walk {
            Ok(chain) => {
                info!(confirmed = chain.confirmed, "Batch completed");
                BatchOutcome {
                    confirmed: chain.confirmed,
                    last_revision: chain.head,
                    attempted: chain.confirmed,
                    termination: Termination::Completed,
                }
            }
            Err((chain, index, failure)) => {
                let attempted = match failure.kind {
                    AbortKind::Authentication => chain.confirmed,
                    AbortKind::RemoteEdit => chain.confirmed + 1,
                };
                warn!(
                    index,
                    kind = ?failure.kind,
                    confirmed = chain.confirmed,
                    skipped = batch.len() - index - 1,
                    error = %failure.message,
                    "Batch aborted"
                );
                BatchOutcome {
                    confirmed: chain.confirmed,
                    last_revision: chain.head,
                    attempted,
                    termination: Termination::Aborted {
                        index,
                        kind: failure.kind,
                        message: failure.message,
                    },
                }
            }
        }
    }

    /// Process one intent and return the extended chain.
    fn advance(
        &self,
        session: &Session,
        chain: RevisionChain,
        index: usize,
        intent: &EditIntent,
    ) -> Result<RevisionChain, StepFailure> {
        let request = chain_request(intent, chain, session);

        let credentials = self
            .credentials
            .mint(session.access.as_ref())
            .map_err(|e| StepFailure {
                kind: AbortKind::Authentication,
                message: e.to_string(),
            })?;

        debug!(
            index,
            action = %request.action,
            baserevid = ?request.base_revision(),
            "Submitting intent"
        );
        let revision = self
            .client
            .submit(&credentials, &request)
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(index, "Remote edit timed out");
                }
                StepFailure {
                    kind: AbortKind::RemoteEdit,
                    message: e.to_string(),
                }
            })?;

        info!(index, revision = %revision, file = %intent.image, "Intent confirmed");
        Ok(RevisionChain {
            head: Some(revision),
            confirmed: chain.confirmed + 1,
        })
    }
}

/// Build the request for an intent given the chain so far.
///
/// The first intent carries the session's claim marker unless it has its
/// own; every later intent's `baserevid` is replaced by the chain head.
fn chain_request(intent: &EditIntent, chain: RevisionChain, session: &Session) -> EditRequest {
    let mut request = intent.api_options.to_request();
    match chain.head {
        None => {
            if request.initial_claim.is_none() {
                request.initial_claim.clone_from(&session.initial_claim);
            }
        }
        Some(head) => {
            request
                .params
                .insert("baserevid".to_owned(), head.to_string());
        }
    }
    request
}
