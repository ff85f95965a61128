//! End-to-end batch submission.

use std::sync::Arc;

use isa_commons::{CredentialProvider, RemoteEditClient, SimulatedCredentials, SimulatedEditClient};
use isa_store::ContributionStore;
use serde_json::Value;
use tracing::{Instrument, Span, info, info_span};
use uuid::Uuid;

use crate::error::SubmitError;
use crate::intent::{BatchSubmission, parse_intents};
use crate::orchestrator::BatchOrchestrator;
use crate::reconciler::{SubmitReport, reconcile, stage};
use crate::session::Session;

/// Runs validated batches through the orchestrator and the store.
///
/// Cheap to clone; batches from different sessions may be submitted
/// concurrently and share nothing but the store.
#[derive(Clone)]
pub struct BatchSubmitter {
    credentials: Arc<dyn CredentialProvider>,
    client: Arc<dyn RemoteEditClient>,
    store: Arc<dyn ContributionStore>,
    simulated: bool,
}

impl BatchSubmitter {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        client: Arc<dyn RemoteEditClient>,
        store: Arc<dyn ContributionStore>,
    ) -> Self {
        Self {
            credentials,
            client,
            store,
            simulated: false,
        }
    }

    /// Submitter that never touches the platform.
    pub fn simulated(store: Arc<dyn ContributionStore>) -> Self {
        Self {
            credentials: Arc::new(SimulatedCredentials),
            client: Arc::new(SimulatedEditClient),
            store,
            simulated: true,
        }
    }

    /// Whether remote calls are simulated.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Store shared by all batches.
    pub fn store(&self) -> &Arc<dyn ContributionStore> {
        &self.store
    }

    /// Parse, validate and submit raw intents.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] before any remote call when the
    /// batch is invalid, otherwise as [`BatchSubmitter::submit`].
    pub async fn submit_json(
        &self,
        session: Session,
        intents: &[Value],
    ) -> Result<SubmitReport, SubmitError> {
        let batch = BatchSubmission::new(parse_intents(intents)?)?;
        self.submit(session, batch).await
    }

    /// Submit a validated batch.
    ///
    /// The remote walk runs on a blocking worker; once a remote call has been
    /// dispatched it completes or times out even if this future is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::NothingConfirmed`] when the first intent failed.
    pub async fn submit(
        &self,
        session: Session,
        batch: BatchSubmission,
    ) -> Result<SubmitReport, SubmitError> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, user = %session.username);

        async move {
            info!(
                intents = batch.len(),
                campaign = batch.campaign_id(),
                simulated = self.simulated,
                "Submitting batch"
            );

            let credentials = Arc::clone(&self.credentials);
            let client = Arc::clone(&self.client);
            let worker_span = Span::current();
            let (session, batch, outcome) = tokio::task::spawn_blocking(move || {
                let _entered = worker_span.enter();
                let outcome = BatchOrchestrator::new(credentials.as_ref(), client.as_ref())
                    .run(&session, &batch);
                (session, batch, outcome)
            })
            .await
            .map_err(|e| SubmitError::Worker(e.to_string()))?;

            let writes = stage(&session, &batch, &outcome, chrono::Utc::now().date_naive());
            reconcile(self.store.as_ref(), &writes, &outcome, batch.len()).await
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use isa_commons::{AccessCredential, RevisionId, ScriptedEditClient, StaticCredentials};
    use isa_store::SqliteStore;
    use serde_json::json;

    use super::*;
    use crate::error::ValidationError;
    use crate::reconciler::LocalRecord;

    fn session() -> Session {
        Session {
            username: "Ama".to_owned(),
            access: Some(AccessCredential::new("t", "s")),
            initial_claim: None,
        }
    }

    fn intents(actions: &[&str]) -> Vec<Value> {
        actions
            .iter()
            .map(|action| {
                json!({
                    "campaign_id": 1,
                    "image": "File:Adinkra.png",
                    "edit_action": "add",
                    "edit_type": "depicts",
                    "country": "Ghana",
                    "depict_item": "Q1",
                    "api_options": {"action": action}
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn test_simulated_submit() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let submitter = BatchSubmitter::simulated(Arc::clone(&store) as Arc<dyn ContributionStore>);

        let report = submitter
            .submit_json(
                Session {
                    access: None,
                    ..session()
                },
                &intents(&["wbsetclaim", "wbsetclaim"]),
            )
            .await
            .unwrap();

        assert!(submitter.is_simulated());
        assert_eq!(report.revision, RevisionId::SIMULATED);
        assert_eq!(report.confirmed, 2);
        assert_eq!(report.local_record, LocalRecord::Written);
        assert_eq!(store.contributions("Ama").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_makes_no_calls() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let client = Arc::new(ScriptedEditClient::new().then_revision(RevisionId(7001)));
        let submitter = BatchSubmitter::new(
            Arc::new(StaticCredentials::new()),
            Arc::clone(&client) as Arc<dyn RemoteEditClient>,
            Arc::clone(&store) as Arc<dyn ContributionStore>,
        );
        let mut values = intents(&["wbsetclaim", "wbsetclaim", "purge"]);
        for value in &mut values {
            value["google_vision"] = json!(1);
        }

        let err = submitter.submit_json(session(), &values).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Validation(ValidationError::DisallowedAction { index: 2, .. })
        ));
        assert_eq!(client.call_count(), 0);
        assert!(store.contributions("Ama").await.unwrap().is_empty());
        let feedback = store.suggestions("File:Adinkra.png").await.unwrap();
        assert!(feedback.is_empty());
    }

    #[tokio::test]
    async fn test_first_failure_is_nothing_confirmed() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let client = Arc::new(ScriptedEditClient::new().then_failure("permissiondenied"));
        let submitter = BatchSubmitter::new(
            Arc::new(StaticCredentials::new()),
            client,
            Arc::clone(&store) as Arc<dyn ContributionStore>,
        );

        let err = submitter
            .submit_json(session(), &intents(&["wbsetclaim"]))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::NothingConfirmed { .. }));
        assert!(store.contributions("Ama").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revisions_chain_through_the_batch() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let client = Arc::new(
            ScriptedEditClient::new()
                .then_revision(RevisionId(7001))
                .then_revision(RevisionId(7002)),
        );
        let submitter = BatchSubmitter::new(
            Arc::new(StaticCredentials::new()),
            Arc::clone(&client) as Arc<dyn RemoteEditClient>,
            Arc::clone(&store) as Arc<dyn ContributionStore>,
        );

        let report = submitter
            .submit_json(session(), &intents(&["wbsetclaim", "wbsetclaim"]))
            .await
            .unwrap();

        assert_eq!(report.revision, RevisionId(7002));
        let requests = client.requests();
        assert_eq!(requests[1].base_revision(), Some(RevisionId(7001)));
        assert_eq!(store.contributions("Ama").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mid_batch_failure_records_confirmed_prefix() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let client = Arc::new(
            ScriptedEditClient::new()
                .then_revision(RevisionId(31))
                .then_failure("editconflict"),
        );
        let submitter = BatchSubmitter::new(
            Arc::new(StaticCredentials::new()),
            Arc::clone(&client) as Arc<dyn RemoteEditClient>,
            Arc::clone(&store) as Arc<dyn ContributionStore>,
        );

        let report = submitter
            .submit_json(
                session(),
                &intents(&["wbsetclaim", "wbsetclaim", "wbsetclaim"]),
            )
            .await
            .unwrap();

        assert_eq!(report.revision, RevisionId(31));
        assert_eq!(report.confirmed, 1);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.total, 3);
        assert_eq!(client.call_count(), 2);
        assert_eq!(store.contributions("Ama").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_suggestion_feedback_survives_failed_batch() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let submitter = BatchSubmitter::new(
            Arc::new(StaticCredentials::new()),
            Arc::new(ScriptedEditClient::new().then_failure("badtoken")),
            Arc::clone(&store) as Arc<dyn ContributionStore>,
        );
        let mut values = intents(&["wbsetclaim"]);
        values[0]["metadata_to_concept"] = json!(1);
        values[0]["metadata_to_concept_confidence"] = json!(0.9);

        let err = submitter.submit_json(session(), &values).await.unwrap_err();

        assert!(matches!(err, SubmitError::NothingConfirmed { .. }));
        assert!(store.contributions("Ama").await.unwrap().is_empty());
        let feedback = store.suggestions("File:Adinkra.png").await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].metadata_to_concept, 1);
    }

    #[tokio::test]
    async fn test_concurrent_batches_share_the_store() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let submitter = BatchSubmitter::simulated(Arc::clone(&store) as Arc<dyn ContributionStore>);
        let other = Session {
            username: "Esi".to_owned(),
            ..session()
        };

        let batch = intents(&["wbsetclaim", "wbremoveclaims"]);
        let (first, second) = tokio::join!(
            submitter.submit_json(session(), &batch),
            submitter.submit_json(other, &batch),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(store.contributions("Ama").await.unwrap().len(), 2);
        assert_eq!(store.contributions("Esi").await.unwrap().len(), 2);
    }
}
