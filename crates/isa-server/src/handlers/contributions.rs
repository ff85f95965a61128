//! Contribution submission endpoint.
//!
//! Runs a contributor's batch through the submission pipeline and answers
//! with the revision of the last confirmed edit as plain text.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use axum::response::{IntoResponse, Response};
use isa_batch::{LocalRecord, Session};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ServerError;
use crate::state::AppState;

/// Header set on a success whose local record could not be written.
pub(crate) const LOCAL_RECORD_HEADER: &str = "x-isa-local-record";

/// Body of POST /api/post-contribution.
#[derive(Deserialize)]
pub(crate) struct ContributionRequest {
    /// Session resolved by the login layer.
    session: Session,
    /// Edit intents in submission order.
    contributions: Vec<Value>,
}

/// Handle POST /api/post-contribution.
pub(crate) async fn post_contribution(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContributionRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let session = request.session;

    if session.username.is_empty()
        || (session.access.is_none() && !state.submitter.is_simulated())
    {
        return Err(ServerError::LoginRequired);
    }

    let report = state
        .submitter
        .submit_json(session, &request.contributions)
        .await?;

    let mut response = report.revision.to_string().into_response();
    if report.local_record == LocalRecord::Missing {
        response.headers_mut().insert(
            HeaderName::from_static(LOCAL_RECORD_HEADER),
            HeaderValue::from_static("missing"),
        );
    }
    Ok(response)
}
