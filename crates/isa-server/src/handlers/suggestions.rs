//! Suggestion feedback endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use isa_batch::{RejectionRequest, reject_suggestion};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle POST /api/reject-suggestion.
///
/// The body carries the rejection fields plus the signed-in `username`.
pub(crate) async fn post_rejection(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ServerError> {
    let Json(body) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let username = body
        .get("username")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or(ServerError::LoginRequired)?
        .to_owned();

    let request = RejectionRequest::from_value(body)?;
    reject_suggestion(state.submitter.store().as_ref(), &username, &request).await?;

    Ok(Json(json!({"status": "success"})))
}

/// Query of GET /api/get-rejected-statements.
#[derive(Deserialize)]
pub(crate) struct RejectedQuery {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    file: Option<String>,
}

/// Handle GET /api/get-rejected-statements.
pub(crate) async fn get_rejected_statements(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RejectedQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, ServerError> {
    let Query(query) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let username = query
        .username
        .filter(|name| !name.is_empty())
        .ok_or(ServerError::LoginRequired)?;
    let file = query
        .file
        .filter(|file| !file.is_empty())
        .ok_or_else(|| ServerError::BadRequest("file is required".to_owned()))?;

    let depicts = state
        .submitter
        .store()
        .rejected_depicts(&username, &file)
        .await?;
    if depicts.is_empty() {
        return Err(ServerError::NotFound(file));
    }
    Ok(Json(depicts))
}
