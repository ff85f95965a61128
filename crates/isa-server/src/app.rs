//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/post-contribution",
            post(handlers::contributions::post_contribution),
        )
        .route(
            "/api/reject-suggestion",
            post(handlers::suggestions::post_rejection),
        )
        .route(
            "/api/get-rejected-statements",
            get(handlers::suggestions::get_rejected_statements),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::no_store_layer()),
        )
        .with_state(state)
}
