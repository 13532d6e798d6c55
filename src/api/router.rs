use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, checkout_book, list_outstanding_loans};

/// Creates the API router with the checkout endpoints
///
/// - POST /checkouts - Check out a copy of a book
/// - GET /members/:member_id/loans - List a member's outstanding loans
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/checkouts", post(checkout_book))
        .route("/members/:member_id/loans", get(list_outstanding_loans))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
