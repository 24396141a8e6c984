//! Route definitions for the gateway

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/config", get(handlers::get_config))
        // Backend relays
        .route("/messages", get(handlers::fetch_messages))
        // Session cookies
        .route("/session/user", get(handlers::current_user))
        .route("/session/login", post(handlers::login))
        .route("/session/signup", post(handlers::signup))
        .route("/session/logout", post(handlers::logout))
}
