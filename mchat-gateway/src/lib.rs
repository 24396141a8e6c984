//! Mchat Session Gateway
//!
//! Backend-for-frontend that keeps the Mchat session in browser cookies and
//! forwards login, signup and message requests to the Mchat backend.

pub mod backend;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

// Re-export main types
pub use backend::BackendClient;
pub use server::{GatewayServer, GatewayServerBuilder};
pub use session::{SessionGateway, AUTH_TOKEN_COOKIE, USER_DATA_COOKIE};
pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Json, Router,
};
use mchat_core::GatewayError;
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) if value == "*" => {
                warn!("Ignoring wildcard CORS origin, credentials require explicit origins");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // The front end calls us with cookies, so origins must be explicit.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            WebError::Gateway(GatewayError::MalformedSession { .. }) => {
                (StatusCode::BAD_REQUEST, "malformed_session")
            }
            WebError::Gateway(e) if e.is_upstream() => (StatusCode::BAD_GATEWAY, "backend_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let error_id = match &self {
            WebError::Gateway(e) => e.context().map(|c| c.error_id.clone()),
            WebError::Server(_) => None,
        };

        let body = Json(json!({
            "error": error_code,
            "message": self.to_string(),
            "error_id": error_id,
        }));

        (status, body).into_response()
    }
}
