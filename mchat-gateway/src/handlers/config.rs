//! Configuration view

use crate::AppState;
use axum::{extract::State, response::Json};

/// Public subset of the running configuration
pub async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "host": state.config.server.host,
        "port": state.config.server.port,
        "backend_url": state.session.backend().base_url(),
    }))
}
