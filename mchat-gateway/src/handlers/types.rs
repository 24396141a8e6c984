//! Request/response bodies

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Outcome of login, signup and logout
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
}
