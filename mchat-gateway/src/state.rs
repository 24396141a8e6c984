//! Shared application state

use crate::session::SessionGateway;
use crate::WebResult;
use mchat_core::GatewayConfig;
use std::sync::Arc;
use tracing::info;

/// State handed to every handler. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<GatewayConfig>,
    /// Session gateway (cookie handling + backend client)
    pub session: SessionGateway,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: GatewayConfig) -> WebResult<Self> {
        config.validate()?;

        let session = SessionGateway::from_config(&config)?;
        info!("Forwarding to backend at {}", session.backend().base_url());

        Ok(Self {
            config: Arc::new(config),
            session,
        })
    }
}
