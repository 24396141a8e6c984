//! Mchat Gateway Server
//!
//! Binds the listener and serves the router built by [`create_app`].

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use mchat_core::GatewayConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main gateway server
pub struct GatewayServer {
    config: GatewayConfig,
    state: AppState,
}

impl GatewayServer {
    /// Create a new gateway server. Fails if the configuration is invalid.
    pub fn new(config: GatewayConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone())?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.server.address();

        info!("Starting Mchat session gateway");
        info!("Server address: http://{}", address);
        info!("Backend: {}", self.config.backend.base_url);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> WebResult<()> {
        if let Ok(local) = listener.local_addr() {
            info!("Server listening on http://{}", local);
        }

        let app = create_app(self.state);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for GatewayServer
pub struct GatewayServerBuilder {
    config: GatewayConfig,
}

impl GatewayServerBuilder {
    /// Create a new server builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the backend base URL
    pub fn backend_url<S: Into<String>>(mut self, backend_url: S) -> Self {
        self.config.backend.base_url = backend_url.into();
        self
    }

    /// Mark the session cookie `Secure`
    pub fn secure_cookies(mut self, secure: bool) -> Self {
        self.config.cookies.secure = secure;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<GatewayServer> {
        GatewayServer::new(self.config)
    }
}

impl Default for GatewayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
