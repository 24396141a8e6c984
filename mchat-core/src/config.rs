//! Configuration management

use crate::error::{ErrorContext, GatewayError, GatewayResult};
use crate::types::{BackendConfig, CookieConfig, GatewayConfig, ServerConfig};

use std::path::Path;

/// Environment variables understood by [`GatewayConfig::apply_env`]
pub const ENV_HOST: &str = "MCHAT_HOST";
pub const ENV_PORT: &str = "MCHAT_PORT";
pub const ENV_BACKEND_URL: &str = "MCHAT_BACKEND_URL";
pub const ENV_SECURE_COOKIES: &str = "MCHAT_SECURE_COOKIES";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: None,
            user_agent: format!("mchat-gateway/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            path: "/".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GatewayError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("read_file"),
        })?;

        let config: GatewayConfig = toml::from_str(&content).map_err(|e| GatewayError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("parse_toml"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GatewayResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| GatewayError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| GatewayError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("write_file"),
        })?;

        Ok(())
    }

    /// Override fields from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", ENV_PORT, port),
            }
        }

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend.base_url = url;
        }

        if let Some(secure) = lookup(ENV_SECURE_COOKIES) {
            match secure.parse() {
                Ok(secure) => self.cookies.secure = secure,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", ENV_SECURE_COOKIES, secure),
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> GatewayResult<()> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(crate::config_error!("backend.base_url must not be empty"));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(crate::config_error!(format!(
                "backend.base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        if self.backend.timeout_seconds == Some(0) {
            return Err(crate::config_error!(
                "backend.timeout_seconds must be greater than 0 (omit it for no timeout)"
            ));
        }

        // Browsers refuse `*` on credentialed requests.
        if self.server.allowed_origins.iter().any(|o| o.trim() == "*") {
            return Err(crate::config_error!(
                "server.allowed_origins must list explicit origins, '*' is not allowed"
            ));
        }

        if !self.cookies.path.starts_with('/') {
            return Err(crate::config_error!(format!(
                "cookies.path must start with '/', got '{}'",
                self.cookies.path
            )));
        }

        Ok(())
    }
}
