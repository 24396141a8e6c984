//! Core data type definitions

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user as issued by the backend on login or signup.
///
/// The only persistent form of a `User` is the `userData` cookie. Fields the
/// backend leaves out deserialize to empty strings, so `{}` parses into the
/// zero value rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl User {
    /// Whether the backend actually issued a credential for this user
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// The zero value handed out when no session cookie is present
    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty() && self.username.is_empty() && self.token.is_empty()
    }
}

/// A chat message relayed from the backend.
///
/// The gateway never looks inside a message; whatever JSON the backend sends
/// is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(pub serde_json::Value);

impl Message {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Username/password pair forwarded to the backend
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which backend endpoint a set of credentials is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Login,
    Signup,
}

impl AuthAction {
    /// Backend path for this action
    pub fn path(self) -> &'static str {
        match self {
            AuthAction::Login => "login",
            AuthAction::Signup => "signup",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub cookies: CookieConfig,
    pub logging: LoggingConfig,
}

/// Listener and CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Front-end origins allowed to call the gateway with credentials
    pub allowed_origins: Vec<String>,
}

/// Where the Mchat backend lives and how to talk to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Request timeout; `None` leaves backend calls unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

/// Attributes applied to cookies the gateway writes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Add the `Secure` attribute (HTTPS-only deployments)
    pub secure: bool,
    pub path: String,
}
