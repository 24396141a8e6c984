//! HTTP client for the Mchat backend
//!
//! Thin wrapper over `reqwest` that knows the three backend endpoints the
//! gateway forwards to. Every non-2xx answer is turned into
//! [`GatewayError::Backend`] so callers never have to look at status codes.

use mchat_core::{
    network_error, AuthAction, BackendConfig, Credentials, ErrorContext, GatewayError,
    GatewayResult, Message, User,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// Client for the backend's JSON API
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: &BackendConfig) -> GatewayResult<Self> {
        let client = create_http_client(config)?;

        debug!("Created backend client for {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /messages` with the bearer token forwarded verbatim
    pub async fn get_messages(&self, token: &str) -> GatewayResult<Vec<Message>> {
        let url = self.endpoint("messages");
        debug!("Fetching messages from {}", url);

        let auth_value = HeaderValue::from_str(token).map_err(|e| GatewayError::MalformedSession {
            message: "authToken is not a valid header value".to_string(),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client").with_operation("get_messages"),
        })?;

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth_value)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                let message = format!("Failed to reach backend at {}: {}", url, e);
                network_error!(message, "backend_client", "get_messages", e)
            })?;

        let response = ensure_success(response, "get_messages").await?;

        let messages: Vec<Message> = response.json().await.map_err(|e| GatewayError::Decode {
            message: format!("Failed to parse messages: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client").with_operation("get_messages"),
        })?;

        debug!("Backend returned {} messages", messages.len());
        Ok(messages)
    }

    /// `POST /login` or `POST /signup` with a JSON credentials body.
    ///
    /// Returns whatever user record the backend sent; checking the token is
    /// left to the caller.
    pub async fn post_credentials(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> GatewayResult<User> {
        let url = self.endpoint(action.path());
        debug!("Forwarding {} for '{}' to {}", action, credentials.username, url);

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                let message = format!("Failed to reach backend at {}: {}", url, e);
                network_error!(message, "backend_client", action.path(), e)
            })?;

        let response = ensure_success(response, action.path()).await?;

        response.json::<User>().await.map_err(|e| GatewayError::Decode {
            message: format!("Failed to parse {} response: {}", action, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client").with_operation(action.path()),
        })
    }
}

/// Build the shared `reqwest` client
fn create_http_client(config: &BackendConfig) -> GatewayResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|e| GatewayError::Config {
            message: format!("Invalid user agent: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?,
    );

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(seconds) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    builder.build().map_err(|e| GatewayError::Config {
        message: format!("Failed to create HTTP client: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("http_client").with_operation("create_client"),
    })
}

/// Pass 2xx responses through, turn everything else into a `Backend` error
async fn ensure_success(
    response: reqwest::Response,
    operation: &str,
) -> GatewayResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();

    Err(GatewayError::Backend {
        status: status.as_u16(),
        body: if body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            body.trim().to_string()
        },
        context: ErrorContext::new("backend_client")
            .with_operation(operation)
            .with_metadata("url", &url),
    })
}
