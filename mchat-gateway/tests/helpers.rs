//! Integration test helpers
//!
//! Spawns a scripted mock backend and a real gateway in front of it, both on
//! ephemeral ports, and drives the gateway with `reqwest`.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use mchat_core::GatewayConfig;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, LazyLock, Mutex,
};
use tokio::net::TcpListener;

// Ensure tracing is only initialized once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Canned answer for one backend endpoint
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }
}

/// What the mock backend has seen so far
#[derive(Default)]
pub struct BackendLog {
    pub hits: AtomicUsize,
    pub authorization: Mutex<Vec<String>>,
    pub credentials: Mutex<Vec<Value>>,
}

impl BackendLog {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.authorization.lock().unwrap().last().cloned()
    }

    pub fn last_credentials(&self) -> Option<Value> {
        self.credentials.lock().unwrap().last().cloned()
    }
}

#[derive(Clone)]
struct MockBackend {
    messages: Reply,
    login: Reply,
    signup: Reply,
    log: Arc<BackendLog>,
}

/// Scripted replies for the mock backend
#[derive(Clone)]
pub struct BackendScript {
    pub messages: Reply,
    pub login: Reply,
    pub signup: Reply,
}

impl Default for BackendScript {
    fn default() -> Self {
        Self {
            messages: Reply::ok(serde_json::json!([])),
            login: Reply::status(
                StatusCode::UNAUTHORIZED,
                Value::String("invalid credentials".to_string()),
            ),
            signup: Reply::status(
                StatusCode::CONFLICT,
                Value::String("username taken".to_string()),
            ),
        }
    }
}

async fn mock_messages(State(mock): State<MockBackend>, headers: HeaderMap) -> impl IntoResponse {
    mock.log.hits.fetch_add(1, Ordering::SeqCst);
    if let Some(value) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        mock.log.authorization.lock().unwrap().push(value.to_string());
    }
    (mock.messages.status, Json(mock.messages.body))
}

async fn mock_login(State(mock): State<MockBackend>, Json(body): Json<Value>) -> impl IntoResponse {
    mock.log.hits.fetch_add(1, Ordering::SeqCst);
    mock.log.credentials.lock().unwrap().push(body);
    (mock.login.status, Json(mock.login.body))
}

async fn mock_signup(State(mock): State<MockBackend>, Json(body): Json<Value>) -> impl IntoResponse {
    mock.log.hits.fetch_add(1, Ordering::SeqCst);
    mock.log.credentials.lock().unwrap().push(body);
    (mock.signup.status, Json(mock.signup.body))
}

/// Start the mock backend and return its base URL and request log
pub async fn spawn_backend(script: BackendScript) -> (String, Arc<BackendLog>) {
    let log = Arc::new(BackendLog::default());
    let mock = MockBackend {
        messages: script.messages,
        login: script.login,
        signup: script.signup,
        log: log.clone(),
    };

    let app = Router::new()
        .route("/messages", get(mock_messages))
        .route("/login", post(mock_login))
        .route("/signup", post(mock_signup))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), log)
}

/// Base URL on which nothing listens
pub fn unreachable_backend_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Test application instance
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    fn get(&self, path: &str, cookies: &[(&str, &str)]) -> reqwest::RequestBuilder {
        with_cookies(
            self.api_client.get(format!("{}{}", &self.address, path)),
            cookies,
        )
    }

    fn post(&self, path: &str, cookies: &[(&str, &str)]) -> reqwest::RequestBuilder {
        with_cookies(
            self.api_client.post(format!("{}{}", &self.address, path)),
            cookies,
        )
    }

    pub async fn get_health(&self) -> reqwest::Response {
        self.get("/api/health", &[])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_config(&self) -> reqwest::Response {
        self.get("/api/config", &[])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_messages(&self, cookies: &[(&str, &str)]) -> reqwest::Response {
        self.get("/api/messages", cookies)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_user(&self, cookies: &[(&str, &str)]) -> reqwest::Response {
        self.get("/api/session/user", cookies)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_user_with_raw_cookie(&self, cookie_header: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/session/user", &self.address))
            .header(reqwest::header::COOKIE, cookie_header)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/session/login", &[])
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signup(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/session/signup", &[])
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_logout(&self, cookies: &[(&str, &str)]) -> reqwest::Response {
        self.post("/api/session/logout", cookies)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn with_cookies(builder: reqwest::RequestBuilder, cookies: &[(&str, &str)]) -> reqwest::RequestBuilder {
    if cookies.is_empty() {
        return builder;
    }
    let header = cookies
        .iter()
        .map(|(name, value)| {
            axum_extra::extract::cookie::Cookie::new(name.to_string(), value.to_string())
                .encoded()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("; ");
    builder.header(reqwest::header::COOKIE, header)
}

/// All `Set-Cookie` headers of a response
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// The `Set-Cookie` header for `name`, if any
pub fn set_cookie_for(response: &reqwest::Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&prefix))
}

/// `name=value` part of a `Set-Cookie` header, ready to replay
pub fn cookie_pair(set_cookie: &str) -> &str {
    set_cookie.split(';').next().unwrap_or_default()
}

/// Start a gateway that forwards to `backend_url`
pub async fn spawn_gateway(backend_url: &str) -> TestApp {
    let mut config = GatewayConfig::default();
    config.backend.base_url = backend_url.to_string();
    config.backend.timeout_seconds = Some(5);
    spawn_gateway_with(config).await
}

/// Start a gateway with a custom configuration
pub async fn spawn_gateway_with(mut config: GatewayConfig) -> TestApp {
    LazyLock::force(&TRACING);

    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;

    let server = mchat_gateway::GatewayServer::new(config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: client,
    }
}
