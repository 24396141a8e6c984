//! Session operations over the request's cookie jar
//!
//! Every operation receives the cookie jar explicitly and, when it writes
//! cookies, hands back the updated jar for the response. Nothing here reads
//! request state on its own.

use crate::backend::BackendClient;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use mchat_core::{
    AuthAction, CookieConfig, Credentials, ErrorContext, GatewayConfig, GatewayError,
    GatewayResult, Message, User,
};
use tracing::{debug, info, instrument};

/// Cookie holding the bearer token forwarded to the backend
pub const AUTH_TOKEN_COOKIE: &str = "authToken";
/// Cookie holding the JSON-serialized [`User`]
pub const USER_DATA_COOKIE: &str = "userData";

/// Stateless gateway between browser cookies and the backend
#[derive(Debug, Clone)]
pub struct SessionGateway {
    backend: BackendClient,
    cookies: CookieConfig,
}

impl SessionGateway {
    pub fn new(backend: BackendClient, cookies: CookieConfig) -> Self {
        Self { backend, cookies }
    }

    /// Build the gateway and its backend client from configuration
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self::new(backend, config.cookies.clone()))
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Messages visible to the holder of the `authToken` cookie.
    ///
    /// Without a token this returns an empty list and never touches the
    /// backend. Backend failures are logged and returned as errors, so an
    /// empty `Ok` always means "no messages".
    #[instrument(skip_all)]
    pub async fn fetch_messages(&self, jar: &CookieJar) -> GatewayResult<Vec<Message>> {
        let Some(token) = auth_token(jar) else {
            debug!("No auth token cookie, skipping backend call");
            return Ok(Vec::new());
        };

        self.backend.get_messages(token).await.inspect_err(|e| e.log())
    }

    /// The user stored in the `userData` cookie.
    ///
    /// A missing or empty cookie yields the zero user. A cookie that does not
    /// parse is reported as [`GatewayError::MalformedSession`].
    pub fn get_current_user(&self, jar: &CookieJar) -> GatewayResult<User> {
        let raw = match jar.get(USER_DATA_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value(),
            _ => return Ok(User::default()),
        };

        serde_json::from_str(raw)
            .map_err(|e| GatewayError::MalformedSession {
                message: format!("{} cookie is not a user record: {}", USER_DATA_COOKIE, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("session").with_operation("get_current_user"),
            })
            .inspect_err(|e| e.log())
    }

    /// Send credentials to the backend and insist on a non-empty token
    #[instrument(skip_all, fields(action = %action, username = %credentials.username))]
    pub async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> GatewayResult<User> {
        let user = self.backend.post_credentials(action, credentials).await?;

        if !user.has_token() {
            return Err(GatewayError::MissingToken {
                context: ErrorContext::new("session")
                    .with_operation(action.path())
                    .with_metadata("username", &credentials.username),
            });
        }

        Ok(user)
    }

    /// Log in and store the returned user in the `userData` cookie.
    ///
    /// Returns `false`, with the jar untouched, on any failure.
    pub async fn login(&self, jar: CookieJar, username: &str, password: &str) -> (CookieJar, bool) {
        self.sign_in(AuthAction::Login, jar, Credentials::new(username, password))
            .await
    }

    /// Same contract as [`login`](Self::login) against the signup endpoint
    pub async fn signup(
        &self,
        jar: CookieJar,
        username: &str,
        password: &str,
    ) -> (CookieJar, bool) {
        self.sign_in(AuthAction::Signup, jar, Credentials::new(username, password))
            .await
    }

    /// Run `action` and store the user cookie on success.
    ///
    /// Returns `false`, with the jar untouched, on any failure.
    pub async fn sign_in(
        &self,
        action: AuthAction,
        jar: CookieJar,
        credentials: Credentials,
    ) -> (CookieJar, bool) {
        let cookie = match self
            .authenticate(action, &credentials)
            .await
            .and_then(|user| self.user_cookie(&user))
        {
            Ok(cookie) => cookie,
            Err(e) => {
                e.log();
                return (jar, false);
            }
        };

        info!("{} succeeded for '{}'", action, credentials.username);
        (jar.add(cookie), true)
    }

    /// Drop both session cookies
    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        self.clear_user(jar).remove(self.removal_cookie(AUTH_TOKEN_COOKIE))
    }

    /// Drop only the `userData` cookie
    pub fn clear_user(&self, jar: CookieJar) -> CookieJar {
        jar.remove(self.removal_cookie(USER_DATA_COOKIE))
    }

    fn user_cookie(&self, user: &User) -> GatewayResult<Cookie<'static>> {
        let value = serde_json::to_string(user)?;

        Ok(Cookie::build((USER_DATA_COOKIE, value))
            .http_only(true)
            .secure(self.cookies.secure)
            .path(self.cookies.path.clone())
            .build())
    }

    // Browsers only drop a cookie whose removal carries the same path.
    fn removal_cookie(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build(name).path(self.cookies.path.clone()).build()
    }
}

fn auth_token(jar: &CookieJar) -> Option<&str> {
    jar.get(AUTH_TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|token| !token.is_empty())
}
