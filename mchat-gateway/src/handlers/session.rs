//! Session and message handlers
//!
//! Each handler extracts the cookie jar, passes it to [`SessionGateway`] and
//! returns whatever jar comes back so cookie changes reach the browser.
//!
//! [`SessionGateway`]: crate::session::SessionGateway

use super::types::SessionResponse;
use crate::{AppState, WebError};
use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::CookieJar;
use mchat_core::{AuthAction, Credentials, Message};

/// `GET /api/messages`
pub async fn fetch_messages(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<Message>>, WebError> {
    let messages = state.session.fetch_messages(&jar).await?;
    Ok(Json(messages))
}

/// `GET /api/session/user`
///
/// A cookie that does not parse is cleared so the browser stops sending it.
pub async fn current_user(State(state): State<AppState>, jar: CookieJar) -> Response {
    match state.session.get_current_user(&jar) {
        Ok(user) => Json(user).into_response(),
        Err(e) => (state.session.clear_user(jar), WebError::from(e)).into_response(),
    }
}

/// `POST /api/session/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> (CookieJar, Json<SessionResponse>) {
    let (jar, success) = state
        .session
        .sign_in(AuthAction::Login, jar, credentials)
        .await;
    (jar, Json(SessionResponse { success }))
}

/// `POST /api/session/signup`
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> (CookieJar, Json<SessionResponse>) {
    let (jar, success) = state
        .session
        .sign_in(AuthAction::Signup, jar, credentials)
        .await;
    (jar, Json(SessionResponse { success }))
}

/// `POST /api/session/logout`
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    (
        state.session.logout(jar),
        Json(SessionResponse { success: true }),
    )
}
