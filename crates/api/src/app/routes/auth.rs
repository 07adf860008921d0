use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use pawdesk_auth::{
    LoginResponse, RouteTable, Session, SessionState, home_path_for, post_login_destination,
    sidebar_for,
};

use crate::app::dto::{LoginReply, LoginRequest, MeReply};
use crate::app::errors::{domain_error_to_response, json_error};
use crate::middleware::{extract_bearer, loading_response};
use crate::sessions::SessionStore;

/// Accept the backend's login response and establish a session.
pub async fn login(
    Extension(store): Extension<Arc<SessionStore>>,
    Extension(table): Extension<Arc<RouteTable>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let LoginRequest { token, user, next } = body;

    let session = match Session::from_login(LoginResponse { token, user }, Utc::now()) {
        Ok(session) => session,
        Err(e) => return domain_error_to_response(e),
    };

    let role = session.role().clone();
    let reply = LoginReply {
        session_id: session.id,
        home: home_path_for(&role),
        sidebar: sidebar_for(&role),
        redirect_to: post_login_destination(&session.identity, next.as_deref(), &table),
        role,
    };

    store.login(session).await;
    (StatusCode::OK, Json(reply)).into_response()
}

/// End the caller's session. Idempotent.
pub async fn logout(
    Extension(store): Extension<Arc<SessionStore>>,
    headers: HeaderMap,
) -> StatusCode {
    if let Some(token) = extract_bearer(&headers) {
        store.logout(token).await;
    }
    StatusCode::NO_CONTENT
}

pub async fn me(Extension(state): Extension<SessionState>) -> Response {
    if state == SessionState::Pending {
        return loading_response();
    }
    let Some(session) = state.session() else {
        return json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "no active session");
    };

    let role = session.role().clone();
    Json(MeReply {
        email: session.identity.email.clone(),
        home: home_path_for(&role),
        sidebar: sidebar_for(&role),
        role,
    })
    .into_response()
}
