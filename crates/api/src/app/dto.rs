//! Request/response bodies.

use serde::{Deserialize, Serialize};

use pawdesk_auth::{ResolvedRole, SessionId, Sidebar, UserIdentity};

/// The backend's login payload, plus the path remembered before sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub token: String,
    pub user: UserIdentity,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginReply {
    pub session_id: SessionId,
    pub role: ResolvedRole,
    pub home: &'static str,
    pub redirect_to: String,
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeReply {
    pub email: String,
    pub role: ResolvedRole,
    pub home: &'static str,
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInPage {
    pub page: &'static str,
    pub next: Option<String>,
}

/// What the view layer renders for a permitted page.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: String,
    pub path: String,
    pub role: ResolvedRole,
    pub home: &'static str,
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}
