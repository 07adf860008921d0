use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawdesk_core::{DomainError, DomainResult, Email};

use crate::{ResolvedRole, UserIdentity, extract_role};

/// Identifier of an established session; logged in place of the bearer token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Body returned by the backend's login call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserIdentity,
}

/// An authenticated principal plus the token it was issued.
///
/// Built once per sign-in and never mutated; a new sign-in replaces it.
/// The role is resolved at sign-in and travels with the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub token: String,
    pub identity: UserIdentity,
    pub established_at: DateTime<Utc>,
    role: ResolvedRole,
}

impl Session {
    pub fn from_login(login: LoginResponse, now: DateTime<Utc>) -> DomainResult<Self> {
        let token = login.token.trim();
        if token.is_empty() {
            return Err(DomainError::validation("login response carries an empty token"));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("token must not contain whitespace"));
        }

        let mut identity = login.user;
        if !identity.email.trim().is_empty() {
            identity.email = Email::parse(&identity.email)?.into();
        }

        let role = extract_role(&identity);
        Ok(Self {
            id: SessionId::new(),
            token: token.to_string(),
            identity,
            established_at: now,
            role,
        })
    }

    pub fn role(&self) -> &ResolvedRole {
        &self.role
    }
}

/// Where session lookup stands for the current navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Stored sessions are still being restored.
    Pending,
    /// No valid principal.
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn login(value: serde_json::Value) -> LoginResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn session_from_backend_login_payload() {
        let resp = login(json!({
            "token": "abc.def.ghi",
            "user": { "email": " Owner@Paws.Example ", "role": "Owner" }
        }));

        let now = Utc::now();
        let session = Session::from_login(resp, now).unwrap();
        assert_eq!(session.token, "abc.def.ghi");
        assert_eq!(session.identity.email, "owner@paws.example");
        assert_eq!(session.established_at, now);
        assert_eq!(session.role().as_str(), "owner");
    }

    #[test]
    fn empty_token_is_rejected() {
        let resp = login(json!({ "token": "  ", "user": { "email": "a@b.c" } }));
        let err = Session::from_login(resp, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn malformed_email_is_rejected_but_missing_email_is_not() {
        let bad = login(json!({ "token": "t", "user": { "email": "nope" } }));
        assert!(Session::from_login(bad, Utc::now()).is_err());

        let missing = login(json!({ "token": "t", "user": { "roles": ["owner"] } }));
        assert!(Session::from_login(missing, Utc::now()).is_ok());
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn unusable_role_data_is_reported_once_per_sign_in() {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            let resp = login(json!({ "token": "t", "user": { "roles": [42] } }));
            let session = Session::from_login(resp, Utc::now()).unwrap();
            for _ in 0..5 {
                assert!(session.role().is_undetermined());
            }
        });

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stored_session_keeps_its_role() {
        let resp = login(json!({ "token": "t", "user": { "roles": [{"slug": "Vet"}] } }));
        let session = Session::from_login(resp, Utc::now()).unwrap();

        let stored = serde_json::to_value(&session).unwrap();
        assert_eq!(stored["role"], json!("vet"));
        let restored: Session = serde_json::from_value(stored).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn session_ids_are_unique_and_parse_back() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<SessionId>().unwrap(), a);
    }
}
