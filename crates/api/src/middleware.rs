use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use pawdesk_auth::{GuardOutcome, RouteTable, evaluate};

use crate::context::NavigationContext;
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct GuardState {
    pub table: Arc<RouteTable>,
}

/// Resolve the caller's [`pawdesk_auth::SessionState`] and attach it to the request.
///
/// Never rejects: a missing or unknown token is simply `Anonymous`.
pub async fn session_middleware(
    State(store): State<Arc<SessionStore>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let state = store.state_for(extract_bearer(req.headers()));
    req.extensions_mut().insert(state);
    next.run(req).await
}

/// Apply the route guard to every navigation.
pub async fn guard_middleware(
    State(guard): State<GuardState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let state = req
        .extensions()
        .get::<pawdesk_auth::SessionState>()
        .cloned()
        .unwrap_or(pawdesk_auth::SessionState::Anonymous);

    let requested = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let outcome = evaluate(&state, &guard.table, &requested);
    match outcome {
        GuardOutcome::Permitted { role } => {
            req.extensions_mut().insert(NavigationContext::new(role));
            next.run(req).await
        }
        GuardOutcome::Loading => loading_response(),
        ref redirect => {
            let location = redirect.location().unwrap_or_default();
            see_other(&location)
        }
    }
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// 202 with `Retry-After`, sent while stored sessions are still being restored.
pub(crate) fn loading_response() -> Response {
    (
        StatusCode::ACCEPTED,
        [(header::RETRY_AFTER, HeaderValue::from_static("1"))],
        axum::Json(serde_json::json!({ "status": "loading" })),
    )
        .into_response()
}

fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::warn!(location, "redirect target is not a valid header value");
            crate::app::errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "redirect_failed",
                "could not build redirect",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer(&headers("Bearer   abc  ")), Some("abc"));
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_ignored() {
        assert_eq!(extract_bearer(&headers("Basic abc")), None);
        assert_eq!(extract_bearer(&headers("Bearer ")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
