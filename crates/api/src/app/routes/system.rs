use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use pawdesk_auth::{SIGN_IN_PATH, SessionState, home_path_for};

use crate::app::dto::{NextQuery, SignInPage};
use crate::middleware::loading_response;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `/` sends signed-in principals to their home and anonymous visitors to sign-in.
pub async fn root(Extension(state): Extension<SessionState>) -> Response {
    match state {
        SessionState::Authenticated(session) => {
            Redirect::to(home_path_for(session.role())).into_response()
        }
        SessionState::Pending => loading_response(),
        SessionState::Anonymous => Redirect::to(SIGN_IN_PATH).into_response(),
    }
}

pub async fn signin(Query(query): Query<NextQuery>) -> impl IntoResponse {
    Json(SignInPage {
        page: "signin",
        next: query.next,
    })
}
