use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod pages;
pub mod system;

/// Router for every dashboard path; the guard decides who gets through.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/signin", get(system::signin))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .fallback(pages::render)
}
