//! HTTP application wiring (Axum router + middleware).
//!
//! - `routes/`: handlers (auth endpoints, sign-in, guarded pages)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use pawdesk_auth::RouteTable;
use pawdesk_core::DomainResult;

use crate::middleware;
use crate::sessions::SessionStore;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: Arc<SessionStore>) -> DomainResult<Router> {
    Ok(build_app_with_routes(store, RouteTable::dashboard()?))
}

pub fn build_app_with_routes(store: Arc<SessionStore>, table: RouteTable) -> Router {
    let table = Arc::new(table);
    let guard_state = middleware::GuardState {
        table: table.clone(),
    };

    // Session lookup runs first, then the guard sees its result.
    routes::router()
        .layer(Extension(store.clone()))
        .layer(Extension(table))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    store,
                    middleware::session_middleware,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    guard_state,
                    middleware::guard_middleware,
                )),
        )
}
