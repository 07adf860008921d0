use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use pawdesk_auth::{Access, RouteTable};

use crate::app::dto::PageView;
use crate::app::errors::json_error;
use crate::context::NavigationContext;

/// Describe the page a permitted navigation lands on.
///
/// Only paths inside a protected subtree are pages; anything else is 404.
pub async fn render(
    Extension(table): Extension<Arc<RouteTable>>,
    Extension(nav): Extension<NavigationContext>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let path = uri.path().trim_end_matches('/');
    match table.lookup(path) {
        Some(rule) if rule.access != Access::Public => Json(PageView {
            page: path.trim_start_matches('/').to_string(),
            path: path.to_string(),
            role: nav.role().clone(),
            home: nav.home(),
            sidebar: nav.sidebar(),
        })
        .into_response(),
        _ => json_error(StatusCode::NOT_FOUND, "not_found", format!("no page at '{}'", uri.path())),
    }
}
