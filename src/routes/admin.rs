//! Admin dispatch route with the upload body limit applied.

use crate::handlers::admin;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;

pub fn admin_routes(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/admin", get(admin).post(admin))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}
