//! Router assembly.

mod admin;
mod common;

pub use admin::admin_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;

/// Full application: common routes plus the admin dispatch route.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(admin_routes(state, max_body_bytes))
}
