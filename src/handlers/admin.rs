//! `GET|POST /admin?entity=..&action=..`: the single entry point for every entity operation.

use crate::dispatch::dispatch;
use crate::error::AppError;
use crate::response::Reply;
use crate::service::Payload;
use crate::state::AppState;
use axum::extract::{Query, State};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Selector {
    pub entity: Option<String>,
    pub action: Option<String>,
}

/// Selectors come from the query string, falling back to body fields of the same name.
pub async fn admin(
    State(state): State<AppState>,
    selector: Option<Query<Selector>>,
    payload: Payload,
) -> Result<Reply, AppError> {
    let selector = selector.map(|Query(s)| s).unwrap_or_default();
    let entity = selector.entity.or_else(|| payload.text("entity"));
    let action = selector.action.or_else(|| payload.text("action"));
    dispatch(&state, entity.as_deref(), action.as_deref(), &payload).await
}
