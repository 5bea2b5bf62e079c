//! Admins, keyed `A##`.

use crate::error::AppError;
use crate::response::Reply;
use crate::schema::{ADMIN, ADMIN_ID};
use crate::service::{CrudService, Payload};
use crate::sql::SqlValue;
use crate::state::AppState;
use crate::store::Row;
use serde_json::json;

pub async fn create(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let (Some(admin_nama), Some(admin_email)) = (payload.text("admin_nama"), payload.text("admin_email")) else {
        return Err(payload.missing(&["admin_nama", "admin_email"]));
    };
    let row: Row = vec![("admin_nama", admin_nama.into()), ("admin_email", admin_email.into())];
    let admin_id = CrudService::insert_with_generated_key(state.store(), &ADMIN, &ADMIN_ID, &row).await?;
    Ok(Reply::new("admin created", json!({ "admin_id": admin_id })))
}

pub async fn read(state: &AppState) -> Result<Reply, AppError> {
    let rows = CrudService::list(state.store(), &ADMIN).await?;
    Ok(Reply::rows("admin list", rows))
}

pub async fn update(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(admin_id) = payload.text("admin_id") else {
        return Err(payload.missing(&["admin_id"]));
    };
    let patch: Row = vec![
        ("admin_nama", payload.text("admin_nama").into()),
        ("admin_email", payload.text("admin_email").into()),
    ];
    CrudService::update(state.store(), &ADMIN, &SqlValue::from(admin_id), &patch).await?;
    Ok(Reply::message("admin updated"))
}

pub async fn delete(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(admin_id) = payload.text("admin_id") else {
        return Err(payload.missing(&["admin_id"]));
    };
    CrudService::delete(state.store(), &ADMIN, &SqlValue::from(admin_id)).await?;
    Ok(Reply::message("admin deleted"))
}
