//! Students, keyed by the caller-supplied `nim`.

use crate::error::AppError;
use crate::response::Reply;
use crate::schema::STUDENT;
use crate::service::{CrudService, Payload};
use crate::sql::SqlValue;
use crate::state::AppState;
use crate::store::Row;
use serde_json::json;

pub async fn create(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let (Some(nim), Some(nama)) = (payload.text("nim"), payload.text("nama")) else {
        return Err(payload.missing(&["nim", "nama"]));
    };
    let row: Row = vec![
        ("nim", nim.as_str().into()),
        ("nama", nama.into()),
        ("no_telp", payload.text("no_telp").into()),
        ("prodi", payload.text("prodi").into()),
    ];
    CrudService::insert(state.store(), &STUDENT, &row).await?;
    Ok(Reply::new("student created", json!({ "nim": nim })))
}

pub async fn read(state: &AppState) -> Result<Reply, AppError> {
    let rows = CrudService::list(state.store(), &STUDENT).await?;
    Ok(Reply::rows("student list", rows))
}

pub async fn update(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(nim) = payload.text("nim") else {
        return Err(payload.missing(&["nim"]));
    };
    let patch: Row = vec![
        ("nama", payload.text("nama").into()),
        ("no_telp", payload.text("no_telp").into()),
        ("prodi", payload.text("prodi").into()),
    ];
    CrudService::update(state.store(), &STUDENT, &SqlValue::from(nim), &patch).await?;
    Ok(Reply::message("student updated"))
}

pub async fn delete(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(nim) = payload.text("nim") else {
        return Err(payload.missing(&["nim"]));
    };
    CrudService::delete(state.store(), &STUDENT, &SqlValue::from(nim)).await?;
    Ok(Reply::message("student deleted"))
}
