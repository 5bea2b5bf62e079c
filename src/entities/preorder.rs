//! Pre-orders, keyed `O###`. Reads carry product, student and admin names, newest order first.

use crate::error::AppError;
use crate::response::Reply;
use crate::schema::{ORDER_ID, PRE_ORDER};
use crate::service::{CrudService, Payload};
use crate::sql::SqlValue;
use crate::state::AppState;
use crate::store::Row;
use serde_json::json;

pub async fn create(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let tanggal_order = payload.date("tanggal_order")?.unwrap_or_else(super::today);
    let status = payload.status("status_pembayaran")?.unwrap_or_default();
    let (Some(produk_id), Some(nim)) = (payload.text("produk_id"), payload.text("nim")) else {
        return Err(payload.missing(&["produk_id", "nim"]));
    };
    let row: Row = vec![
        ("produk_id", produk_id.into()),
        ("nim", nim.into()),
        ("admin_id", payload.text("admin_id").into()),
        ("tanggal_order", tanggal_order.into()),
        ("status_pembayaran", status.into()),
    ];
    let order_id = CrudService::insert_with_generated_key(state.store(), &PRE_ORDER, &ORDER_ID, &row).await?;
    Ok(Reply::new("pre-order created", json!({ "order_id": order_id })))
}

pub async fn read(state: &AppState) -> Result<Reply, AppError> {
    let rows = CrudService::list(state.store(), &PRE_ORDER).await?;
    Ok(Reply::rows("pre-order list", rows))
}

pub async fn update(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(order_id) = payload.text("order_id") else {
        return Err(payload.missing(&["order_id"]));
    };
    let patch: Row = vec![
        ("produk_id", payload.text("produk_id").into()),
        ("nim", payload.text("nim").into()),
        ("admin_id", payload.text("admin_id").into()),
        ("tanggal_order", payload.date("tanggal_order")?.into()),
        ("status_pembayaran", payload.status("status_pembayaran")?.into()),
    ];
    CrudService::update(state.store(), &PRE_ORDER, &SqlValue::from(order_id), &patch).await?;
    Ok(Reply::message("pre-order updated"))
}

pub async fn delete(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(order_id) = payload.text("order_id") else {
        return Err(payload.missing(&["order_id"]));
    };
    CrudService::delete(state.store(), &PRE_ORDER, &SqlValue::from(order_id)).await?;
    Ok(Reply::message("pre-order deleted"))
}
