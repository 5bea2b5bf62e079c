//! Products, keyed `P###`; reads carry the vendor name.

use crate::error::AppError;
use crate::response::Reply;
use crate::schema::{PRODUCT, PRODUCT_ID};
use crate::service::{CrudService, Payload};
use crate::sql::SqlValue;
use crate::state::AppState;
use crate::store::Row;
use serde_json::json;

pub async fn create(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let vendor_id = payload.int("vendor_id")?;
    let harga = payload.int("harga")?.unwrap_or(0);
    let stok = payload.int("stok")?.unwrap_or(0);
    let (Some(vendor_id), Some(nama_baju)) = (vendor_id, payload.text("nama_baju")) else {
        return Err(payload.missing(&["vendor_id", "nama_baju"]));
    };
    let row: Row = vec![
        ("vendor_id", vendor_id.into()),
        ("nama_baju", nama_baju.into()),
        ("harga", harga.into()),
        ("stok", stok.into()),
        ("ukuran", payload.text("ukuran").into()),
    ];
    let produk_id = CrudService::insert_with_generated_key(state.store(), &PRODUCT, &PRODUCT_ID, &row).await?;
    Ok(Reply::new("product created", json!({ "produk_id": produk_id })))
}

pub async fn read(state: &AppState) -> Result<Reply, AppError> {
    let rows = CrudService::list(state.store(), &PRODUCT).await?;
    Ok(Reply::rows("product list", rows))
}

pub async fn update(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(produk_id) = payload.text("produk_id") else {
        return Err(payload.missing(&["produk_id"]));
    };
    let patch: Row = vec![
        ("vendor_id", payload.int("vendor_id")?.into()),
        ("nama_baju", payload.text("nama_baju").into()),
        ("harga", payload.int("harga")?.into()),
        ("stok", payload.int("stok")?.into()),
        ("ukuran", payload.text("ukuran").into()),
    ];
    CrudService::update(state.store(), &PRODUCT, &SqlValue::from(produk_id), &patch).await?;
    Ok(Reply::message("product updated"))
}

pub async fn delete(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(produk_id) = payload.text("produk_id") else {
        return Err(payload.missing(&["produk_id"]));
    };
    CrudService::delete(state.store(), &PRODUCT, &SqlValue::from(produk_id)).await?;
    Ok(Reply::message("product deleted"))
}
