//! Invoices (`tagihan`), keyed by a serial id, with an optional payment-proof attachment.
//!
//! The attachment is written only after the request has been validated, and removed again
//! if no row ends up referring to it.

use crate::error::AppError;
use crate::response::Reply;
use crate::schema::INVOICE;
use crate::service::{CrudService, Payload};
use crate::sql::SqlValue;
use crate::state::AppState;
use crate::store::Row;
use crate::uploads::StoredFile;
use serde_json::json;

const ATTACHMENT_FIELD: &str = "bukti_pembayaran";

/// Upload wins over a text reference; neither yields `None`.
async fn attachment(state: &AppState, payload: &Payload) -> Result<(Option<String>, Option<StoredFile>), AppError> {
    match payload.file(ATTACHMENT_FIELD) {
        Some(file) => {
            let stored = state.files.save(file).await?;
            Ok((Some(stored.reference.clone()), Some(stored)))
        }
        None => Ok((payload.text(ATTACHMENT_FIELD), None)),
    }
}

/// Removes the stored attachment unless the store call succeeded and `referenced` confirms a row
/// now points at it.
async fn keep_attachment_if<T>(
    state: &AppState,
    stored: Option<StoredFile>,
    result: Result<T, AppError>,
    referenced: impl FnOnce(&T) -> bool,
) -> Result<T, AppError> {
    let keep = result.as_ref().map_or(false, referenced);
    if !keep {
        if let Some(stored) = stored {
            state.files.discard(&stored).await;
        }
    }
    result
}

pub async fn create(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let total_amount = payload.int("total_amount")?;
    let tanggal_tagihan = payload.date("tanggal_tagihan")?.unwrap_or_else(super::today);
    let status = payload.status("status_pembayaran")?.unwrap_or_default();
    let (Some(order_id), Some(total_amount)) = (payload.text("order_id"), total_amount) else {
        return Err(payload.missing(&["order_id", "total_amount"]));
    };
    if total_amount <= 0 {
        return Err(AppError::InvalidField {
            field: "total_amount",
            reason: "must be greater than zero".into(),
        });
    }

    let (bukti, stored) = attachment(state, payload).await?;
    let row: Row = vec![
        ("order_id", order_id.into()),
        ("metode_pembayaran", payload.text("metode_pembayaran").into()),
        (ATTACHMENT_FIELD, bukti.into()),
        ("total_amount", total_amount.into()),
        ("status_pembayaran", status.into()),
        ("tanggal_tagihan", tanggal_tagihan.into()),
    ];
    let inserted = CrudService::insert(state.store(), &INVOICE, &row).await;
    let tagihan_id = keep_attachment_if(state, stored, inserted, |_| true).await?;
    Ok(Reply::new("invoice created", json!({ "tagihan_id": tagihan_id })))
}

pub async fn read(state: &AppState) -> Result<Reply, AppError> {
    let rows = CrudService::list(state.store(), &INVOICE).await?;
    Ok(Reply::rows("invoice list", rows))
}

pub async fn update(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(tagihan_id) = payload.int("tagihan_id")? else {
        return Err(payload.missing(&["tagihan_id"]));
    };
    let total_amount = payload.int("total_amount")?;
    if total_amount.is_some_and(|t| t <= 0) {
        return Err(AppError::InvalidField {
            field: "total_amount",
            reason: "must be greater than zero".into(),
        });
    }
    let tanggal_tagihan = payload.date("tanggal_tagihan")?;
    let status = payload.status("status_pembayaran")?;

    let (bukti, stored) = attachment(state, payload).await?;
    let patch: Row = vec![
        ("order_id", payload.text("order_id").into()),
        ("metode_pembayaran", payload.text("metode_pembayaran").into()),
        (ATTACHMENT_FIELD, bukti.into()),
        ("total_amount", total_amount.into()),
        ("status_pembayaran", status.into()),
        ("tanggal_tagihan", tanggal_tagihan.into()),
    ];
    let updated = CrudService::update(state.store(), &INVOICE, &SqlValue::Int(tagihan_id), &patch).await;
    keep_attachment_if(state, stored, updated, |affected| *affected > 0).await?;
    Ok(Reply::message("invoice updated"))
}

pub async fn delete(state: &AppState, payload: &Payload) -> Result<Reply, AppError> {
    let Some(tagihan_id) = payload.int("tagihan_id")? else {
        return Err(payload.missing(&["tagihan_id"]));
    };
    CrudService::delete(state.store(), &INVOICE, &SqlValue::Int(tagihan_id)).await?;
    Ok(Reply::message("invoice deleted"))
}
