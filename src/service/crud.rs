//! CRUD execution shared by every entity handler.

use crate::error::AppError;
use crate::ids;
use crate::schema::{EntitySchema, IdFormat};
use crate::sql::SqlValue;
use crate::store::Store;
use serde_json::Value;

/// Attempts for a synthetic-key insert before the duplicate key is reported.
pub const MAX_KEY_ATTEMPTS: u32 = 5;

pub struct CrudService;

impl CrudService {
    /// Insert one row whose key is supplied or assigned by the store. Returns the key.
    pub async fn insert(
        store: &dyn Store,
        entity: &EntitySchema,
        row: &[(&'static str, SqlValue)],
    ) -> Result<Value, AppError> {
        store.insert(entity, row).await
    }

    /// Insert with a generated synthetic key. A duplicate on the key constraint means another
    /// request took the same id between read and insert: regenerate and retry.
    pub async fn insert_with_generated_key(
        store: &dyn Store,
        entity: &EntitySchema,
        format: &IdFormat,
        row: &[(&'static str, SqlValue)],
    ) -> Result<String, AppError> {
        let key_constraint = entity.key_constraint();
        let mut attempt = 1;
        loop {
            let id = ids::generate(store, entity, format).await?;
            let mut full = Vec::with_capacity(row.len() + 1);
            full.push((entity.key.name, SqlValue::Text(id.clone())));
            full.extend(row.iter().cloned());
            match store.insert(entity, &full).await {
                Ok(_) => return Ok(id),
                Err(AppError::DuplicateKey { constraint, message })
                    if attempt < MAX_KEY_ATTEMPTS && constraint.as_deref() == Some(key_constraint.as_str()) =>
                {
                    tracing::warn!(table = entity.table, id = %id, attempt, error = %message, "key taken, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn list(store: &dyn Store, entity: &EntitySchema) -> Result<Vec<Value>, AppError> {
        store.select_all(entity).await
    }

    /// Coalescing update by key. A missing row is not an error.
    pub async fn update(
        store: &dyn Store,
        entity: &EntitySchema,
        key: &SqlValue,
        patch: &[(&'static str, SqlValue)],
    ) -> Result<u64, AppError> {
        let affected = store.update(entity, key, patch).await?;
        if affected == 0 {
            tracing::debug!(table = entity.table, key = ?key, "update matched no row");
        }
        Ok(affected)
    }

    /// Delete by key. A missing row is not an error.
    pub async fn delete(store: &dyn Store, entity: &EntitySchema, key: &SqlValue) -> Result<u64, AppError> {
        let affected = store.delete(entity, key).await?;
        if affected == 0 {
            tracing::debug!(table = entity.table, key = ?key, "delete matched no row");
        }
        Ok(affected)
    }
}
