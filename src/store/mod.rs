//! Store client interface injected into every entity handler.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::schema::EntitySchema;
use crate::sql::SqlValue;
use async_trait::async_trait;
use serde_json::Value;

/// Column name / value pairs for one insert or update.
pub type Row = Vec<(&'static str, SqlValue)>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Lexicographic maximum of the key column, `None` on an empty table.
    async fn max_key(&self, entity: &EntitySchema) -> Result<Option<String>, AppError>;

    /// Insert one row and return its key. A uniqueness violation is reported as
    /// [`AppError::DuplicateKey`] carrying the violated constraint name.
    async fn insert(&self, entity: &EntitySchema, row: &[(&'static str, SqlValue)]) -> Result<Value, AppError>;

    /// All rows with joined display columns, in the schema's read order.
    async fn select_all(&self, entity: &EntitySchema) -> Result<Vec<Value>, AppError>;

    /// Coalescing update: `Null` values keep the stored column. Returns rows affected.
    async fn update(
        &self,
        entity: &EntitySchema,
        key: &SqlValue,
        patch: &[(&'static str, SqlValue)],
    ) -> Result<u64, AppError>;

    /// Returns rows affected.
    async fn delete(&self, entity: &EntitySchema, key: &SqlValue) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
