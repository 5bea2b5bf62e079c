//! PostgreSQL store over a sqlx pool.

use super::Store;
use crate::error::AppError;
use crate::schema::EntitySchema;
use crate::sql::{self, QueryBuf, SqlValue};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgRow};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_one(&self, q: &QueryBuf) -> Result<PgRow, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = p.bind_to(query);
        }
        query.fetch_one(&self.pool).await.map_err(store_error)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = p.bind_to(query);
        }
        let done = query.execute(&self.pool).await.map_err(store_error)?;
        Ok(done.rows_affected())
    }
}

/// Unique violations become [`AppError::DuplicateKey`] so callers can retry on the key constraint.
fn store_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::DuplicateKey {
                constraint: db.constraint().map(str::to_string),
                message: db.message().to_string(),
            };
        }
    }
    AppError::Db(e)
}

#[async_trait]
impl Store for PgStore {
    async fn max_key(&self, entity: &EntitySchema) -> Result<Option<String>, AppError> {
        let sql = sql::select_max_key(entity);
        tracing::debug!(sql = %sql, "query");
        let max: Option<String> = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(max)
    }

    async fn insert(&self, entity: &EntitySchema, row: &[(&'static str, SqlValue)]) -> Result<Value, AppError> {
        let q = sql::insert(entity, row);
        let returned = self.fetch_one(&q).await?;
        Ok(cell_to_value(&returned, entity.key.name))
    }

    async fn select_all(&self, entity: &EntitySchema) -> Result<Vec<Value>, AppError> {
        let sql = sql::select_all(entity);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn update(
        &self,
        entity: &EntitySchema,
        key: &SqlValue,
        patch: &[(&'static str, SqlValue)],
    ) -> Result<u64, AppError> {
        self.execute(&sql::update(entity, key, patch)).await
    }

    async fn delete(&self, entity: &EntitySchema, key: &SqlValue) -> Result<u64, AppError> {
        self.execute(&sql::delete(entity, key)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
