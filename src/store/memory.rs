//! In-process store with the same observable behaviour as [`super::PgStore`]:
//! key and unique constraints, serial keys, LEFT JOIN display columns and read ordering.
//! Used by tests and for running the API without a database.

use super::Store;
use crate::error::AppError;
use crate::schema::{EntitySchema, KeyKind};
use crate::sql::SqlValue;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type StoredRow = BTreeMap<String, SqlValue>;

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<StoredRow>>,
    serials: HashMap<String, i64>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a row into any table without constraint checks, e.g. `vendor` rows referenced by products.
    pub fn seed(&self, table: &str, row: &[(&str, SqlValue)]) -> Result<(), AppError> {
        let mut tables = self.write()?;
        let stored = row.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        tables.rows.entry(table.to_string()).or_default().push(stored);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Db(sqlx::Error::Protocol("store lock poisoned".into())))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Db(sqlx::Error::Protocol("store lock poisoned".into())))
    }
}

fn duplicate(constraint: String, column: &str, value: &SqlValue) -> AppError {
    AppError::DuplicateKey {
        message: format!(
            "duplicate key value violates unique constraint \"{}\": {} = {:?}",
            constraint, column, value
        ),
        constraint: Some(constraint),
    }
}

static NULL: SqlValue = SqlValue::Null;

fn value_of<'a>(row: &'a StoredRow, column: &str) -> &'a SqlValue {
    row.get(column).unwrap_or(&NULL)
}

#[async_trait]
impl Store for MemoryStore {
    async fn max_key(&self, entity: &EntitySchema) -> Result<Option<String>, AppError> {
        let tables = self.read()?;
        let max = tables
            .rows
            .get(entity.table)
            .into_iter()
            .flatten()
            .filter_map(|row| match value_of(row, entity.key.name) {
                SqlValue::Text(s) => Some(s.clone()),
                SqlValue::Int(n) => Some(n.to_string()),
                _ => None,
            })
            .max();
        Ok(max)
    }

    async fn insert(&self, entity: &EntitySchema, row: &[(&'static str, SqlValue)]) -> Result<Value, AppError> {
        let mut tables = self.write()?;
        let mut stored: StoredRow = std::iter::once(entity.key.name)
            .chain(entity.columns.iter().map(|c| c.name))
            .map(|name| (name.to_string(), SqlValue::Null))
            .collect();
        for (name, value) in row {
            if entity.column(name).is_some() {
                stored.insert(name.to_string(), value.clone());
            }
        }

        if entity.key_kind == KeyKind::Serial {
            let next = tables.serials.get(entity.table).copied().unwrap_or(0) + 1;
            tables.serials.insert(entity.table.to_string(), next);
            stored.insert(entity.key.name.to_string(), SqlValue::Int(next));
        }

        let existing = tables.rows.get(entity.table).map(Vec::as_slice).unwrap_or(&[]);
        let key = value_of(&stored, entity.key.name).clone();
        if key.is_null() {
            return Err(AppError::Db(sqlx::Error::Protocol(format!(
                "null value in column \"{}\" of relation \"{}\"",
                entity.key.name, entity.table
            ))));
        }
        if existing.iter().any(|r| value_of(r, entity.key.name) == &key) {
            return Err(duplicate(entity.key_constraint(), entity.key.name, &key));
        }
        for column in entity.unique {
            let value = value_of(&stored, column);
            if !value.is_null() && existing.iter().any(|r| value_of(r, column) == value) {
                return Err(duplicate(entity.unique_constraint(column), column, value));
            }
        }

        tables.rows.entry(entity.table.to_string()).or_default().push(stored);
        Ok(key.to_json())
    }

    async fn select_all(&self, entity: &EntitySchema) -> Result<Vec<Value>, AppError> {
        let tables = self.read()?;
        let empty = Vec::new();
        let mut rows: Vec<&StoredRow> = tables.rows.get(entity.table).unwrap_or(&empty).iter().collect();
        rows.sort_by(|a, b| {
            entity
                .order
                .iter()
                .map(|o| {
                    let ord = value_of(a, o.column).sort_cmp(value_of(b, o.column));
                    if o.descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let out = rows
            .into_iter()
            .map(|row| {
                let mut map = serde_json::Map::new();
                map.insert(entity.key.name.to_string(), value_of(row, entity.key.name).to_json());
                for c in entity.columns {
                    map.insert(c.name.to_string(), value_of(row, c.name).to_json());
                }
                for join in entity.joins {
                    let local = value_of(row, join.local);
                    let matched = tables
                        .rows
                        .get(join.table)
                        .and_then(|rs| rs.iter().find(|r| !local.is_null() && value_of(r, join.remote) == local));
                    for (remote_col, output) in join.columns {
                        let v = matched.map(|r| value_of(r, remote_col).to_json()).unwrap_or(Value::Null);
                        map.insert(output.to_string(), v);
                    }
                }
                Value::Object(map)
            })
            .collect();
        Ok(out)
    }

    async fn update(
        &self,
        entity: &EntitySchema,
        key: &SqlValue,
        patch: &[(&'static str, SqlValue)],
    ) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let Some(rows) = tables.rows.get_mut(entity.table) else {
            return Ok(0);
        };
        let mut affected = 0;
        for row in rows.iter_mut().filter(|r| value_of(r, entity.key.name) == key) {
            for (name, value) in patch {
                if value.is_null() || *name == entity.key.name || entity.column(name).is_none() {
                    continue;
                }
                row.insert(name.to_string(), value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, entity: &EntitySchema, key: &SqlValue) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let Some(rows) = tables.rows.get_mut(entity.table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| value_of(r, entity.key.name) != key);
        Ok((before - rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
