//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity schema.

use crate::schema::{Column, EntitySchema};
use crate::sql::SqlValue;

/// Alias of the entity's own table in read queries.
const MAIN_ALIAS: &str = "t";

/// Quote identifier for PostgreSQL (safe: only from static schema).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn aliased(alias: &str, column: &str) -> String {
    format!("{}.{}", quoted(alias), quoted(column))
}

fn placeholder(n: u32, column: &Column) -> String {
    format!("${}::{}", n, column.ty.pg_cast())
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }
}

/// Lexicographic maximum of the key column, as text.
pub fn select_max_key(entity: &EntitySchema) -> String {
    format!(
        "SELECT MAX({})::text FROM {}",
        quoted(entity.key.name),
        quoted(entity.table)
    )
}

/// INSERT of the given columns (unknown names skipped), returning the key.
pub fn insert(entity: &EntitySchema, row: &[(&'static str, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(row.len());
    let mut placeholders = Vec::with_capacity(row.len());
    for (name, value) in row {
        let Some(column) = entity.column(name) else { continue };
        let n = q.push_param(value.clone());
        cols.push(quoted(name));
        placeholders.push(placeholder(n, column));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        quoted(entity.key.name)
    );
    q
}

/// SELECT of key + columns, LEFT JOINs for display names, ordered per schema.
pub fn select_all(entity: &EntitySchema) -> String {
    let mut select_parts = vec![aliased(MAIN_ALIAS, entity.key.name)];
    select_parts.extend(entity.columns.iter().map(|c| aliased(MAIN_ALIAS, c.name)));

    let mut join_clauses = String::new();
    for (i, join) in entity.joins.iter().enumerate() {
        let alias = format!("j{}", i);
        for (remote_col, output) in join.columns {
            select_parts.push(format!("{} AS {}", aliased(&alias, remote_col), quoted(output)));
        }
        join_clauses.push_str(&format!(
            " LEFT JOIN {} AS {} ON {} = {}",
            quoted(join.table),
            quoted(&alias),
            aliased(&alias, join.remote),
            aliased(MAIN_ALIAS, join.local)
        ));
    }

    let order: Vec<String> = entity
        .order
        .iter()
        .map(|o| {
            let expr = aliased(MAIN_ALIAS, o.column);
            if o.descending {
                format!("{} DESC", expr)
            } else {
                expr
            }
        })
        .collect();
    let order_clause = if order.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", order.join(", "))
    };

    format!(
        "SELECT {} FROM {} AS {}{}{}",
        select_parts.join(", "),
        quoted(entity.table),
        quoted(MAIN_ALIAS),
        join_clauses,
        order_clause
    )
}

/// UPDATE by key: every patch column is `COALESCE($n, col)` so NULL keeps the stored value.
/// The key is always `$1`.
pub fn update(entity: &EntitySchema, key: &SqlValue, patch: &[(&'static str, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let key_param = q.push_param(key.clone());
    let mut sets = Vec::with_capacity(patch.len());
    for (name, value) in patch {
        if *name == entity.key.name {
            continue;
        }
        let Some(column) = entity.column(name) else { continue };
        let n = q.push_param(value.clone());
        sets.push(format!(
            "{} = COALESCE({}, {})",
            quoted(name),
            placeholder(n, column),
            quoted(name)
        ));
    }
    if sets.is_empty() {
        let k = quoted(entity.key.name);
        sets.push(format!("{} = {}", k, k));
    }
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(entity.table),
        sets.join(", "),
        quoted(entity.key.name),
        placeholder(key_param, &entity.key)
    );
    q
}

/// DELETE by key.
pub fn delete(entity: &EntitySchema, key: &SqlValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(key.clone());
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(entity.table),
        quoted(entity.key.name),
        placeholder(n, &entity.key)
    );
    q
}
