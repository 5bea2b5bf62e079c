//! Synthetic prefixed ids: `P001`, `A01`, `O001`.

use crate::error::AppError;
use crate::schema::{EntitySchema, IdFormat};
use crate::store::Store;

/// Next id after `current_max`: digits are extracted from the stored maximum, incremented and
/// zero-padded to `format.width`. An empty table (or a maximum without digits) starts at 1.
pub fn next_id(format: &IdFormat, current_max: Option<&str>) -> Result<String, AppError> {
    let last = match current_max {
        None => 0,
        Some(max) => {
            let digits: String = max.chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                0
            } else {
                digits
                    .parse::<u64>()
                    .map_err(|_| AppError::CorruptKey(max.to_string()))?
            }
        }
    };
    let next = last
        .checked_add(1)
        .ok_or_else(|| AppError::CorruptKey(current_max.unwrap_or_default().to_string()))?;
    Ok(format!("{}{:0width$}", format.prefix, next, width = format.width))
}

/// Reads the current maximum key from the store and computes the next id.
pub async fn generate(store: &dyn Store, entity: &EntitySchema, format: &IdFormat) -> Result<String, AppError> {
    let max = store.max_key(entity).await?;
    let id = next_id(format, max.as_deref())?;
    tracing::debug!(table = entity.table, max = ?max, id = %id, "generated id");
    Ok(id)
}
