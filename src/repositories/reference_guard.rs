// src/repositories/reference_guard.rs
//
// Referential guard for ingredient deletion
//
// An ingredient used by any recipe cannot be deleted. The check runs inside
// the deleting transaction, before any row is removed.

use log::warn;
use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};

/// Number of recipe lines that use the ingredient
pub fn count_references(conn: &Connection, ingredient_id: i64) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM dish_ingredient WHERE id_ingredient = ?1",
        params![ingredient_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Fails with `AppError::Conflict` while any recipe uses the ingredient
pub fn ensure_unreferenced(conn: &Connection, ingredient_id: i64) -> AppResult<()> {
    let references = count_references(conn, ingredient_id)?;

    if references > 0 {
        warn!(
            "Refusing to delete ingredient {}: used by {} recipe line(s)",
            ingredient_id, references
        );
        return Err(AppError::Conflict {
            ingredient_id,
            references,
        });
    }

    Ok(())
}
