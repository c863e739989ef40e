// src/repositories/stock_movement_repository.rs
//
// Stock ledger persistence
//
// The ledger is append-only and has no public surface of its own: ingredient
// loads read it, ingredient saves append to it inside their transaction.
//
// Append contract (upsert-or-skip): a movement whose identifier already
// exists is NOT written and NOT updated; it is reported in
// `AppendOutcome::skipped`. Replaying the same movements is therefore safe,
// but a stored movement cannot be corrected through this path.

use log::{debug, warn};
use rusqlite::{params, Connection, Row, Transaction};

use super::columns::{decimal, format_timestamp, named, timestamp};
use crate::db::sequence;
use crate::domain::stock::StockMovement;
use crate::error::AppResult;

/// Result of appending movements to a ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Identifiers written by this call
    pub inserted: Vec<i64>,
    /// Identifiers already present, left untouched
    pub skipped: Vec<i64>,
}

/// Movements of one ingredient, oldest first
pub fn load_movements(conn: &Connection, ingredient_id: i64) -> AppResult<Vec<StockMovement>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, id_ingredient, quantity, movement_type, unit, creation_datetime
         FROM stock_movement
         WHERE id_ingredient = ?1
         ORDER BY creation_datetime, id",
    )?;

    let movements = stmt
        .query_map(params![ingredient_id], row_to_movement)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(movements)
}

/// Append movements to an ingredient's ledger within the caller's transaction.
///
/// Movements without an identifier get one from the `stock_movement.id`
/// sequence. The owning ingredient is always `ingredient_id`.
pub fn append_movements(
    tx: &Transaction<'_>,
    ingredient_id: i64,
    movements: &[StockMovement],
) -> AppResult<AppendOutcome> {
    let mut outcome = AppendOutcome::default();

    for movement in movements {
        let id = match movement.id {
            Some(id) => id,
            None => sequence::allocate(tx, "stock_movement", "id")?,
        };

        let written = tx
            .prepare_cached(
                "INSERT INTO stock_movement
                    (id, id_ingredient, quantity, movement_type, unit, creation_datetime)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (id) DO NOTHING",
            )?
            .execute(params![
                id,
                ingredient_id,
                movement.quantity.to_string(),
                movement.movement_type.as_str(),
                movement.unit.as_str(),
                format_timestamp(&movement.created_at),
            ])?;

        if written == 1 {
            outcome.inserted.push(id);
        } else {
            outcome.skipped.push(id);
        }
    }

    if !outcome.skipped.is_empty() {
        warn!(
            "Ingredient {}: skipped {} already recorded stock movement(s) {:?}",
            ingredient_id,
            outcome.skipped.len(),
            outcome.skipped
        );
    }
    debug!(
        "Ingredient {}: appended {} stock movement(s)",
        ingredient_id,
        outcome.inserted.len()
    );

    Ok(outcome)
}

fn row_to_movement(row: &Row) -> rusqlite::Result<StockMovement> {
    Ok(StockMovement {
        id: Some(row.get("id")?),
        ingredient_id: Some(row.get("id_ingredient")?),
        quantity: decimal(row, "quantity")?,
        movement_type: named(row, "movement_type")?,
        unit: named(row, "unit")?,
        created_at: timestamp(row, "creation_datetime")?,
    })
}
