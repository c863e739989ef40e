// src/repositories/recipe_repository.rs
//
// Recipe association persistence (dish x ingredient)
//
// Replacing a recipe is delete-then-insert. Both statements run in the
// caller's transaction, so readers see either the old recipe or the new one.

use log::debug;
use rusqlite::{params, Connection, Row, Transaction};

use super::columns::{decimal, named, optional_decimal};
use crate::domain::dish::RecipeLine;
use crate::domain::ingredient::Ingredient;
use crate::domain::DomainError;
use crate::error::AppResult;

/// Replace the whole recipe of a dish; returns the number of lines written.
///
/// Unset quantities are stored as 0 and unset units as the generic unit.
pub fn replace_recipe(
    tx: &Transaction<'_>,
    dish_id: i64,
    lines: &[RecipeLine],
) -> AppResult<usize> {
    let removed = clear_recipe(tx, dish_id)?;

    let mut insert = tx.prepare_cached(
        "INSERT INTO dish_ingredient (id_dish, id_ingredient, quantity_required, unit)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    for line in lines {
        let ingredient_id = line.ingredient.id.ok_or_else(|| {
            DomainError::InvariantViolation(format!(
                "Recipe line references unsaved ingredient '{}'",
                line.ingredient.name
            ))
        })?;

        insert.execute(params![
            dish_id,
            ingredient_id,
            line.stored_quantity().to_string(),
            line.stored_unit(),
        ])?;
    }

    debug!(
        "Dish {}: replaced {} recipe line(s) with {}",
        dish_id,
        removed,
        lines.len()
    );

    Ok(lines.len())
}

/// Remove every recipe line of a dish; returns the number removed
pub fn clear_recipe(tx: &Transaction<'_>, dish_id: i64) -> AppResult<usize> {
    let removed = tx.execute(
        "DELETE FROM dish_ingredient WHERE id_dish = ?1",
        params![dish_id],
    )?;
    Ok(removed)
}

/// Resolve a dish's recipe as (ingredient snapshot, quantity, unit) lines,
/// ordered by ingredient id. Snapshots carry no stock history.
pub fn load_recipe(conn: &Connection, dish_id: i64) -> AppResult<Vec<RecipeLine>> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.id, i.name, i.category, i.price, di.quantity_required, di.unit
         FROM dish_ingredient di
         JOIN ingredient i ON i.id = di.id_ingredient
         WHERE di.id_dish = ?1
         ORDER BY i.id",
    )?;

    let lines = stmt
        .query_map(params![dish_id], row_to_line)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines)
}

fn row_to_line(row: &Row) -> rusqlite::Result<RecipeLine> {
    let ingredient = Ingredient {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        category: named(row, "category")?,
        price: optional_decimal(row, "price")?,
        stock_movements: Vec::new(),
    };

    Ok(RecipeLine {
        ingredient,
        quantity: Some(decimal(row, "quantity_required")?),
        unit: Some(row.get("unit")?),
    })
}
