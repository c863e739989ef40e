// src/repositories/ingredient_repository.rs
//
// Ingredient persistence, including the ingredient's stock ledger

use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::sync::Arc;

use super::columns::{named, optional_decimal};
use super::reference_guard::ensure_unreferenced;
use super::stock_movement_repository::{append_movements, load_movements};
use crate::db::{sequence, ConnectionPool};
use crate::domain::ingredient::{validate_ingredient, Ingredient};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait IngredientRepository: Send + Sync {
    /// Ingredient with its full stock history, oldest movement first
    fn find_by_id(&self, id: i64) -> AppResult<Ingredient>;

    /// All ingredients ordered by id, each with its stock history
    fn find_all(&self) -> AppResult<Vec<Ingredient>>;

    /// Upsert the ingredient and append any new stock movements.
    /// Invalid ingredients are rejected before anything is written.
    /// Returns the ingredient as stored.
    fn save(&self, ingredient: &Ingredient) -> AppResult<Ingredient>;

    /// Insert (never update) all ingredients, or none of them
    fn create_many(&self, ingredients: &[Ingredient]) -> AppResult<Vec<Ingredient>>;

    /// Delete an ingredient no recipe uses; its stock history goes with it.
    /// Returns whether a row was removed.
    fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct SqliteIngredientRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteIngredientRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_ingredient(row: &Row) -> rusqlite::Result<Ingredient> {
        Ok(Ingredient {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            category: named(row, "category")?,
            price: optional_decimal(row, "price")?,
            stock_movements: Vec::new(),
        })
    }

    fn load(conn: &Connection, id: i64) -> AppResult<Ingredient> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, category, price FROM ingredient WHERE id = ?1",
        )?;

        let mut ingredient = match stmt.query_row(params![id], Self::row_to_ingredient) {
            Ok(ingredient) => ingredient,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(AppError::NotFound {
                    entity: "Ingredient",
                    id,
                })
            }
            Err(e) => return Err(AppError::Database(e)),
        };

        ingredient.stock_movements = load_movements(conn, id)?;
        Ok(ingredient)
    }

    /// Validate the ingredient and render its price for storage
    fn price_text(ingredient: &Ingredient) -> AppResult<String> {
        validate_ingredient(ingredient)?;
        ingredient
            .price
            .map(|p| p.to_string())
            .ok_or_else(|| {
                AppError::Domain(DomainError::InvariantViolation(format!(
                    "Ingredient '{}' has no price",
                    ingredient.name
                )))
            })
    }

    fn id_or_allocate(tx: &Transaction<'_>, ingredient: &Ingredient) -> AppResult<i64> {
        match ingredient.id {
            Some(id) => Ok(id),
            None => sequence::allocate(tx, "ingredient", "id"),
        }
    }
}

impl IngredientRepository for SqliteIngredientRepository {
    fn find_by_id(&self, id: i64) -> AppResult<Ingredient> {
        let conn = self.pool.get()?;
        Self::load(&conn, id)
    }

    fn find_all(&self) -> AppResult<Vec<Ingredient>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare_cached("SELECT id, name, category, price FROM ingredient ORDER BY id")?;

        let mut ingredients: Vec<Ingredient> = stmt
            .query_map([], Self::row_to_ingredient)?
            .collect::<Result<Vec<_>, _>>()?;

        for ingredient in &mut ingredients {
            if let Some(id) = ingredient.id {
                ingredient.stock_movements = load_movements(&conn, id)?;
            }
        }

        Ok(ingredients)
    }

    fn save(&self, ingredient: &Ingredient) -> AppResult<Ingredient> {
        let price = Self::price_text(ingredient)?;

        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = Self::id_or_allocate(&tx, ingredient)?;

        tx.execute(
            "INSERT INTO ingredient (id, name, category, price)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE
             SET name = excluded.name,
                 category = excluded.category,
                 price = excluded.price",
            params![id, ingredient.name, ingredient.category.as_str(), price],
        )?;

        let outcome = append_movements(&tx, id, &ingredient.stock_movements)?;

        tx.commit()?;
        info!(
            "Saved ingredient {} '{}' ({} new stock movement(s))",
            id,
            ingredient.name,
            outcome.inserted.len()
        );

        Self::load(&conn, id)
    }

    fn create_many(&self, ingredients: &[Ingredient]) -> AppResult<Vec<Ingredient>> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut ids = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let price = Self::price_text(ingredient)?;
            let id = Self::id_or_allocate(&tx, ingredient)?;

            tx.execute(
                "INSERT INTO ingredient (id, name, category, price) VALUES (?1, ?2, ?3, ?4)",
                params![id, ingredient.name, ingredient.category.as_str(), price],
            )?;
            append_movements(&tx, id, &ingredient.stock_movements)?;

            ids.push(id);
        }

        tx.commit()?;
        info!("Created {} ingredient(s)", ids.len());

        ids.into_iter().map(|id| Self::load(&conn, id)).collect()
    }

    fn delete(&self, id: i64) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        ensure_unreferenced(&tx, id)?;

        let removed = tx.execute("DELETE FROM ingredient WHERE id = ?1", params![id])?;
        tx.commit()?;

        if removed > 0 {
            info!("Deleted ingredient {}", id);
        } else {
            debug!("Ingredient {} did not exist, nothing deleted", id);
        }

        Ok(removed > 0)
    }
}
