// src/repositories/dish_repository.rs
//
// Dish persistence. A dish is saved together with its recipe in one
// immediate transaction; loads resolve the recipe through the join.

use log::{debug, info};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::sync::Arc;

use super::columns::{named, optional_decimal};
use super::recipe_repository::{clear_recipe, load_recipe, replace_recipe};
use crate::db::{sequence, ConnectionPool};
use crate::domain::dish::{validate_dish, Dish};
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait DishRepository: Send + Sync {
    /// Dish with its resolved recipe
    fn find_by_id(&self, id: i64) -> AppResult<Dish>;

    /// All dishes ordered by id
    fn find_all(&self) -> AppResult<Vec<Dish>>;

    /// Dishes whose recipe uses the ingredient, each with its full recipe
    fn find_by_ingredient(&self, ingredient_id: i64) -> AppResult<Vec<Dish>>;

    /// Validate, then upsert the dish and replace its recipe atomically
    fn save(&self, dish: &Dish) -> AppResult<Dish>;

    /// Delete the dish and its recipe; returns whether the dish existed
    fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct SqliteDishRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteDishRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_dish(row: &Row) -> rusqlite::Result<Dish> {
        Ok(Dish {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            dish_type: named(row, "dish_type")?,
            selling_price: optional_decimal(row, "selling_price")?,
            recipe: Vec::new(),
        })
    }

    fn load(conn: &Connection, id: i64) -> AppResult<Dish> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, dish_type, selling_price FROM dish WHERE id = ?1",
        )?;

        let mut dish = match stmt.query_row(params![id], Self::row_to_dish) {
            Ok(dish) => dish,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(AppError::NotFound { entity: "Dish", id })
            }
            Err(e) => return Err(AppError::Database(e)),
        };

        dish.recipe = load_recipe(conn, id)?;
        Ok(dish)
    }

    fn with_recipes(conn: &Connection, mut dishes: Vec<Dish>) -> AppResult<Vec<Dish>> {
        for dish in &mut dishes {
            if let Some(id) = dish.id {
                dish.recipe = load_recipe(conn, id)?;
            }
        }
        Ok(dishes)
    }
}

impl DishRepository for SqliteDishRepository {
    fn find_by_id(&self, id: i64) -> AppResult<Dish> {
        let conn = self.pool.get()?;
        Self::load(&conn, id)
    }

    fn find_all(&self) -> AppResult<Vec<Dish>> {
        let conn = self.pool.get()?;

        let mut stmt = conn
            .prepare_cached("SELECT id, name, dish_type, selling_price FROM dish ORDER BY id")?;
        let dishes = stmt
            .query_map([], Self::row_to_dish)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_recipes(&conn, dishes)
    }

    fn find_by_ingredient(&self, ingredient_id: i64) -> AppResult<Vec<Dish>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare_cached(
            "SELECT d.id, d.name, d.dish_type, d.selling_price
             FROM dish d
             WHERE EXISTS (
                 SELECT 1 FROM dish_ingredient di
                 WHERE di.id_dish = d.id AND di.id_ingredient = ?1
             )
             ORDER BY d.id",
        )?;
        let dishes = stmt
            .query_map(params![ingredient_id], Self::row_to_dish)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_recipes(&conn, dishes)
    }

    fn save(&self, dish: &Dish) -> AppResult<Dish> {
        validate_dish(dish)?;

        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = match dish.id {
            Some(id) => id,
            None => sequence::allocate(&tx, "dish", "id")?,
        };

        tx.execute(
            "INSERT INTO dish (id, name, dish_type, selling_price)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE
             SET name = excluded.name,
                 dish_type = excluded.dish_type,
                 selling_price = excluded.selling_price",
            params![
                id,
                dish.name,
                dish.dish_type.as_str(),
                dish.selling_price.map(|p| p.to_string()),
            ],
        )?;

        if dish.recipe.is_empty() {
            let removed = clear_recipe(&tx, id)?;
            debug!("Dish {}: cleared {} recipe line(s)", id, removed);
        } else {
            replace_recipe(&tx, id, &dish.recipe)?;
        }

        tx.commit()?;
        info!(
            "Saved dish {} '{}' with {} recipe line(s)",
            id,
            dish.name,
            dish.recipe.len()
        );

        Self::load(&conn, id)
    }

    fn delete(&self, id: i64) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        clear_recipe(&tx, id)?;
        let removed = tx.execute("DELETE FROM dish WHERE id = ?1", params![id])?;

        tx.commit()?;
        if removed > 0 {
            info!("Deleted dish {}", id);
        }

        Ok(removed > 0)
    }
}
