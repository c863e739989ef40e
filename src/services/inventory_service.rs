// src/services/inventory_service.rs
use crate::domain::ingredient::{validate_ingredient, Ingredient};
use crate::domain::stock::{stock_level_at, validate_stock_movement, StockMovement};
use crate::error::{AppError, AppResult};
use crate::repositories::IngredientRepository;
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct InventoryService {
    ingredient_repo: Arc<dyn IngredientRepository>,
}

impl InventoryService {
    pub fn new(ingredient_repo: Arc<dyn IngredientRepository>) -> Self {
        Self { ingredient_repo }
    }

    /// Create or update an ingredient together with any new stock movements
    pub fn register_ingredient(&self, ingredient: &Ingredient) -> AppResult<Ingredient> {
        validate_ingredient(ingredient).map_err(AppError::Domain)?;
        self.ingredient_repo.save(ingredient)
    }

    /// Insert a batch of new ingredients; nothing is stored if one fails
    pub fn register_many(&self, ingredients: &[Ingredient]) -> AppResult<Vec<Ingredient>> {
        for ingredient in ingredients {
            validate_ingredient(ingredient).map_err(AppError::Domain)?;
        }
        self.ingredient_repo.create_many(ingredients)
    }

    /// Append movements to the ledger of an existing ingredient
    pub fn record_movements(
        &self,
        ingredient_id: i64,
        movements: Vec<StockMovement>,
    ) -> AppResult<Ingredient> {
        let mut ingredient = self.ingredient_repo.find_by_id(ingredient_id)?;

        let mut fresh = Vec::with_capacity(movements.len());
        for mut movement in movements {
            validate_stock_movement(&movement).map_err(AppError::Domain)?;
            movement.ingredient_id = Some(ingredient_id);
            fresh.push(movement);
        }

        ingredient.stock_movements.extend(fresh.iter().cloned());
        validate_ingredient(&ingredient).map_err(AppError::Domain)?;

        // Only the new movements go to the store; the history is already there
        ingredient.stock_movements = fresh;
        debug!(
            "Recording {} movement(s) for ingredient {}",
            ingredient.stock_movements.len(),
            ingredient_id
        );

        self.ingredient_repo.save(&ingredient)
    }

    pub fn get_ingredient(&self, ingredient_id: i64) -> AppResult<Ingredient> {
        self.ingredient_repo.find_by_id(ingredient_id)
    }

    pub fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        self.ingredient_repo.find_all()
    }

    /// Stock of an ingredient at a point in time, movements at exactly `at`
    /// included. Without a point in time the level is zero.
    pub fn stock_level(
        &self,
        ingredient_id: i64,
        at: Option<DateTime<Utc>>,
    ) -> AppResult<Decimal> {
        let ingredient = self.ingredient_repo.find_by_id(ingredient_id)?;
        Ok(stock_level_at(&ingredient.stock_movements, at))
    }

    /// Delete an ingredient no recipe uses
    pub fn remove_ingredient(&self, ingredient_id: i64) -> AppResult<bool> {
        self.ingredient_repo.delete(ingredient_id)
    }
}
