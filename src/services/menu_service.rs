// src/services/menu_service.rs
use crate::domain::costing::{evaluate, DishCosting};
use crate::domain::dish::{validate_dish, Dish};
use crate::error::{AppError, AppResult};
use crate::repositories::DishRepository;
use std::sync::Arc;

pub struct MenuService {
    dish_repo: Arc<dyn DishRepository>,
}

impl MenuService {
    pub fn new(dish_repo: Arc<dyn DishRepository>) -> Self {
        Self { dish_repo }
    }

    /// Create or update a dish; the stored recipe becomes exactly `dish.recipe`
    pub fn save_dish(&self, dish: &Dish) -> AppResult<Dish> {
        validate_dish(dish).map_err(AppError::Domain)?;
        self.dish_repo.save(dish)
    }

    pub fn get_dish(&self, dish_id: i64) -> AppResult<Dish> {
        self.dish_repo.find_by_id(dish_id)
    }

    pub fn list_dishes(&self) -> AppResult<Vec<Dish>> {
        self.dish_repo.find_all()
    }

    /// Dishes whose recipe uses the ingredient
    pub fn dishes_using(&self, ingredient_id: i64) -> AppResult<Vec<Dish>> {
        self.dish_repo.find_by_ingredient(ingredient_id)
    }

    pub fn remove_dish(&self, dish_id: i64) -> AppResult<bool> {
        self.dish_repo.delete(dish_id)
    }

    /// Cost and margins of one dish, recomputed from current ingredient prices
    pub fn costing(&self, dish_id: i64) -> AppResult<DishCosting> {
        let dish = self.dish_repo.find_by_id(dish_id)?;
        evaluate(&dish).map_err(AppError::Domain)
    }

    /// Costing of every dish, ordered by dish id
    pub fn costings(&self) -> AppResult<Vec<DishCosting>> {
        self.dish_repo
            .find_all()?
            .iter()
            .map(|dish| evaluate(dish).map_err(AppError::Domain))
            .collect()
    }
}
