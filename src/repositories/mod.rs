// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Repositories are data mappers over the relational store
// - Every write runs in one IMMEDIATE transaction, all or nothing
// - Invariants are checked by the services before a save
// - Explicit SQL only

mod columns;

pub mod dish_repository;
pub mod ingredient_repository;
pub mod recipe_repository;
pub mod reference_guard;
pub mod stock_movement_repository;

pub use dish_repository::{DishRepository, SqliteDishRepository};
pub use ingredient_repository::{IngredientRepository, SqliteIngredientRepository};
pub use reference_guard::count_references;
pub use stock_movement_repository::AppendOutcome;

#[cfg(test)]
pub use dish_repository::MockDishRepository;
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
