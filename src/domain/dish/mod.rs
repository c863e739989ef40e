pub mod entity;
pub mod invariants;

pub use entity::{Dish, DishType, RecipeLine, DEFAULT_RECIPE_UNIT};
pub use invariants::validate_dish;
