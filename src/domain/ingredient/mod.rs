pub mod entity;
pub mod invariants;

pub use entity::{Category, Ingredient};
pub use invariants::validate_ingredient;
