pub mod entity;
pub mod invariants;

pub use entity::{stock_level_at, MovementType, StockMovement, Unit};
pub use invariants::validate_stock_movement;
