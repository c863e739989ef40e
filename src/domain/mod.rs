// src/domain/mod.rs
//
// Domain Root - entities, invariants and pure calculations
//
// Everything in here is free of I/O. Repositories map these types to rows,
// services validate them before persisting.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod costing;
pub mod dish;
pub mod ingredient;
pub mod stock;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Ingredient Domain
pub use ingredient::{validate_ingredient, Category, Ingredient};

// Stock Domain
pub use stock::{stock_level_at, validate_stock_movement, MovementType, StockMovement, Unit};

// Dish Domain
pub use dish::{validate_dish, Dish, DishType, RecipeLine, DEFAULT_RECIPE_UNIT};

// Costing (Derived Data)
pub use costing::{dish_cost, gross_margin, gross_margin_percentage, DishCosting};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A derived value was requested but one of its inputs is absent
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
