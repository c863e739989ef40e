// src/lib.rs
// Kitchen Ledger - restaurant ingredient inventory, stock and dish costing
//
// Architecture:
// - Domain: entities, invariants and costing, free of I/O
// - Repositories: explicit SQL over a pooled SQLite database
// - Services: validate, then persist through the repositories
// - Every write is one IMMEDIATE transaction

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_dish,
    validate_ingredient,
    validate_stock_movement,
    // Ingredient
    Category,
    // Dish
    Dish,
    DishCosting,
    DishType,
    Ingredient,
    // Stock
    MovementType,
    RecipeLine,
    StockMovement,
    Unit,
};

// ============================================================================
// PUBLIC API - Errors & Configuration
// ============================================================================

pub use config::DatabaseConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    AppendOutcome, DishRepository, IngredientRepository, SqliteDishRepository,
    SqliteIngredientRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{InventoryService, MenuService};
