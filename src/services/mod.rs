// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services validate domain invariants, then hand the entity to its store.

pub mod inventory_service;
pub mod menu_service;

pub use inventory_service::InventoryService;
pub use menu_service::MenuService;
