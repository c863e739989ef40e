use super::entity::StockMovement;
use crate::domain::{DomainError, DomainResult};
use rust_decimal::Decimal;

/// Validates a stock movement before it is appended to a ledger
pub fn validate_stock_movement(movement: &StockMovement) -> DomainResult<()> {
    if movement.quantity < Decimal::ZERO {
        return Err(DomainError::InvariantViolation(format!(
            "Stock movement quantity must not be negative: {}",
            movement.quantity
        )));
    }
    Ok(())
}
