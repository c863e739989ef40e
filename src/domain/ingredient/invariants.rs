use rust_decimal::Decimal;

use super::entity::Ingredient;
use crate::domain::stock::validate_stock_movement;
use crate::domain::{DomainError, DomainResult};

/// Validates all Ingredient invariants required before persisting
pub fn validate_ingredient(ingredient: &Ingredient) -> DomainResult<()> {
    validate_name(&ingredient.name)?;
    validate_price(ingredient)?;
    validate_movements(ingredient)?;
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Ingredient name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Price must be known and non-negative
fn validate_price(ingredient: &Ingredient) -> DomainResult<()> {
    match ingredient.price {
        None => Err(DomainError::InvariantViolation(format!(
            "Ingredient '{}' has no price",
            ingredient.name
        ))),
        Some(price) if price < Decimal::ZERO => Err(DomainError::InvariantViolation(format!(
            "Ingredient '{}' has a negative price: {}",
            ingredient.name, price
        ))),
        Some(_) => Ok(()),
    }
}

/// Every movement must be valid and may not belong to another ingredient
fn validate_movements(ingredient: &Ingredient) -> DomainResult<()> {
    for movement in &ingredient.stock_movements {
        validate_stock_movement(movement)?;

        if let (Some(owner), Some(id)) = (movement.ingredient_id, ingredient.id) {
            if owner != id {
                return Err(DomainError::InvariantViolation(format!(
                    "Stock movement belongs to ingredient {} not {}",
                    owner, id
                )));
            }
        }
    }
    Ok(())
}

/// Invariants that must hold true for the Ingredient domain:
///
/// 1. Name is not blank
/// 2. Price is present and >= 0 when persisted
/// 3. Category is one of the fixed set (enforced by the type)
/// 4. Identifier never changes after the first save
/// 5. Stock movements are only ever appended
