use std::collections::HashSet;

use rust_decimal::Decimal;

use super::entity::Dish;
use crate::domain::{DomainError, DomainResult};

/// Validates all Dish invariants required before persisting
pub fn validate_dish(dish: &Dish) -> DomainResult<()> {
    validate_name(&dish.name)?;
    validate_selling_price(dish)?;
    validate_recipe(dish)?;
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Dish name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_selling_price(dish: &Dish) -> DomainResult<()> {
    if let Some(price) = dish.selling_price {
        if price < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "Dish '{}' has a negative selling price: {}",
                dish.name, price
            )));
        }
    }
    Ok(())
}

/// Each line needs a persisted ingredient, a non-negative quantity,
/// and no ingredient may appear twice
fn validate_recipe(dish: &Dish) -> DomainResult<()> {
    let mut seen = HashSet::new();

    for line in &dish.recipe {
        let Some(ingredient_id) = line.ingredient.id else {
            return Err(DomainError::InvariantViolation(format!(
                "Recipe of '{}' uses unsaved ingredient '{}'",
                dish.name, line.ingredient.name
            )));
        };

        match line.quantity {
            None => {
                return Err(DomainError::InvariantViolation(format!(
                    "Recipe line '{}' of '{}' has no quantity",
                    line.ingredient.name, dish.name
                )))
            }
            Some(q) if q < Decimal::ZERO => {
                return Err(DomainError::InvariantViolation(format!(
                    "Recipe line '{}' of '{}' has a negative quantity: {}",
                    line.ingredient.name, dish.name, q
                )))
            }
            Some(_) => {}
        }

        if !seen.insert(ingredient_id) {
            return Err(DomainError::InvariantViolation(format!(
                "Ingredient {} appears twice in the recipe of '{}'",
                ingredient_id, dish.name
            )));
        }
    }
    Ok(())
}
