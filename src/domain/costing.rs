// src/domain/costing.rs
//
// Dish costing - derived data, always recomputed from the recipe
//
// Pure functions over an already resolved Dish. No I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::dish::Dish;
use crate::domain::{DomainError, DomainResult};

/// Costing figures for one dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishCosting {
    pub dish_id: Option<i64>,
    pub dish_name: String,
    pub cost: Decimal,
    pub selling_price: Option<Decimal>,
    /// Present only when the dish is priced
    pub gross_margin: Option<Decimal>,
    /// Present only when the dish is priced with a non-zero price
    pub gross_margin_percentage: Option<Decimal>,
}

/// Sum of ingredient price times required quantity over the recipe
pub fn dish_cost(dish: &Dish) -> DomainResult<Decimal> {
    let mut total = Decimal::ZERO;

    for line in &dish.recipe {
        let price = line.ingredient.price.ok_or_else(|| {
            DomainError::InvalidState(format!(
                "Price is unset for ingredient '{}'",
                line.ingredient.name
            ))
        })?;
        let quantity = line.quantity.ok_or_else(|| {
            DomainError::InvalidState(format!(
                "Quantity is unset for ingredient '{}' in dish '{}'",
                line.ingredient.name, dish.name
            ))
        })?;

        total = price
            .checked_mul(quantity)
            .and_then(|line_cost| total.checked_add(line_cost))
            .ok_or_else(|| out_of_range(dish, "cost"))?;
    }

    Ok(total)
}

/// Selling price minus dish cost
pub fn gross_margin(dish: &Dish) -> DomainResult<Decimal> {
    let selling_price = dish.selling_price.ok_or_else(|| {
        DomainError::InvalidState(format!("Selling price is unset for dish '{}'", dish.name))
    })?;

    margin(dish, selling_price, dish_cost(dish)?)
}

/// Gross margin as a percentage of the selling price
pub fn gross_margin_percentage(dish: &Dish) -> DomainResult<Decimal> {
    let selling_price = match dish.selling_price {
        Some(price) if !price.is_zero() => price,
        _ => {
            return Err(DomainError::InvalidState(format!(
                "Selling price is unset or zero for dish '{}'",
                dish.name
            )))
        }
    };

    percentage(dish, gross_margin(dish)?, selling_price)
}

/// Build the costing report for a dish.
///
/// Fails when the cost itself cannot be computed or a figure overflows; an
/// unpriced dish simply has no margin figures.
pub fn evaluate(dish: &Dish) -> DomainResult<DishCosting> {
    let cost = dish_cost(dish)?;

    let gross_margin = dish
        .selling_price
        .map(|price| margin(dish, price, cost))
        .transpose()?;
    let gross_margin_percentage = match (dish.selling_price, gross_margin) {
        (Some(price), Some(m)) if !price.is_zero() => Some(percentage(dish, m, price)?),
        _ => None,
    };

    Ok(DishCosting {
        dish_id: dish.id,
        dish_name: dish.name.clone(),
        cost,
        selling_price: dish.selling_price,
        gross_margin,
        gross_margin_percentage,
    })
}

fn margin(dish: &Dish, selling_price: Decimal, cost: Decimal) -> DomainResult<Decimal> {
    selling_price
        .checked_sub(cost)
        .ok_or_else(|| out_of_range(dish, "gross margin"))
}

/// Caller guarantees a non-zero selling price
fn percentage(dish: &Dish, margin: Decimal, selling_price: Decimal) -> DomainResult<Decimal> {
    margin
        .checked_div(selling_price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| out_of_range(dish, "gross margin percentage"))
}

fn out_of_range(dish: &Dish, figure: &str) -> DomainError {
    DomainError::InvalidState(format!(
        "The {} of dish '{}' is out of the representable range",
        figure, dish.name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dish::{DishType, RecipeLine};
    use crate::domain::ingredient::{Category, Ingredient};

    fn pizza() -> Dish {
        let tomato = Ingredient::new("Tomato", Category::Vegetable, Decimal::from(500)).with_id(1);
        let cheese = Ingredient::new("Cheese", Category::Dairy, Decimal::from(1200)).with_id(2);

        let mut dish = Dish::new("Pizza", DishType::Main).with_selling_price(Decimal::from(15000));
        dish.add_ingredient(tomato, Decimal::from(2), Some("PCS"));
        dish.add_ingredient(cheese, Decimal::from(200), Some("GRAM"));
        dish
    }

    #[test]
    fn test_pizza_cost_and_margin() {
        let dish = pizza();
        assert_eq!(dish_cost(&dish).unwrap(), Decimal::from(241000));
        assert_eq!(gross_margin(&dish).unwrap(), Decimal::from(-226000));
        assert_eq!(
            gross_margin_percentage(&dish).unwrap().round_dp(2),
            Decimal::new(-150667, 2)
        );
    }

    #[test]
    fn test_empty_recipe_costs_nothing() {
        let dish = Dish::new("Water", DishType::Start).with_selling_price(Decimal::from(200));
        assert_eq!(dish_cost(&dish).unwrap(), Decimal::ZERO);
        assert_eq!(gross_margin(&dish).unwrap(), Decimal::from(200));
        assert_eq!(gross_margin_percentage(&dish).unwrap(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_fractional_quantities_are_exact() {
        let flour = Ingredient::new("Flour", Category::Other, Decimal::new(12, 1)).with_id(9);
        let mut dish = Dish::new("Crepe", DishType::Dessert).with_selling_price(Decimal::from(6));
        dish.add_ingredient(flour, Decimal::new(25, 2), Some("KG"));

        assert_eq!(dish_cost(&dish).unwrap(), Decimal::new(3, 1));
        assert_eq!(gross_margin_percentage(&dish).unwrap(), Decimal::from(95));
    }

    #[test]
    fn test_unpriced_dish_has_no_margin() {
        let mut dish = pizza();
        dish.selling_price = None;

        assert_eq!(dish_cost(&dish).unwrap(), Decimal::from(241000));
        assert!(matches!(gross_margin(&dish), Err(DomainError::InvalidState(_))));
        assert!(matches!(
            gross_margin_percentage(&dish),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_zero_selling_price_rejects_percentage() {
        let dish = pizza().with_selling_price(Decimal::ZERO);
        assert_eq!(gross_margin(&dish).unwrap(), Decimal::from(-241000));
        assert!(matches!(
            gross_margin_percentage(&dish),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_missing_price_or_quantity_is_invalid_state() {
        let mut dish = pizza();
        dish.recipe[0].ingredient.price = None;
        assert!(matches!(dish_cost(&dish), Err(DomainError::InvalidState(_))));

        let mut dish = pizza();
        dish.recipe.push(RecipeLine::new(
            Ingredient::new("Basil", Category::Vegetable, Decimal::ONE).with_id(3),
            None,
            None,
        ));
        let err = dish_cost(&dish).unwrap_err();
        assert!(err.to_string().contains("Basil"));
    }

    #[test]
    fn test_overflowing_figures_are_invalid_state() {
        let truffle = Ingredient::new("Truffle", Category::Other, Decimal::MAX).with_id(7);
        let mut dish = Dish::new("Excess", DishType::Main).with_selling_price(Decimal::ONE);
        dish.add_ingredient(truffle, Decimal::from(2), None);

        assert!(matches!(dish_cost(&dish), Err(DomainError::InvalidState(_))));
        assert!(matches!(evaluate(&dish), Err(DomainError::InvalidState(_))));

        let mut dish = Dish::new("Negative", DishType::Main).with_selling_price(Decimal::MIN);
        let salt = Ingredient::new("Salt", Category::Other, Decimal::MAX).with_id(8);
        dish.add_ingredient(salt, Decimal::ONE, None);

        assert_eq!(dish_cost(&dish).unwrap(), Decimal::MAX);
        assert!(matches!(gross_margin(&dish), Err(DomainError::InvalidState(_))));
        assert!(matches!(evaluate(&dish), Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn test_evaluate_report() {
        let report = evaluate(&pizza()).unwrap();
        assert_eq!(report.dish_name, "Pizza");
        assert_eq!(report.cost, Decimal::from(241000));
        assert_eq!(report.gross_margin, Some(Decimal::from(-226000)));
        assert!(report.gross_margin_percentage.is_some());

        let mut unpriced = pizza();
        unpriced.selling_price = None;
        let report = evaluate(&unpriced).unwrap();
        assert_eq!(report.gross_margin, None);
        assert_eq!(report.gross_margin_percentage, None);
    }
}
