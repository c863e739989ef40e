use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::costing;
use crate::domain::ingredient::Ingredient;
use crate::domain::{DomainError, DomainResult};

/// Unit recorded for a recipe line that does not specify one
pub const DEFAULT_RECIPE_UNIT: &str = "unit";

/// A sellable item composed of a recipe of ingredient quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    /// Identifier (allocated on save when absent)
    pub id: Option<i64>,

    pub name: String,

    pub dish_type: DishType,

    /// Absent while the dish has not been priced yet
    pub selling_price: Option<Decimal>,

    /// Order is not significant
    #[serde(default)]
    pub recipe: Vec<RecipeLine>,
}

/// One ingredient of a recipe with the quantity the dish requires.
///
/// The ingredient is a snapshot taken when the recipe was resolved; it is
/// never written back through the dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient: Ingredient,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

/// Course a dish belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DishType {
    Start,
    Main,
    Dessert,
}

impl Dish {
    /// Create a new, unpriced dish with an empty recipe. The name is trimmed.
    pub fn new(name: &str, dish_type: DishType) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            dish_type,
            selling_price: None,
            recipe: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_selling_price(mut self, price: Decimal) -> Self {
        self.selling_price = Some(price);
        self
    }

    pub fn add_ingredient(
        &mut self,
        ingredient: Ingredient,
        quantity: Decimal,
        unit: Option<&str>,
    ) {
        self.recipe.push(RecipeLine {
            ingredient,
            quantity: Some(quantity),
            unit: unit.map(str::to_string),
        });
    }

    /// Remove every line using the ingredient; true if something was removed
    pub fn remove_ingredient(&mut self, ingredient_id: i64) -> bool {
        let before = self.recipe.len();
        self.recipe
            .retain(|line| line.ingredient.id != Some(ingredient_id));
        self.recipe.len() != before
    }

    pub fn recipe_line(&self, ingredient_id: i64) -> Option<&RecipeLine> {
        self.recipe
            .iter()
            .find(|line| line.ingredient.id == Some(ingredient_id))
    }

    /// Case-insensitive lookup by ingredient name
    pub fn contains_ingredient(&self, name: &str) -> bool {
        self.recipe
            .iter()
            .any(|line| line.ingredient.name.eq_ignore_ascii_case(name))
    }

    pub fn ingredient_count(&self) -> usize {
        self.recipe.len()
    }

    pub fn is_valid(&self) -> bool {
        super::invariants::validate_dish(self).is_ok()
    }

    pub fn cost(&self) -> DomainResult<Decimal> {
        costing::dish_cost(self)
    }

    pub fn gross_margin(&self) -> DomainResult<Decimal> {
        costing::gross_margin(self)
    }

    pub fn gross_margin_percentage(&self) -> DomainResult<Decimal> {
        costing::gross_margin_percentage(self)
    }
}

impl RecipeLine {
    pub fn new(ingredient: Ingredient, quantity: Option<Decimal>, unit: Option<String>) -> Self {
        Self {
            ingredient,
            quantity,
            unit,
        }
    }

    /// Quantity as stored: zero when unset
    pub fn stored_quantity(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ZERO)
    }

    /// Unit as stored: the generic unit when unset
    pub fn stored_unit(&self) -> &str {
        self.unit.as_deref().unwrap_or(DEFAULT_RECIPE_UNIT)
    }
}

impl DishType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DishType::Start => "START",
            DishType::Main => "MAIN",
            DishType::Dessert => "DESSERT",
        }
    }
}

impl std::fmt::Display for DishType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DishType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(DishType::Start),
            "MAIN" => Ok(DishType::Main),
            "DESSERT" => Ok(DishType::Dessert),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown dish type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingredient::Category;

    fn ingredient(id: i64, name: &str) -> Ingredient {
        Ingredient::new(name, Category::Vegetable, Decimal::from(100)).with_id(id)
    }

    #[test]
    fn test_new_dish_trims_name() {
        let dish = Dish::new("  Salade fraîche ", DishType::Start);
        assert_eq!(dish.name, "Salade fraîche");
        assert_eq!(dish.selling_price, None);
        assert_eq!(dish.ingredient_count(), 0);
    }

    #[test]
    fn test_recipe_helpers() {
        let mut dish = Dish::new("Ratatouille", DishType::Main);
        dish.add_ingredient(ingredient(1, "Courgette"), Decimal::from(2), Some("PCS"));
        dish.add_ingredient(ingredient(2, "Aubergine"), Decimal::ONE, None);

        assert_eq!(dish.ingredient_count(), 2);
        assert!(dish.contains_ingredient("courgette"));
        assert!(!dish.contains_ingredient("Tomato"));
        assert_eq!(dish.recipe_line(2).map(|l| l.stored_unit()), Some("unit"));

        assert!(dish.remove_ingredient(1));
        assert!(!dish.remove_ingredient(1));
        assert_eq!(dish.ingredient_count(), 1);
    }

    #[test]
    fn test_stored_defaults() {
        let line = RecipeLine::new(ingredient(1, "Basil"), None, None);
        assert_eq!(line.stored_quantity(), Decimal::ZERO);
        assert_eq!(line.stored_unit(), DEFAULT_RECIPE_UNIT);
    }
}
