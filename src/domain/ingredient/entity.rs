use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::stock::{stock_level_at, StockMovement};
use crate::domain::DomainError;

/// A priced, categorized raw material with its stock history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Identifier, immutable once persisted (allocated on save when absent)
    pub id: Option<i64>,

    pub name: String,

    pub category: Category,

    /// Unit price, currency agnostic
    pub price: Option<Decimal>,

    /// Ledger ordered by creation time ascending
    #[serde(default)]
    pub stock_movements: Vec<StockMovement>,
}

/// Fixed set of ingredient categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Vegetable,
    Animal,
    Marine,
    Dairy,
    Other,
}

impl Ingredient {
    /// Create a new, not yet persisted ingredient
    pub fn new(name: impl Into<String>, category: Category, price: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            category,
            price: Some(price),
            stock_movements: Vec::new(),
        }
    }

    /// Same ingredient with a caller-chosen identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Append a movement to the in-memory ledger; it is persisted on the next save
    pub fn record_movement(&mut self, movement: StockMovement) {
        self.stock_movements.push(movement);
    }

    /// Stock level at `at`, movements at exactly `at` included
    pub fn stock_at(&self, at: DateTime<Utc>) -> Decimal {
        stock_level_at(&self.stock_movements, Some(at))
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetable => "VEGETABLE",
            Category::Animal => "ANIMAL",
            Category::Marine => "MARINE",
            Category::Dairy => "DAIRY",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VEGETABLE" => Ok(Category::Vegetable),
            "ANIMAL" => Ok(Category::Animal),
            "MARINE" => Ok(Category::Marine),
            "DAIRY" => Ok(Category::Dairy),
            "OTHER" => Ok(Category::Other),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown ingredient category '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::Unit;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_stock_at_uses_recorded_movements() {
        let t = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let mut tomato = Ingredient::new("Tomato", Category::Vegetable, Decimal::from(500));
        tomato.record_movement(StockMovement::inbound(Decimal::from(40), Unit::Kg, t));
        tomato.record_movement(StockMovement::outbound(
            Decimal::new(125, 1),
            Unit::Kg,
            t + Duration::hours(3),
        ));

        assert_eq!(tomato.stock_at(t - Duration::minutes(1)), Decimal::ZERO);
        assert_eq!(tomato.stock_at(t + Duration::hours(1)), Decimal::from(40));
        assert_eq!(tomato.stock_at(t + Duration::hours(3)), Decimal::new(275, 1));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("DAIRY".parse::<Category>().unwrap(), Category::Dairy);
        assert!("dairy".parse::<Category>().is_err());
    }
}
