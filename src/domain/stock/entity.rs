use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// A single inbound or outbound change to an ingredient's stock.
/// Movements are append-only: once written they are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Ledger identifier (allocated on save when absent)
    pub id: Option<i64>,

    /// Owning ingredient, filled in by the store on save
    pub ingredient_id: Option<i64>,

    /// Magnitude of the movement; the sign comes from `movement_type`
    pub quantity: Decimal,

    pub movement_type: MovementType,

    pub unit: Unit,

    pub created_at: DateTime<Utc>,
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    In,
    Out,
}

/// Unit a stock movement is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Pcs,
    Gram,
    Kg,
    L,
    Ml,
}

impl StockMovement {
    pub fn new(
        quantity: Decimal,
        movement_type: MovementType,
        unit: Unit,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            ingredient_id: None,
            quantity,
            movement_type,
            unit,
            created_at,
        }
    }

    pub fn inbound(quantity: Decimal, unit: Unit, created_at: DateTime<Utc>) -> Self {
        Self::new(quantity, MovementType::In, unit, created_at)
    }

    pub fn outbound(quantity: Decimal, unit: Unit, created_at: DateTime<Utc>) -> Self {
        Self::new(quantity, MovementType::Out, unit, created_at)
    }

    /// Attach a caller-chosen ledger identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Contribution of this movement to the stock level
    pub fn signed_quantity(&self) -> Decimal {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out => -self.quantity,
        }
    }
}

/// Stock level reconstructed from a ledger at instant `at`.
///
/// Movements created exactly at `at` are counted. An unset instant or an
/// empty ledger yields zero.
pub fn stock_level_at(movements: &[StockMovement], at: Option<DateTime<Utc>>) -> Decimal {
    let Some(at) = at else {
        return Decimal::ZERO;
    };

    movements
        .iter()
        .filter(|m| m.created_at <= at)
        .map(StockMovement::signed_quantity)
        .sum()
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
        }
    }
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pcs => "PCS",
            Unit::Gram => "GRAM",
            Unit::Kg => "KG",
            Unit::L => "L",
            Unit::Ml => "ML",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(MovementType::In),
            "OUT" => Ok(MovementType::Out),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown movement type '{}'",
                other
            ))),
        }
    }
}

impl FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PCS" => Ok(Unit::Pcs),
            "GRAM" => Ok(Unit::Gram),
            "KG" => Ok(Unit::Kg),
            "L" => Ok(Unit::L),
            "ML" => Ok(Unit::Ml),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown unit '{}'",
                other
            ))),
        }
    }
}
