//! Serving scaler
//!
//! Turns a food record's reference values (per 100 g, per 100 ml, or per
//! item) plus a consumed quantity into absolute nutrient totals.

use serde::{Deserialize, Serialize};

use crate::models::Macros;

/// Reference unit of a food record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServingUnit {
    /// Values per 100 grams
    #[default]
    Gram,
    /// Values per 100 milliliters
    Milliliter,
    /// Values per single item
    Item,
}

impl ServingUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServingUnit::Gram => "gram",
            ServingUnit::Milliliter => "milliliter",
            ServingUnit::Item => "item",
        }
    }

    /// Short label used in generated meal names
    pub fn symbol(&self) -> &'static str {
        match self {
            ServingUnit::Gram => "g",
            ServingUnit::Milliliter => "ml",
            ServingUnit::Item => "szt.",
        }
    }

    /// Parse a unit tag; the set of units is closed
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(ServingUnit::Gram),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(ServingUnit::Milliliter)
            }
            "item" | "items" | "szt" | "szt." | "each" | "count" | "piece" | "pieces" => {
                Some(ServingUnit::Item)
            }
            _ => None,
        }
    }

    /// Whether reference values are per 100 units
    pub fn is_per_100(&self) -> bool {
        matches!(self, ServingUnit::Gram | ServingUnit::Milliliter)
    }

    /// Multiplier applied to reference values for a consumed quantity
    pub fn multiplier(&self, quantity: f64) -> f64 {
        if self.is_per_100() {
            quantity / 100.0
        } else {
            quantity
        }
    }
}

/// Where a food record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FoodSource {
    #[default]
    Local,
    Remote,
}

/// A food with reference nutrient values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Values per 100 g/ml, or per item when `unit` is `Item`
    pub nutrients: Macros,
    pub unit: ServingUnit,
    #[serde(default)]
    pub source: FoodSource,
}

impl FoodRecord {
    pub fn new(name: impl Into<String>, nutrients: Macros, unit: ServingUnit) -> Self {
        Self {
            name: name.into(),
            brand: None,
            nutrients,
            unit,
            source: FoodSource::Local,
        }
    }
}

/// Absolute nutrients for `quantity` of `food`. Not rounded.
pub fn scale_serving(food: &FoodRecord, quantity: f64) -> Macros {
    food.nutrients.scale(food.unit.multiplier(quantity))
}
