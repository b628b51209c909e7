//! Meal builder
//!
//! Combines several scaled ingredients into one loggable meal.

use serde::{Deserialize, Serialize};

use super::serving::{scale_serving, FoodRecord, ServingUnit};
use crate::models::Macros;

/// One ingredient of a meal: a food record plus the amount eaten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub food: FoodRecord,
    pub quantity: f64,
}

impl Ingredient {
    pub fn new(food: FoodRecord, quantity: f64) -> Self {
        Self { food, quantity }
    }

    pub fn totals(&self) -> Macros {
        scale_serving(&self.food, self.quantity)
    }

    /// Label such as "ryż biały (150g)" or "jajko (x2)"
    pub fn label(&self) -> String {
        match self.food.unit {
            ServingUnit::Item => format!("{} (x{})", self.food.name, self.quantity),
            unit => format!("{} ({}{})", self.food.name, self.quantity, unit.symbol()),
        }
    }
}

/// A finished meal ready to be logged or saved as a favorite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltMeal {
    pub name: String,
    pub nutrition: Macros,
}

#[derive(Debug, Clone, Default)]
pub struct MealBuilder {
    name: Option<String>,
    ingredients: Vec<Ingredient>,
}

impl MealBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the meal name; blank names are ignored
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
        self
    }

    pub fn ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn push(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
    }

    pub fn remove(&mut self, index: usize) -> Option<Ingredient> {
        if index < self.ingredients.len() {
            Some(self.ingredients.remove(index))
        } else {
            None
        }
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn totals(&self) -> Macros {
        self.ingredients.iter().map(Ingredient::totals).sum()
    }

    /// Explicit name, or the ingredient labels joined with ", "
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .ingredients
                .iter()
                .map(Ingredient::label)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// `None` when there is nothing to log
    pub fn build(&self) -> Option<BuiltMeal> {
        if self.is_empty() {
            return None;
        }
        Some(BuiltMeal {
            name: self.display_name(),
            nutrition: self.totals(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> FoodRecord {
        FoodRecord::new("ryż biały", Macros::new(130.0, 2.7, 0.3, 28.0), ServingUnit::Gram)
    }

    fn egg() -> FoodRecord {
        FoodRecord::new("jajko", Macros::new(70.0, 6.0, 5.0, 0.5), ServingUnit::Item)
    }

    #[test]
    fn test_empty_builder_builds_nothing() {
        assert!(MealBuilder::new().name("Obiad").build().is_none());
    }

    #[test]
    fn test_totals_sum_scaled_ingredients() {
        let meal = MealBuilder::new()
            .ingredient(Ingredient::new(rice(), 150.0))
            .ingredient(Ingredient::new(egg(), 2.0))
            .build()
            .unwrap();
        assert!((meal.nutrition.kcal - 335.0).abs() < 1e-9);
        assert!((meal.nutrition.protein - 16.05).abs() < 1e-9);
    }

    #[test]
    fn test_generated_name() {
        let milk = FoodRecord::new("mleko 2%", Macros::new(50.0, 3.4, 2.0, 4.8), ServingUnit::Milliliter);
        let builder = MealBuilder::new()
            .name("   ")
            .ingredient(Ingredient::new(rice(), 150.0))
            .ingredient(Ingredient::new(egg(), 1.5))
            .ingredient(Ingredient::new(milk, 250.0));
        assert_eq!(
            builder.display_name(),
            "ryż biały (150g), jajko (x1.5), mleko 2% (250ml)"
        );
    }

    #[test]
    fn test_explicit_name_wins() {
        let meal = MealBuilder::new()
            .name(" Śniadanie ")
            .ingredient(Ingredient::new(egg(), 2.0))
            .build()
            .unwrap();
        assert_eq!(meal.name, "Śniadanie");
    }

    #[test]
    fn test_remove_ingredient() {
        let mut builder = MealBuilder::new();
        builder.push(Ingredient::new(rice(), 100.0));
        builder.push(Ingredient::new(egg(), 1.0));
        assert!(builder.remove(5).is_none());
        let removed = builder.remove(0).unwrap();
        assert_eq!(removed.food.name, "ryż biały");
        assert_eq!(builder.ingredients().len(), 1);
    }
}
