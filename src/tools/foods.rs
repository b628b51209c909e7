//! Food MCP Tools
//!
//! Food lookup and serving scaling.

use serde::Serialize;

use crate::lookup::{FoodResolver, LookupStage};
use crate::models::Macros;
use crate::nutrition::{scale_serving, FoodRecord};

/// Response for search_food
#[derive(Debug, Serialize)]
pub struct SearchFoodResponse {
    pub term: String,
    pub stage: LookupStage,
    pub results: Vec<FoodRecord>,
    pub count: usize,
}

/// Response for scale_food
#[derive(Debug, Serialize)]
pub struct ScaleFoodResponse {
    pub name: String,
    pub quantity: f64,
    pub unit: &'static str,
    pub nutrition: Macros,
}

/// Look a food up locally, then remotely
pub async fn search_food(resolver: &FoodResolver, term: &str) -> Result<SearchFoodResponse, String> {
    let term = term.trim();
    if term.is_empty() {
        return Err("Search term must not be empty".to_string());
    }

    let outcome = resolver.resolve(term).await;

    Ok(SearchFoodResponse {
        term: term.to_string(),
        stage: outcome.stage,
        count: outcome.results.len(),
        results: outcome.results,
    })
}

/// Nutrients for a consumed quantity of a food
pub fn scale_food(food: &FoodRecord, quantity: f64) -> Result<ScaleFoodResponse, String> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(format!("Quantity must be a positive number, got {}", quantity));
    }

    Ok(ScaleFoodResponse {
        name: food.name.clone(),
        quantity,
        unit: food.unit.symbol(),
        nutrition: scale_serving(food, quantity).rounded(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::ServingUnit;

    #[tokio::test]
    async fn test_search_local_hit() {
        let response = search_food(&FoodResolver::local_only(), " Ryż biały ").await.unwrap();
        assert_eq!(response.stage, LookupStage::Local);
        assert_eq!(response.count, 1);
        assert_eq!(response.term, "Ryż biały");
    }

    #[tokio::test]
    async fn test_search_blank_term() {
        assert!(search_food(&FoodResolver::local_only(), "   ").await.is_err());
    }

    #[test]
    fn test_scale_food_rounds() {
        let resolver = FoodResolver::local_only();
        let rice = resolver.local().lookup("ryż biały").unwrap();

        let response = scale_food(rice, 150.0).unwrap();
        assert_eq!(response.nutrition.kcal, 195.0);
        assert_eq!(response.nutrition.protein, 4.05);
        assert_eq!(response.unit, "g");
    }

    #[test]
    fn test_scale_food_items() {
        let egg = FoodRecord::new("jajko", Macros::new(70.0, 6.0, 5.0, 0.5), ServingUnit::Item);
        let response = scale_food(&egg, 2.0).unwrap();
        assert_eq!(response.nutrition.kcal, 140.0);
        assert_eq!(response.unit, "szt.");
    }

    #[test]
    fn test_scale_food_rejects_bad_quantity() {
        let egg = FoodRecord::new("jajko", Macros::new(70.0, 6.0, 5.0, 0.5), ServingUnit::Item);
        assert!(scale_food(&egg, 0.0).is_err());
        assert!(scale_food(&egg, f64::NAN).is_err());
    }
}
