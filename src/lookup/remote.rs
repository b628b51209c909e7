//! Remote food lookup
//!
//! Searches the OpenFoodFacts product database. Every product is reported
//! per 100 g.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{LookupError, RemoteFoodSource};
use crate::config::MAX_LOOKUP_RESULTS;
use crate::models::Macros;
use crate::nutrition::{FoodRecord, FoodSource, ServingUnit};

/// OpenFoodFacts search client
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    client: reqwest::Client,
    url: String,
    page_size: usize,
}

impl OpenFoodFactsClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nutrilog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            page_size: MAX_LOOKUP_RESULTS,
        })
    }
}

#[async_trait]
impl RemoteFoodSource for OpenFoodFactsClient {
    async fn search(&self, term: &str) -> Result<Vec<FoodRecord>, LookupError> {
        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("search_terms", term),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        Ok(parse_products(&body))
    }
}

/// Map an OpenFoodFacts search response to food records.
///
/// Missing nutrients become 0. Products without a name are skipped; calorie
/// filtering is left to the resolver.
pub fn parse_products(body: &Value) -> Vec<FoodRecord> {
    let products = match body.get("products").and_then(Value::as_array) {
        Some(products) => products,
        None => return Vec::new(),
    };

    products
        .iter()
        .filter_map(|product| {
            let name = product
                .get("product_name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())?;

            let brand = product
                .get("brands")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            let nutriments = product.get("nutriments");
            let nutrient = |key: &str| nutriments.and_then(|n| n.get(key)).map(number).unwrap_or(0.0);

            Some(FoodRecord {
                name: name.to_string(),
                brand,
                nutrients: Macros::new(
                    nutrient("energy-kcal_100g"),
                    nutrient("proteins_100g"),
                    nutrient("fat_100g"),
                    nutrient("carbohydrates_100g"),
                ),
                unit: ServingUnit::Gram,
                source: FoodSource::Remote,
            })
        })
        .collect()
}

/// Numbers sometimes arrive as strings
fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().replace(',', ".").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
