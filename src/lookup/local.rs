//! Built-in food table
//!
//! A small dictionary of common foods matched by exact, case-insensitive name.

use std::collections::HashMap;

use crate::models::Macros;
use crate::nutrition::{FoodRecord, FoodSource, ServingUnit};

/// (name, kcal, protein, fat, carb, unit) per 100 g/ml or per item
const BUILTIN_FOODS: &[(&str, f64, f64, f64, f64, ServingUnit)] = &[
    ("jajka", 155.0, 13.0, 11.0, 1.1, ServingUnit::Gram),
    ("jajko", 70.0, 6.0, 5.0, 0.5, ServingUnit::Item),
    ("pierś z kurczaka", 165.0, 31.0, 3.6, 0.0, ServingUnit::Gram),
    ("ryż biały", 130.0, 2.7, 0.3, 28.0, ServingUnit::Gram),
    ("chleb razowy", 250.0, 9.0, 1.5, 50.0, ServingUnit::Gram),
    ("banan", 89.0, 1.1, 0.3, 23.0, ServingUnit::Gram),
    ("jabłko", 52.0, 0.3, 0.2, 14.0, ServingUnit::Gram),
    ("mleko 2%", 50.0, 3.4, 2.0, 4.8, ServingUnit::Milliliter),
    ("płatki owsiane", 389.0, 16.9, 6.9, 66.0, ServingUnit::Gram),
    ("twaróg półtłusty", 133.0, 18.0, 4.0, 3.5, ServingUnit::Gram),
    ("oliwa z oliwek", 884.0, 0.0, 100.0, 0.0, ServingUnit::Milliliter),
];

/// Local reference table keyed by lowercase name
#[derive(Debug, Clone)]
pub struct LocalFoodTable {
    foods: HashMap<String, FoodRecord>,
}

impl Default for LocalFoodTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocalFoodTable {
    pub fn builtin() -> Self {
        Self::from_records(BUILTIN_FOODS.iter().map(|&(name, kcal, protein, fat, carb, unit)| {
            FoodRecord::new(name, Macros::new(kcal, protein, fat, carb), unit)
        }))
    }

    pub fn from_records<I: IntoIterator<Item = FoodRecord>>(records: I) -> Self {
        let foods = records
            .into_iter()
            .map(|mut record| {
                record.source = FoodSource::Local;
                (normalize(&record.name), record)
            })
            .collect();
        Self { foods }
    }

    /// Exact match after trimming and lowercasing
    pub fn lookup(&self, name: &str) -> Option<&FoodRecord> {
        self.foods.get(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = LocalFoodTable::builtin();
        assert_eq!(table.len(), 11);

        let rice = table.lookup("ryż biały").unwrap();
        assert_eq!(rice.nutrients.kcal, 130.0);
        assert_eq!(rice.unit, ServingUnit::Gram);

        assert_eq!(table.lookup("jajko").unwrap().unit, ServingUnit::Item);
        assert_eq!(table.lookup("mleko 2%").unwrap().unit, ServingUnit::Milliliter);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_exact() {
        let table = LocalFoodTable::builtin();
        assert!(table.lookup("  RYŻ BIAŁY ").is_some());
        assert!(table.lookup("Jabłko").is_some());
        assert!(table.lookup("ryż").is_none());
        assert!(table.lookup("ryż biały brązowy").is_none());
    }
}
