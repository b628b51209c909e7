//! Shared nutrient data structure
//!
//! Used across food records, diary entries, favorites, and daily totals.

use serde::{Deserialize, Serialize};

use crate::nutrition::rounding::round_to_storage;

/// Energy and macronutrient amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default)]
    pub kcal: f64,
    #[serde(default)]
    pub protein: f64, // grams
    #[serde(default)]
    pub fat: f64,     // grams
    #[serde(default)]
    pub carb: f64,    // grams
}

impl Macros {
    pub fn new(kcal: f64, protein: f64, fat: f64, carb: f64) -> Self {
        Self { kcal, protein, fat, carb }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            kcal: self.kcal * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
            carb: self.carb * multiplier,
        }
    }

    pub fn add(&self, other: &Macros) -> Self {
        Self {
            kcal: self.kcal + other.kcal,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            carb: self.carb + other.carb,
        }
    }

    /// True when every field is finite and non-negative
    pub fn is_valid(&self) -> bool {
        [self.kcal, self.protein, self.fat, self.carb]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Replace malformed fields (NaN, infinite, negative) with zero
    pub fn sanitized(&self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            kcal: clean(self.kcal),
            protein: clean(self.protein),
            fat: clean(self.fat),
            carb: clean(self.carb),
        }
    }

    /// Round every field to storage precision
    pub fn rounded(&self) -> Self {
        Self {
            kcal: round_to_storage(self.kcal),
            protein: round_to_storage(self.protein),
            fat: round_to_storage(self.fat),
            carb: round_to_storage(self.carb),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_zeroes_bad_fields() {
        let m = Macros::new(f64::NAN, -3.0, f64::INFINITY, 12.5).sanitized();
        assert_eq!(m, Macros::new(0.0, 0.0, 0.0, 12.5));
    }

    #[test]
    fn test_rounded() {
        let m = Macros::new(195.004, 4.056, 0.449_999, 42.0).rounded();
        assert_eq!(m.kcal, 195.0);
        assert_eq!(m.protein, 4.06);
        assert_eq!(m.fat, 0.45);
        assert_eq!(m.carb, 42.0);
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let m: Macros = serde_json::from_str(r#"{"kcal": 120.5}"#).unwrap();
        assert_eq!(m, Macros::new(120.5, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_sum() {
        let total: Macros = vec![Macros::new(1.0, 2.0, 3.0, 4.0), Macros::new(1.0, 1.0, 1.0, 1.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Macros::new(2.0, 3.0, 4.0, 5.0));
    }
}
