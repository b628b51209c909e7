//! Profile calculator
//!
//! Converts body metrics into a daily energy target (Mifflin-St Jeor BMR
//! scaled by activity) and splits that target into macro targets.

use serde::{Deserialize, Serialize};

use crate::config::{ActivityMultipliers, MacroSplit, NutritionConfig};

/// Biological sex used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    #[default]
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Anything other than "male" is treated as female
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Sex::Male,
            _ => Sex::Female,
        }
    }

    /// Sex-specific BMR offset in kcal
    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

/// Physical activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Unknown levels fall back to sedentary
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" | "very active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    pub fn multiplier(&self, table: &ActivityMultipliers) -> f64 {
        match self {
            ActivityLevel::Sedentary => table.sedentary,
            ActivityLevel::Light => table.light,
            ActivityLevel::Moderate => table.moderate,
            ActivityLevel::Active => table.active,
            ActivityLevel::VeryActive => table.very_active,
        }
    }
}

/// Body metrics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl BodyProfile {
    pub fn energy_target(&self) -> i64 {
        calculate_energy_target(
            self.weight_kg,
            self.height_cm,
            self.age_years,
            self.sex,
            self.activity_level,
        )
    }

    pub fn macro_targets(&self) -> MacroTargets {
        calculate_macro_targets(self.energy_target())
    }
}

/// Daily macronutrient targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
}

impl MacroTargets {
    /// Energy implied by the gram targets
    pub fn implied_kcal(&self, split: &MacroSplit) -> f64 {
        self.protein_g as f64 * split.protein_kcal_per_g
            + self.fat_g as f64 * split.fat_kcal_per_g
            + self.carb_g as f64 * split.carb_kcal_per_g
    }
}

/// Basal metabolic rate (Mifflin-St Jeor), unrounded
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64 + sex.bmr_offset()
}

/// Daily energy target in kcal using the default constants
pub fn calculate_energy_target(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: Sex,
    activity_level: ActivityLevel,
) -> i64 {
    calculate_energy_target_with(
        &NutritionConfig::default(),
        weight_kg,
        height_cm,
        age_years,
        sex,
        activity_level,
    )
}

pub fn calculate_energy_target_with(
    config: &NutritionConfig,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: Sex,
    activity_level: ActivityLevel,
) -> i64 {
    let bmr = basal_metabolic_rate(weight_kg, height_cm, age_years, sex);
    (bmr * activity_level.multiplier(&config.activity)).round() as i64
}

/// Macro targets for an energy target using the default split
pub fn calculate_macro_targets(energy_target_kcal: i64) -> MacroTargets {
    calculate_macro_targets_with(&MacroSplit::default(), energy_target_kcal)
}

pub fn calculate_macro_targets_with(split: &MacroSplit, energy_target_kcal: i64) -> MacroTargets {
    let kcal = energy_target_kcal as f64;
    MacroTargets {
        protein_g: (kcal * split.protein_share / split.protein_kcal_per_g).round() as i64,
        fat_g: (kcal * split.fat_share / split.fat_kcal_per_g).round() as i64,
        carb_g: (kcal * split.carb_share / split.carb_kcal_per_g).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_male_moderate() {
        let bmr = basal_metabolic_rate(70.0, 175.0, 30, Sex::Male);
        assert!((bmr - 1648.75).abs() < 1e-9);

        let tdee = calculate_energy_target(70.0, 175.0, 30, Sex::Male, ActivityLevel::Moderate);
        assert_eq!(tdee, 2556);

        let macros = calculate_macro_targets(tdee);
        assert_eq!(macros, MacroTargets { protein_g: 160, fat_g: 85, carb_g: 288 });
        assert!((macros.implied_kcal(&MacroSplit::default()) - 2556.0).abs() <= 3.0);
    }

    #[test]
    fn test_female_offset() {
        let male = basal_metabolic_rate(60.0, 165.0, 25, Sex::Male);
        let female = basal_metabolic_rate(60.0, 165.0, 25, Sex::Female);
        assert!((male - female - 166.0).abs() < 1e-9);
        assert_eq!(
            calculate_energy_target(60.0, 165.0, 25, Sex::Female, ActivityLevel::Sedentary),
            1614
        );
    }

    #[test]
    fn test_unknown_activity_defaults_to_sedentary() {
        assert_eq!(ActivityLevel::from_str("couch"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str(""), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str("VERY_ACTIVE"), ActivityLevel::VeryActive);
        assert_eq!(
            ActivityLevel::from_str("unknown").multiplier(&ActivityMultipliers::default()),
            1.2
        );
    }

    #[test]
    fn test_zero_inputs_are_not_rejected() {
        // Meaningless but well-defined
        let tdee = calculate_energy_target(0.0, 0.0, 0, Sex::Female, ActivityLevel::Sedentary);
        assert_eq!(tdee, (-161.0f64 * 1.2).round() as i64);
    }

    #[test]
    fn test_macro_targets_non_negative_and_close_to_target() {
        let split = MacroSplit::default();
        // Each gram target is off by at most half a gram
        let bound = 0.5 * (split.protein_kcal_per_g + split.fat_kcal_per_g + split.carb_kcal_per_g);

        for weight in [45.0, 60.0, 75.5, 90.0, 120.0] {
            for height in [150.0, 168.0, 185.0, 200.0] {
                for age in [18, 30, 47, 65, 80] {
                    for sex in [Sex::Male, Sex::Female] {
                        for level in [
                            ActivityLevel::Sedentary,
                            ActivityLevel::Light,
                            ActivityLevel::Moderate,
                            ActivityLevel::Active,
                            ActivityLevel::VeryActive,
                        ] {
                            let target = calculate_energy_target(weight, height, age, sex, level);
                            let m = calculate_macro_targets(target);
                            assert!(m.protein_g >= 0 && m.fat_g >= 0 && m.carb_g >= 0);
                            assert!((m.implied_kcal(&split) - target as f64).abs() <= bound);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_custom_split() {
        let split = MacroSplit {
            protein_share: 0.30,
            fat_share: 0.30,
            carb_share: 0.40,
            ..MacroSplit::default()
        };
        let m = calculate_macro_targets_with(&split, 2000);
        assert_eq!(m, MacroTargets { protein_g: 150, fat_g: 67, carb_g: 200 });
    }

    #[test]
    fn test_profile_methods() {
        let profile = BodyProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
        };
        assert_eq!(profile.energy_target(), 2556);
        assert_eq!(profile.macro_targets().carb_g, 288);
    }
}
