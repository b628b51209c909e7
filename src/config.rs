//! Configuration
//!
//! Engine constants (activity multipliers, macro split, caloric densities)
//! and runtime settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

// ============================================================================
// Engine Constants
// ============================================================================

/// Activity multipliers applied to BMR
pub const MULTIPLIER_SEDENTARY: f64 = 1.2;
pub const MULTIPLIER_LIGHT: f64 = 1.375;
pub const MULTIPLIER_MODERATE: f64 = 1.55;
pub const MULTIPLIER_ACTIVE: f64 = 1.725;
pub const MULTIPLIER_VERY_ACTIVE: f64 = 1.9;

/// Share of daily energy from each macronutrient
pub const PROTEIN_ENERGY_SHARE: f64 = 0.25;
pub const FAT_ENERGY_SHARE: f64 = 0.30;
pub const CARB_ENERGY_SHARE: f64 = 0.45;

/// Kilocalories per gram
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;
pub const KCAL_PER_G_CARB: f64 = 4.0;

/// Decimal places kept when persisting or displaying nutrient values
pub const STORAGE_DECIMALS: i32 = 2;

/// Adherence band edges (percent of target)
pub const UNDER_TARGET_BELOW: f64 = 80.0;
pub const OVER_TARGET_ABOVE: f64 = 105.0;

/// Energy target used before any profile is recorded
pub const DEFAULT_ENERGY_TARGET: i64 = 2000;

/// Remote lookup limits
pub const MIN_LOOKUP_TERM_LEN: usize = 3;
pub const MAX_LOOKUP_RESULTS: usize = 5;

pub const DEFAULT_LOOKUP_URL: &str = "https://pl.openfoodfacts.org/cgi/search.pl";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_USER: &str = "local";

/// Macronutrient split and caloric densities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_share: f64,
    pub fat_share: f64,
    pub carb_share: f64,
    pub protein_kcal_per_g: f64,
    pub fat_kcal_per_g: f64,
    pub carb_kcal_per_g: f64,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein_share: PROTEIN_ENERGY_SHARE,
            fat_share: FAT_ENERGY_SHARE,
            carb_share: CARB_ENERGY_SHARE,
            protein_kcal_per_g: KCAL_PER_G_PROTEIN,
            fat_kcal_per_g: KCAL_PER_G_FAT,
            carb_kcal_per_g: KCAL_PER_G_CARB,
        }
    }
}

/// Activity multipliers keyed by level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityMultipliers {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

impl Default for ActivityMultipliers {
    fn default() -> Self {
        Self {
            sedentary: MULTIPLIER_SEDENTARY,
            light: MULTIPLIER_LIGHT,
            moderate: MULTIPLIER_MODERATE,
            active: MULTIPLIER_ACTIVE,
            very_active: MULTIPLIER_VERY_ACTIVE,
        }
    }
}

/// All tunable engine constants in one place
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionConfig {
    pub activity: ActivityMultipliers,
    pub macros: MacroSplit,
    pub under_target_below: f64,
    pub over_target_above: f64,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            activity: ActivityMultipliers::default(),
            macros: MacroSplit::default(),
            under_target_below: UNDER_TARGET_BELOW,
            over_target_above: OVER_TARGET_ABOVE,
        }
    }
}

// ============================================================================
// Runtime Settings
// ============================================================================

/// Runtime settings for the server and utility binaries
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub user_id: String,
    pub lookup_url: String,
    pub lookup_timeout: Duration,
    pub default_energy_target: i64,
    pub nutrition: NutritionConfig,
}

impl Config {
    /// Build from `NUTRILOG_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();

        Self {
            database_path: get_database_path(),
            user_id: parse_user(var("NUTRILOG_USER").as_deref()),
            lookup_url: var("NUTRILOG_LOOKUP_URL").unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string()),
            lookup_timeout: parse_lookup_timeout(var("NUTRILOG_LOOKUP_TIMEOUT_SECS").as_deref()),
            default_energy_target: parse_default_target(var("NUTRILOG_DEFAULT_TARGET").as_deref()),
            nutrition: NutritionConfig::default(),
        }
    }
}

/// Blank or missing user ids become the default user
fn parse_user(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_USER)
        .to_string()
}

fn parse_lookup_timeout(value: Option<&str>) -> Duration {
    let secs = value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Only positive targets are accepted
fn parse_default_target(value: Option<&str>) -> i64 {
    value
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|t| *t > 0)
        .unwrap_or(DEFAULT_ENERGY_TARGET)
}

/// Get the database path from environment or use default
pub fn get_database_path() -> PathBuf {
    std::env::var("NUTRILOG_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutrilog.db");
            path
        })
}
