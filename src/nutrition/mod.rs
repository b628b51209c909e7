//! Nutrition engine
//!
//! Pure calculations: energy and macro targets, serving scaling, and
//! aggregation of logged entries. Nothing here touches the database.

pub mod aggregate;
pub mod meal_builder;
pub mod profile;
pub mod rounding;
pub mod serving;

pub use aggregate::{
    adherence_ratio, aggregate_entries, classify_adherence, compute_adherence, group_by_date,
    macro_progress, remaining_kcal, summarize_day, AdherenceBand, DailySummary, DailyTotals,
    DayBucket, MacroProgress,
};
pub use meal_builder::{BuiltMeal, Ingredient, MealBuilder};
pub use profile::{
    basal_metabolic_rate, calculate_energy_target, calculate_energy_target_with,
    calculate_macro_targets, calculate_macro_targets_with, ActivityLevel, BodyProfile,
    MacroTargets, Sex,
};
pub use rounding::round_to_storage;
pub use serving::{scale_serving, FoodRecord, FoodSource, ServingUnit};
