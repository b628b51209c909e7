//! Diary MCP Tools
//!
//! Tools for logging meals and viewing a single day.

use serde::Serialize;

use super::profile::current_target;
use super::UserContext;
use crate::db::Database;
use crate::models::{
    FavoriteMeal, FavoriteMealCreate, LoggedEntry, LoggedEntryCreate, Macros,
};
use crate::nutrition::{
    calculate_macro_targets_with, macro_progress, round_to_storage, summarize_day,
    AdherenceBand, MacroProgress, MacroTargets, MealBuilder,
};

/// Response for log_meal / log_entry / log_favorite
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub entry: LoggedEntry,
    /// Set when the meal was also saved as a favorite
    pub favorite_id: Option<i64>,
}

/// Full view of one diary day
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: String,
    pub entries: Vec<LoggedEntry>,
    pub totals: Macros,
    pub energy_target: i64,
    pub adherence_percent: f64,
    pub band: AdherenceBand,
    pub remaining_kcal: f64,
    pub macro_targets: MacroTargets,
    pub macro_progress: MacroProgress,
}

/// Response for delete_entry
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub id: i64,
}

/// Log a meal built from ingredients, optionally saving it as a favorite
pub fn log_meal(
    db: &Database,
    ctx: &UserContext,
    date: &str,
    builder: &MealBuilder,
    save_as_favorite: bool,
) -> Result<LogEntryResponse, String> {
    let meal = builder
        .build()
        .ok_or_else(|| "A meal needs at least one ingredient".to_string())?;

    // Entry and favorite commit together or not at all
    let (entry, favorite_id) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let entry = LoggedEntry::create(
                &tx,
                &LoggedEntryCreate {
                    user_id: ctx.user_id.clone(),
                    date: date.to_string(),
                    name: meal.name.clone(),
                    nutrition: meal.nutrition,
                },
            )?;

            let favorite_id = if save_as_favorite {
                let favorite = FavoriteMeal::create(
                    &tx,
                    &FavoriteMealCreate {
                        user_id: ctx.user_id.clone(),
                        name: meal.name.clone(),
                        nutrition: meal.nutrition,
                    },
                )?;
                Some(favorite.id)
            } else {
                None
            };

            tx.commit()?;
            Ok((entry, favorite_id))
        })
        .map_err(|e| format!("Failed to log meal: {}", e))?;

    tracing::info!(date, kcal = entry.nutrition.kcal, "Meal logged");

    Ok(LogEntryResponse { entry, favorite_id })
}

/// Log a meal whose totals are already known
pub fn log_entry(
    db: &Database,
    ctx: &UserContext,
    date: &str,
    name: &str,
    nutrition: Macros,
) -> Result<LogEntryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = LoggedEntry::create(
        &conn,
        &LoggedEntryCreate {
            user_id: ctx.user_id.clone(),
            date: date.to_string(),
            name: name.to_string(),
            nutrition,
        },
    )
    .map_err(|e| format!("Failed to log entry: {}", e))?;

    Ok(LogEntryResponse {
        entry,
        favorite_id: None,
    })
}

/// Entries, totals, and target adherence for one date
pub fn get_day(db: &Database, ctx: &UserContext, date: &str) -> Result<DayView, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (energy_target, _) =
        current_target(&conn, ctx).map_err(|e| format!("Failed to get profile: {}", e))?;

    let entries = LoggedEntry::get_for_date(&conn, &ctx.user_id, date)
        .map_err(|e| format!("Failed to get entries: {}", e))?;

    let summary = summarize_day(date, &entries, energy_target as f64, &ctx.nutrition);
    let macro_targets = calculate_macro_targets_with(&ctx.nutrition.macros, energy_target);
    let progress = macro_progress(&summary.totals, &macro_targets);

    Ok(DayView {
        date: summary.date,
        entries,
        totals: summary.totals.rounded(),
        energy_target,
        adherence_percent: round_to_storage(summary.adherence_percent),
        band: summary.band,
        remaining_kcal: round_to_storage(summary.remaining_kcal),
        macro_targets,
        macro_progress: MacroProgress {
            protein: round_to_storage(progress.protein),
            fat: round_to_storage(progress.fat),
            carb: round_to_storage(progress.carb),
        },
    })
}

/// Delete a diary entry
pub fn delete_entry(db: &Database, ctx: &UserContext, id: i64) -> Result<DeleteEntryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = LoggedEntry::delete(&conn, &ctx.user_id, id)
        .map_err(|e| format!("Failed to delete entry: {}", e))?;

    Ok(DeleteEntryResponse { success, id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LocalFoodTable;
    use crate::nutrition::Ingredient;
    use crate::tools::test_support::database;

    fn breakfast() -> MealBuilder {
        let table = LocalFoodTable::builtin();
        MealBuilder::new()
            .ingredient(Ingredient::new(table.lookup("płatki owsiane").unwrap().clone(), 50.0))
            .ingredient(Ingredient::new(table.lookup("mleko 2%").unwrap().clone(), 200.0))
    }

    #[test]
    fn test_log_meal_generates_name_and_favorite() {
        let db = database();
        let ctx = UserContext::new("u1");

        let response = log_meal(&db, &ctx, "2025-03-01", &breakfast(), true).unwrap();
        assert_eq!(response.entry.name, "płatki owsiane (50g), mleko 2% (200ml)");
        // 389 * 0.5 + 50 * 2
        assert_eq!(response.entry.nutrition.kcal, 294.5);
        assert!(response.favorite_id.is_some());
    }

    #[test]
    fn test_log_empty_meal_fails() {
        let db = database();
        let result = log_meal(&db, &UserContext::default(), "2025-03-01", &MealBuilder::new(), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_meal_rolls_back_when_favorite_fails() {
        let db = database();
        let ctx = UserContext::new("u1");
        db.with_conn(|conn| {
            conn.execute("DROP TABLE favorite_meals", [])?;
            Ok(())
        })
        .unwrap();

        assert!(log_meal(&db, &ctx, "2025-03-01", &breakfast(), true).is_err());
        assert!(get_day(&db, &ctx, "2025-03-01").unwrap().entries.is_empty());
    }

    #[test]
    fn test_get_day_with_default_target() {
        let db = database();
        let ctx = UserContext::new("u1");
        log_entry(&db, &ctx, "2025-03-01", "a", Macros::new(200.0, 10.0, 5.0, 20.0)).unwrap();
        log_entry(&db, &ctx, "2025-03-01", "b", Macros::new(150.0, 5.0, 5.0, 10.0)).unwrap();
        log_entry(&db, &ctx, "2025-03-02", "c", Macros::new(999.0, 0.0, 0.0, 0.0)).unwrap();

        let day = get_day(&db, &ctx, "2025-03-01").unwrap();
        assert_eq!(day.entries.len(), 2);
        assert_eq!(day.entries[0].name, "b");
        assert_eq!(day.totals.kcal, 350.0);
        assert_eq!(day.energy_target, 2000);
        assert_eq!(day.adherence_percent, 17.5);
        assert_eq!(day.band, AdherenceBand::Under);
        assert_eq!(day.remaining_kcal, 1650.0);
        assert_eq!(day.macro_progress.protein, 12.0);
    }

    #[test]
    fn test_empty_day() {
        let db = database();
        let day = get_day(&db, &UserContext::default(), "2025-03-01").unwrap();
        assert!(day.entries.is_empty());
        assert_eq!(day.totals, Macros::zero());
        assert_eq!(day.adherence_percent, 0.0);
    }

    #[test]
    fn test_delete_entry() {
        let db = database();
        let ctx = UserContext::new("u1");
        let logged = log_entry(&db, &ctx, "2025-03-01", "a", Macros::new(1.0, 0.0, 0.0, 0.0)).unwrap();

        assert!(!delete_entry(&db, &UserContext::new("u2"), logged.entry.id).unwrap().success);
        assert!(delete_entry(&db, &ctx, logged.entry.id).unwrap().success);
        assert!(get_day(&db, &ctx, "2025-03-01").unwrap().entries.is_empty());
    }
}
