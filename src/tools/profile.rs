//! Profile MCP Tools
//!
//! Record body metrics and read the resulting energy and macro targets.

use rusqlite::Connection;
use serde::Serialize;

use super::UserContext;
use crate::db::{Database, DbResult};
use crate::models::ProfileSnapshot;
use crate::nutrition::{calculate_macro_targets_with, BodyProfile, MacroTargets};

/// Response for update_profile
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub id: i64,
    pub date: String,
    pub energy_target: i64,
    pub macro_targets: MacroTargets,
}

/// Response for get_profile
#[derive(Debug, Serialize)]
pub struct CurrentProfileResponse {
    pub profile: Option<ProfileSnapshot>,
    pub energy_target: i64,
    pub macro_targets: MacroTargets,
    /// True when the default target is used instead of the profile's
    pub is_default_target: bool,
}

/// Response for get_profile_history
#[derive(Debug, Serialize)]
pub struct ProfileHistoryResponse {
    pub snapshots: Vec<ProfileSnapshot>,
    pub count: usize,
}

/// Energy target from the current profile, or the configured default when
/// there is no profile or its target is not positive
pub(crate) fn current_target(
    conn: &Connection,
    ctx: &UserContext,
) -> DbResult<(i64, Option<ProfileSnapshot>)> {
    let current = ProfileSnapshot::current(conn, &ctx.user_id)?;
    let target = current
        .as_ref()
        .map(|p| p.energy_target)
        .filter(|t| *t > 0)
        .unwrap_or(ctx.default_energy_target);
    Ok((target, current))
}

/// Append a new profile snapshot
pub fn update_profile(
    db: &Database,
    ctx: &UserContext,
    date: &str,
    profile: &BodyProfile,
) -> Result<UpdateProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let snapshot = ProfileSnapshot::create(&conn, &ctx.user_id, date, profile, &ctx.nutrition)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    tracing::info!(
        user = %ctx.user_id,
        energy_target = snapshot.energy_target,
        "Profile updated"
    );

    Ok(UpdateProfileResponse {
        id: snapshot.id,
        macro_targets: snapshot.macro_targets(&ctx.nutrition),
        energy_target: snapshot.energy_target,
        date: snapshot.date,
    })
}

/// Current profile and targets
pub fn get_profile(db: &Database, ctx: &UserContext) -> Result<CurrentProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (energy_target, profile) =
        current_target(&conn, ctx).map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(CurrentProfileResponse {
        is_default_target: profile.as_ref().map_or(true, |p| p.energy_target != energy_target),
        profile,
        energy_target,
        macro_targets: calculate_macro_targets_with(&ctx.nutrition.macros, energy_target),
    })
}

/// All snapshots, oldest first
pub fn get_profile_history(db: &Database, ctx: &UserContext) -> Result<ProfileHistoryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let snapshots = ProfileSnapshot::history(&conn, &ctx.user_id)
        .map_err(|e| format!("Failed to get profile history: {}", e))?;

    Ok(ProfileHistoryResponse {
        count: snapshots.len(),
        snapshots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{ActivityLevel, Sex};
    use crate::tools::test_support::database;

    #[test]
    fn test_default_target_without_profile() {
        let db = database();
        let ctx = UserContext::new("u1");
        let response = get_profile(&db, &ctx).unwrap();
        assert!(response.is_default_target);
        assert_eq!(response.energy_target, 2000);
        assert_eq!(
            response.macro_targets,
            MacroTargets { protein_g: 125, fat_g: 67, carb_g: 225 }
        );
    }

    #[test]
    fn test_update_then_get() {
        let db = database();
        let ctx = UserContext::new("u1");
        let profile = BodyProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
        };

        let updated = update_profile(&db, &ctx, "2025-03-01", &profile).unwrap();
        assert_eq!(updated.energy_target, 2556);

        let current = get_profile(&db, &ctx).unwrap();
        assert!(!current.is_default_target);
        assert_eq!(current.energy_target, 2556);
        assert_eq!(current.macro_targets.protein_g, 160);

        let history = get_profile_history(&db, &ctx).unwrap();
        assert_eq!(history.count, 1);
    }

    #[test]
    fn test_degenerate_profile_falls_back_to_default() {
        let db = database();
        let ctx = UserContext::new("u1");
        let profile = BodyProfile {
            weight_kg: 1.0,
            height_cm: 1.0,
            age_years: 100,
            sex: Sex::Female,
            activity_level: ActivityLevel::Sedentary,
        };

        let updated = update_profile(&db, &ctx, "2025-03-01", &profile).unwrap();
        assert!(updated.energy_target <= 0);

        let current = get_profile(&db, &ctx).unwrap();
        assert!(current.profile.is_some());
        assert!(current.is_default_target);
        assert_eq!(current.energy_target, 2000);
    }

    #[test]
    fn test_update_rejects_bad_date() {
        let db = database();
        let profile = BodyProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: Sex::Female,
            activity_level: ActivityLevel::Light,
        };
        assert!(update_profile(&db, &UserContext::default(), "yesterday", &profile).is_err());
    }
}
