//! Body Profile model
//!
//! Append-only body metric snapshots. The newest snapshot by date is the
//! user's current profile and carries the energy target computed from it.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::logged_entry::validate_date;
use crate::config::NutritionConfig;
use crate::db::{DbError, DbResult};
use crate::nutrition::{
    calculate_energy_target_with, calculate_macro_targets_with, ActivityLevel, BodyProfile,
    MacroTargets, Sex,
};

/// A stored body profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub id: i64,
    pub user_id: String,
    pub date: String,
    #[serde(flatten)]
    pub profile: BodyProfile,
    pub energy_target: i64,
    pub created_at: String,
}

impl ProfileSnapshot {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        let activity: String = row.get("activity_level")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            profile: BodyProfile {
                weight_kg: row.get("weight_kg")?,
                height_cm: row.get("height_cm")?,
                age_years: row.get("age_years")?,
                sex: Sex::from_str(&sex),
                activity_level: ActivityLevel::from_str(&activity),
            },
            energy_target: row.get("energy_target")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Append a snapshot, computing its energy target
    pub fn create(
        conn: &Connection,
        user_id: &str,
        date: &str,
        profile: &BodyProfile,
        config: &NutritionConfig,
    ) -> DbResult<Self> {
        validate_date(date)?;
        if !(profile.weight_kg.is_finite() && profile.height_cm.is_finite()) {
            return Err(DbError::Invalid("weight and height must be numbers".to_string()));
        }

        let energy_target = calculate_energy_target_with(
            config,
            profile.weight_kg,
            profile.height_cm,
            profile.age_years,
            profile.sex,
            profile.activity_level,
        );

        conn.execute(
            r#"
            INSERT INTO body_profiles (
                user_id, date, weight_kg, height_cm, age_years, sex, activity_level, energy_target
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                user_id,
                date,
                profile.weight_kg,
                profile.height_cm,
                profile.age_years,
                profile.sex.as_str(),
                profile.activity_level.as_str(),
                energy_target,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM body_profiles WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent snapshot by date (ties go to the later insert)
    pub fn current(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM body_profiles WHERE user_id = ?1 ORDER BY date DESC, id DESC LIMIT 1",
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All snapshots, oldest first (weight history)
    pub fn history(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM body_profiles WHERE user_id = ?1 ORDER BY date ASC, id ASC",
        )?;

        let snapshots = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(snapshots)
    }

    pub fn macro_targets(&self, config: &NutritionConfig) -> MacroTargets {
        calculate_macro_targets_with(&config.macros, self.energy_target)
    }
}
