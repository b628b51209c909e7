//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- BODY PROFILES
        -- Append-only snapshots; newest by date is current
        -- ============================================
        CREATE TABLE body_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            weight_kg REAL NOT NULL,
            height_cm REAL NOT NULL,
            age_years INTEGER NOT NULL,
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female')),
            activity_level TEXT NOT NULL DEFAULT 'sedentary',
            energy_target INTEGER NOT NULL,      -- kcal/day computed at insert time
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_body_profiles_user_date ON body_profiles(user_id, date);

        -- ============================================
        -- LOGGED ENTRIES
        -- Diary entries with absolute (already scaled) nutrients
        -- ============================================
        CREATE TABLE logged_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            kcal REAL DEFAULT 0,
            protein REAL DEFAULT 0,              -- grams
            fat REAL DEFAULT 0,                  -- grams
            carb REAL DEFAULT 0,                 -- grams
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );

        CREATE INDEX idx_logged_entries_user_date ON logged_entries(user_id, date);

        -- ============================================
        -- FAVORITE MEALS
        -- Reusable, date-independent templates
        -- ============================================
        CREATE TABLE favorite_meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            kcal REAL DEFAULT 0,
            protein REAL DEFAULT 0,
            fat REAL DEFAULT 0,
            carb REAL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );

        CREATE INDEX idx_favorite_meals_user ON favorite_meals(user_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
