//! Favorite Meal model
//!
//! Named, date-independent meal templates that can be re-logged.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::logged_entry::{macros_from_row, validate_record};
use super::{LoggedEntryCreate, Macros};
use crate::db::{DbError, DbResult};

/// A saved meal template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteMeal {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Macros,
    pub created_at: String,
}

/// Data for creating a favorite meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteMealCreate {
    pub user_id: String,
    pub name: String,
    pub nutrition: Macros,
}

impl FavoriteMeal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            nutrition: macros_from_row(row)?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &FavoriteMealCreate) -> DbResult<Self> {
        validate_record(&data.name, &data.nutrition)?;

        let nutrition = data.nutrition.rounded();
        conn.execute(
            r#"
            INSERT INTO favorite_meals (user_id, name, kcal, protein, fat, carb)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.user_id,
                data.name.trim(),
                nutrition.kcal,
                nutrition.protein,
                nutrition.fat,
                nutrition.carb,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM favorite_meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All favorites for a user, newest first
    pub fn list(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM favorite_meals WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;

        let meals = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM favorite_meals WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Diary entry data that re-logs this favorite on `date`
    pub fn to_entry(&self, date: &str) -> LoggedEntryCreate {
        LoggedEntryCreate {
            user_id: self.user_id.clone(),
            date: date.to_string(),
            name: self.name.clone(),
            nutrition: self.nutrition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::LoggedEntry;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn favorite(conn: &Connection, user: &str, name: &str) -> FavoriteMeal {
        FavoriteMeal::create(
            conn,
            &FavoriteMealCreate {
                user_id: user.to_string(),
                name: name.to_string(),
                nutrition: Macros::new(412.346, 20.0, 10.0, 55.556),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_list_newest_first() {
        let conn = setup();
        let a = favorite(&conn, "u1", "Śniadanie");
        let b = favorite(&conn, "u1", "Obiad");
        favorite(&conn, "u2", "Kolacja");

        let meals = FavoriteMeal::list(&conn, "u1").unwrap();
        let ids: Vec<i64> = meals.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(meals[0].nutrition.kcal, 412.35);
        assert_eq!(meals[0].nutrition.carb, 55.56);
    }

    #[test]
    fn test_relog_copies_totals() {
        let conn = setup();
        let meal = favorite(&conn, "u1", "Śniadanie");
        let entry = LoggedEntry::create(&conn, &meal.to_entry("2025-03-01")).unwrap();
        assert_eq!(entry.name, "Śniadanie");
        assert_eq!(entry.date, "2025-03-01");
        assert_eq!(entry.nutrition, meal.nutrition);
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        let meal = favorite(&conn, "u1", "Obiad");
        assert!(FavoriteMeal::delete(&conn, "u1", meal.id).unwrap());
        assert!(FavoriteMeal::list(&conn, "u1").unwrap().is_empty());
    }
}
