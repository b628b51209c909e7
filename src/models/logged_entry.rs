//! Logged Entry model
//!
//! A diary entry holding absolute nutrient totals for one meal on one date.
//! Entries are created and deleted, never updated.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Macros;
use crate::db::{DbError, DbResult};

/// A logged diary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEntry {
    pub id: i64,
    pub user_id: String,
    pub date: String, // ISO date: "2025-01-09"
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Macros,
    pub created_at: String,
}

/// Data for creating a logged entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEntryCreate {
    pub user_id: String,
    pub date: String,
    pub name: String,
    pub nutrition: Macros,
}

/// Reject blank names, malformed dates, and negative or non-finite nutrients
pub(crate) fn validate_record(name: &str, nutrition: &Macros) -> DbResult<()> {
    if name.trim().is_empty() {
        return Err(DbError::Invalid("name must not be empty".to_string()));
    }
    if !nutrition.is_valid() {
        return Err(DbError::Invalid(
            "nutrient values must be finite and non-negative".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_date(date: &str) -> DbResult<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| DbError::Invalid(format!("'{}' is not an ISO date (YYYY-MM-DD)", date)))
}

/// Read nutrient columns, treating NULL as zero
pub(crate) fn macros_from_row(row: &Row) -> rusqlite::Result<Macros> {
    Ok(Macros {
        kcal: row.get::<_, Option<f64>>("kcal")?.unwrap_or(0.0),
        protein: row.get::<_, Option<f64>>("protein")?.unwrap_or(0.0),
        fat: row.get::<_, Option<f64>>("fat")?.unwrap_or(0.0),
        carb: row.get::<_, Option<f64>>("carb")?.unwrap_or(0.0),
    })
}

impl LoggedEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            nutrition: macros_from_row(row)?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new entry. Nutrients are stored rounded to 2 decimals.
    pub fn create(conn: &Connection, data: &LoggedEntryCreate) -> DbResult<Self> {
        validate_date(&data.date)?;
        validate_record(&data.name, &data.nutrition)?;

        let nutrition = data.nutrition.rounded();
        conn.execute(
            r#"
            INSERT INTO logged_entries (user_id, date, name, kcal, protein, fat, carb)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_id,
                data.date,
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
        let mut stmt = conn.prepare("SELECT * FROM logged_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries for one date, newest first
    pub fn get_for_date(conn: &Connection, user_id: &str, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM logged_entries
            WHERE user_id = ?1 AND date = ?2
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Entries with optional inclusive date range, most recent date first
    pub fn list(
        conn: &Connection,
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM logged_entries WHERE user_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete an entry owned by `user_id`. Returns false if nothing matched.
    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM logged_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create(conn: &Connection, user: &str, date: &str, name: &str, kcal: f64) -> LoggedEntry {
        LoggedEntry::create(
            conn,
            &LoggedEntryCreate {
                user_id: user.to_string(),
                date: date.to_string(),
                name: name.to_string(),
                nutrition: Macros::new(kcal, 1.0, 1.0, 1.0),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_rounds_to_two_decimals() {
        let conn = setup();
        let entry = LoggedEntry::create(
            &conn,
            &LoggedEntryCreate {
                user_id: "u1".to_string(),
                date: "2025-03-01".to_string(),
                name: "  owsianka ".to_string(),
                nutrition: Macros::new(194.4449, 4.0512, 0.333, 42.0),
            },
        )
        .unwrap();

        assert_eq!(entry.name, "owsianka");
        assert_eq!(entry.nutrition, Macros::new(194.44, 4.05, 0.33, 42.0));
    }

    #[test]
    fn test_create_rejects_invalid() {
        let conn = setup();
        let mut data = LoggedEntryCreate {
            user_id: "u1".to_string(),
            date: "01/03/2025".to_string(),
            name: "x".to_string(),
            nutrition: Macros::zero(),
        };
        assert!(matches!(LoggedEntry::create(&conn, &data), Err(DbError::Invalid(_))));

        data.date = "2025-03-01".to_string();
        data.name = "  ".to_string();
        assert!(matches!(LoggedEntry::create(&conn, &data), Err(DbError::Invalid(_))));

        data.name = "x".to_string();
        data.nutrition = Macros::new(-1.0, 0.0, 0.0, 0.0);
        assert!(matches!(LoggedEntry::create(&conn, &data), Err(DbError::Invalid(_))));
    }

    #[test]
    fn test_get_for_date_scoped_by_user_and_newest_first() {
        let conn = setup();
        let first = create(&conn, "u1", "2025-03-01", "a", 100.0);
        let second = create(&conn, "u1", "2025-03-01", "b", 200.0);
        create(&conn, "u1", "2025-03-02", "c", 300.0);
        create(&conn, "u2", "2025-03-01", "d", 400.0);

        let entries = LoggedEntry::get_for_date(&conn, "u1", "2025-03-01").unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_list_range_descending() {
        let conn = setup();
        create(&conn, "u1", "2025-02-27", "a", 1.0);
        create(&conn, "u1", "2025-03-05", "b", 1.0);
        create(&conn, "u1", "2025-03-01", "c", 1.0);

        let all = LoggedEntry::list(&conn, "u1", None, None).unwrap();
        let dates: Vec<&str> = all.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-05", "2025-03-01", "2025-02-27"]);

        let march = LoggedEntry::list(&conn, "u1", Some("2025-03-01"), Some("2025-03-31")).unwrap();
        assert_eq!(march.len(), 2);
    }

    #[test]
    fn test_null_nutrients_read_as_zero() {
        let conn = setup();
        conn.execute(
            "INSERT INTO logged_entries (user_id, date, name, kcal, protein, fat, carb)
             VALUES ('u1', '2025-03-01', 'legacy', 120.0, NULL, NULL, NULL)",
            [],
        )
        .unwrap();
        let entries = LoggedEntry::get_for_date(&conn, "u1", "2025-03-01").unwrap();
        assert_eq!(entries[0].nutrition, Macros::new(120.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_delete_only_own_entries() {
        let conn = setup();
        let entry = create(&conn, "u1", "2025-03-01", "a", 100.0);
        assert!(!LoggedEntry::delete(&conn, "u2", entry.id).unwrap());
        assert!(LoggedEntry::delete(&conn, "u1", entry.id).unwrap());
        assert!(LoggedEntry::get_by_id(&conn, entry.id).unwrap().is_none());
        assert!(!LoggedEntry::delete(&conn, "u1", entry.id).unwrap());
    }
}
