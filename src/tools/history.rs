//! History MCP Tools
//!
//! Multi-day diary view grouped by date.

use serde::Serialize;

use super::profile::current_target;
use super::UserContext;
use crate::db::Database;
use crate::models::{LoggedEntry, Macros};
use crate::nutrition::{
    adherence_ratio, classify_adherence, compute_adherence, group_by_date, round_to_storage,
    AdherenceBand,
};

/// One date in the history
#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub totals: Macros,
    pub adherence_percent: f64,
    pub band: AdherenceBand,
    pub entries: Vec<LoggedEntry>,
}

/// Response for get_history
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub energy_target: i64,
    pub days: Vec<HistoryDay>,
    pub day_count: usize,
    pub entry_count: usize,
}

/// Entries in an optional inclusive date range, grouped by date, most recent first.
///
/// Every day is measured against the current energy target.
pub fn get_history(
    db: &Database,
    ctx: &UserContext,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<HistoryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (energy_target, _) =
        current_target(&conn, ctx).map_err(|e| format!("Failed to get profile: {}", e))?;

    let entries = LoggedEntry::list(&conn, &ctx.user_id, start_date, end_date)
        .map_err(|e| format!("Failed to get entries: {}", e))?;

    let target = energy_target as f64;
    let days: Vec<HistoryDay> = group_by_date(&entries)
        .into_iter()
        .map(|bucket| HistoryDay {
            date: bucket.date.to_string(),
            totals: bucket.totals.rounded(),
            adherence_percent: round_to_storage(compute_adherence(&bucket.totals, target)),
            band: classify_adherence(adherence_ratio(bucket.totals.kcal, target), &ctx.nutrition),
            entries: bucket.entries.into_iter().cloned().collect(),
        })
        .collect();

    Ok(HistoryResponse {
        energy_target,
        day_count: days.len(),
        entry_count: entries.len(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::diary::log_entry;
    use crate::tools::test_support::database;

    fn kcal(value: f64) -> Macros {
        Macros::new(value, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_history_groups_most_recent_first() {
        let db = database();
        let ctx = UserContext::new("u1");
        log_entry(&db, &ctx, "2025-02-28", "a", kcal(1000.0)).unwrap();
        log_entry(&db, &ctx, "2025-03-01", "b", kcal(900.0)).unwrap();
        log_entry(&db, &ctx, "2025-03-01", "c", kcal(900.0)).unwrap();
        log_entry(&db, &UserContext::new("u2"), "2025-03-01", "x", kcal(5000.0)).unwrap();

        let history = get_history(&db, &ctx, None, None).unwrap();
        assert_eq!(history.day_count, 2);
        assert_eq!(history.entry_count, 3);

        let first = &history.days[0];
        assert_eq!(first.date, "2025-03-01");
        assert_eq!(first.totals.kcal, 1800.0);
        assert_eq!(first.adherence_percent, 90.0);
        assert_eq!(first.band, AdherenceBand::OnTarget);

        assert_eq!(history.days[1].date, "2025-02-28");
        assert_eq!(history.days[1].band, AdherenceBand::Under);
    }

    #[test]
    fn test_history_over_target_is_capped() {
        let db = database();
        let ctx = UserContext::new("u1");
        log_entry(&db, &ctx, "2025-03-01", "feast", kcal(3000.0)).unwrap();

        let history = get_history(&db, &ctx, None, None).unwrap();
        assert_eq!(history.days[0].adherence_percent, 100.0);
        assert_eq!(history.days[0].band, AdherenceBand::Over);
    }

    #[test]
    fn test_history_date_range() {
        let db = database();
        let ctx = UserContext::new("u1");
        for date in ["2025-03-01", "2025-03-02", "2025-03-03"] {
            log_entry(&db, &ctx, date, "meal", kcal(500.0)).unwrap();
        }

        let history = get_history(&db, &ctx, Some("2025-03-02"), Some("2025-03-03")).unwrap();
        let dates: Vec<&str> = history.days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-03", "2025-03-02"]);
    }

    #[test]
    fn test_empty_history() {
        let db = database();
        let history = get_history(&db, &UserContext::default(), None, None).unwrap();
        assert!(history.days.is_empty());
        assert_eq!(history.energy_target, 2000);
    }
}
