//! Aggregator
//!
//! Sums logged entries into daily totals, derives adherence against the
//! energy target, and groups multi-day histories by date.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::profile::MacroTargets;
use crate::config::NutritionConfig;
use crate::models::{LoggedEntry, Macros};

/// Summed nutrients for one or more entries
pub type DailyTotals = Macros;

/// Where a day's intake sits relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceBand {
    Under,
    OnTarget,
    Over,
}

impl AdherenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdherenceBand::Under => "under",
            AdherenceBand::OnTarget => "on_target",
            AdherenceBand::Over => "over",
        }
    }
}

/// Percent of each macro target reached, capped at 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

/// Sum nutrients across entries; malformed fields count as zero
pub fn aggregate_entries<'a, I>(entries: I) -> DailyTotals
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    entries.into_iter().map(|e| e.nutrition.sanitized()).sum()
}

/// Unclamped intake as a percent of target. Zero when the target is unusable.
pub fn adherence_ratio(kcal: f64, target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 {
        return 0.0;
    }
    let percent = kcal / target * 100.0;
    if percent.is_finite() {
        percent.max(0.0)
    } else {
        0.0
    }
}

/// Intake as a percent of target, clamped to [0, 100]
pub fn compute_adherence(totals: &DailyTotals, target: f64) -> f64 {
    adherence_ratio(totals.kcal, target).min(100.0)
}

/// Classify an unclamped adherence percent
pub fn classify_adherence(percent: f64, config: &NutritionConfig) -> AdherenceBand {
    if percent < config.under_target_below {
        AdherenceBand::Under
    } else if percent > config.over_target_above {
        AdherenceBand::Over
    } else {
        AdherenceBand::OnTarget
    }
}

/// Kilocalories left for the day; negative once the target is exceeded
pub fn remaining_kcal(totals: &DailyTotals, target: f64) -> f64 {
    target - totals.kcal
}

pub fn macro_progress(totals: &DailyTotals, targets: &MacroTargets) -> MacroProgress {
    let pct = |current: f64, target: i64| adherence_ratio(current, target as f64).min(100.0);
    MacroProgress {
        protein: pct(totals.protein, targets.protein_g),
        fat: pct(totals.fat, targets.fat_g),
        carb: pct(totals.carb, targets.carb_g),
    }
}

/// Derived summary of one diary day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub totals: DailyTotals,
    pub energy_target: f64,
    pub adherence_percent: f64,
    pub band: AdherenceBand,
    pub remaining_kcal: f64,
    pub entry_count: usize,
}

pub fn summarize_day(
    date: &str,
    entries: &[LoggedEntry],
    energy_target: f64,
    config: &NutritionConfig,
) -> DailySummary {
    let totals = aggregate_entries(entries);
    DailySummary {
        date: date.to_string(),
        totals,
        energy_target,
        adherence_percent: compute_adherence(&totals, energy_target),
        band: classify_adherence(adherence_ratio(totals.kcal, energy_target), config),
        remaining_kcal: remaining_kcal(&totals, energy_target),
        entry_count: entries.len(),
    }
}

/// Entries sharing one date, with their totals
#[derive(Debug, Clone)]
pub struct DayBucket<'a> {
    pub date: &'a str,
    pub totals: DailyTotals,
    pub entries: Vec<&'a LoggedEntry>,
}

/// Partition entries by date, most recent date first
pub fn group_by_date(entries: &[LoggedEntry]) -> Vec<DayBucket<'_>> {
    let mut by_date: HashMap<&str, Vec<&LoggedEntry>> = HashMap::new();
    for entry in entries {
        by_date.entry(entry.date.as_str()).or_default().push(entry);
    }

    let mut buckets: Vec<DayBucket<'_>> = by_date
        .into_iter()
        .map(|(date, items)| DayBucket {
            date,
            totals: aggregate_entries(items.iter().copied()),
            entries: items,
        })
        .collect();

    // Unparseable dates go last
    buckets.sort_by(|a, b| sort_key(b.date).cmp(&sort_key(a.date)));
    buckets
}

fn sort_key(date: &str) -> (Option<NaiveDate>, &str) {
    (NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(), date)
}
