//! Nutrilog Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Diary instructions for AI assistants
pub const DIARY_INSTRUCTIONS: &str = r#"
# Nutrilog Diary Instructions

## Targets

1. Call `get_profile` to see the current energy target and macro targets.
   Without a recorded profile the target is 2000 kcal.
2. When the user reports new body metrics, call `update_profile`
   (weight_kg, height_cm, age_years, sex, activity_level).
   Profiles are never edited; every update appends a new snapshot.

Activity levels: `sedentary`, `light`, `moderate`, `active`, `very_active`.

## Finding foods

Call `search_food` with the food name.
- An exact match in the built-in table is returned alone (stage `local`).
- Otherwise, for names of 3+ characters, up to 5 remote products are
  returned (stage `remote`). Products without calories are dropped.

Reference values are per 100 g (`gram`), per 100 ml (`milliliter`),
or per single item (`item`).

## Logging

- `log_meal` takes a list of ingredients with quantities. Quantities are
  grams / milliliters / item counts matching each ingredient's unit.
  Leave `name` empty to generate one such as `ryż biały (150g), jajko (x2)`.
  Set `save_as_favorite` to keep the meal as a template.
- `log_entry` logs a meal whose totals are already known.
- `log_favorite` re-logs a saved favorite on a date.

All stored values are rounded to 2 decimal places.

## Reviewing

- `get_day` returns entries, totals, adherence (capped at 100%),
  band (`under` < 80%, `on_target` 80-105%, `over` > 105%), remaining kcal
  and macro progress.
- `get_history` groups entries by date, most recent first.

Entries cannot be edited. Delete with `delete_entry` and log again.
"#;

/// Runtime status of the Nutrilog service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub user_id: String,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    user_id: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, user_id: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            user_id: user_id.into(),
        }
    }

    pub fn get_status(&self) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            user_id: self.user_id.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
