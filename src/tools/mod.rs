//! Nutrilog Tools module
//!
//! Tool implementations behind the MCP server. Values are rounded here,
//! on their way out, never inside the nutrition engine.

pub mod diary;
pub mod favorites;
pub mod foods;
pub mod history;
pub mod profile;
pub mod status;

use crate::config::{Config, NutritionConfig, DEFAULT_ENERGY_TARGET, DEFAULT_USER};

/// Whose data a tool call touches, and the constants it uses
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub nutrition: NutritionConfig,
    pub default_energy_target: i64,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nutrition: NutritionConfig::default(),
            default_energy_target: DEFAULT_ENERGY_TARGET,
        }
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::new(DEFAULT_USER)
    }
}

impl From<&Config> for UserContext {
    fn from(config: &Config) -> Self {
        Self {
            user_id: config.user_id.clone(),
            nutrition: config.nutrition,
            default_energy_target: config.default_energy_target,
        }
    }
}

/// Today's date in local time, ISO formatted
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::{migrations::run_migrations, Database};

    pub fn database() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }
}
