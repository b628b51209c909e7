//! Food lookup
//!
//! Two-stage resolution of a food name: the built-in table first, and the
//! remote database only when the table has no exact match.

pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{MAX_LOOKUP_RESULTS, MIN_LOOKUP_TERM_LEN};
use crate::nutrition::FoodRecord;

pub use local::LocalFoodTable;
pub use remote::{parse_products, OpenFoodFactsClient};

/// Remote lookup failures
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Lookup service returned status {0}")]
    Status(u16),
}

/// A searchable remote food database
#[async_trait]
pub trait RemoteFoodSource: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<FoodRecord>, LookupError>;
}

/// Which stage produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStage {
    Local,
    Remote,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupOutcome {
    pub stage: LookupStage,
    pub results: Vec<FoodRecord>,
}

impl LookupOutcome {
    fn empty() -> Self {
        Self {
            stage: LookupStage::None,
            results: Vec::new(),
        }
    }
}

/// Local-then-remote food resolver
#[derive(Clone)]
pub struct FoodResolver {
    local: LocalFoodTable,
    remote: Option<Arc<dyn RemoteFoodSource>>,
    min_term_len: usize,
    max_results: usize,
}

impl FoodResolver {
    pub fn new(local: LocalFoodTable, remote: Option<Arc<dyn RemoteFoodSource>>) -> Self {
        Self {
            local,
            remote,
            min_term_len: MIN_LOOKUP_TERM_LEN,
            max_results: MAX_LOOKUP_RESULTS,
        }
    }

    /// Resolver that never leaves the built-in table
    pub fn local_only() -> Self {
        Self::new(LocalFoodTable::builtin(), None)
    }

    pub fn local(&self) -> &LocalFoodTable {
        &self.local
    }

    /// Resolve a term. Remote failures degrade to an empty result.
    pub async fn resolve(&self, term: &str) -> LookupOutcome {
        let term = term.trim();

        if let Some(record) = self.local.lookup(term) {
            tracing::debug!(term, "Local food table hit");
            return LookupOutcome {
                stage: LookupStage::Local,
                results: vec![record.clone()],
            };
        }

        if term.chars().count() < self.min_term_len {
            return LookupOutcome::empty();
        }

        let remote = match &self.remote {
            Some(remote) => remote,
            None => return LookupOutcome::empty(),
        };

        match remote.search(term).await {
            Ok(records) => {
                let results: Vec<FoodRecord> = records
                    .into_iter()
                    .filter(|r| r.nutrients.kcal.is_finite() && r.nutrients.kcal > 0.0)
                    .take(self.max_results)
                    .collect();
                tracing::debug!(term, count = results.len(), "Remote food lookup");
                LookupOutcome {
                    stage: LookupStage::Remote,
                    results,
                }
            }
            Err(e) => {
                tracing::warn!(term, error = %e, "Remote food lookup failed");
                LookupOutcome::empty()
            }
        }
    }
}
