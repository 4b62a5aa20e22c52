//! Lexical dataset loading
//!
//! The dataset is loaded once per pipeline run and read-only for its
//! duration; it is reloaded only when a failed load triggers a retry.
//! The retry loop keeps the corrective regeneration action as an injected
//! collaborator rather than a hardcoded call.

use crate::db;
use crate::error::PipelineError;
use crate::types::{DatasetProvider, FragmentKind};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// The four read-only lexicon categories for one pipeline run
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    words: Vec<String>,
    years: Vec<String>,
    numbers: Vec<String>,
}

impl Dataset {
    pub fn new(
        names: Vec<String>,
        words: Vec<String>,
        years: Vec<String>,
        numbers: Vec<String>,
    ) -> Self {
        Self {
            names,
            words,
            years,
            numbers,
        }
    }

    pub fn category(&self, kind: FragmentKind) -> &[String] {
        match kind {
            FragmentKind::Name => &self.names,
            FragmentKind::Word => &self.words,
            FragmentKind::Year => &self.years,
            FragmentKind::Number => &self.numbers,
        }
    }
}

/// Load all four categories from the provider
pub async fn load_dataset(provider: &dyn DatasetProvider) -> uforge_common::Result<Dataset> {
    let names = provider.get_category(FragmentKind::Name).await?;
    let words = provider.get_category(FragmentKind::Word).await?;
    let years = provider.get_category(FragmentKind::Year).await?;
    let numbers = provider.get_category(FragmentKind::Number).await?;

    info!(
        names = names.len(),
        words = words.len(),
        years = years.len(),
        numbers = numbers.len(),
        "Lexical dataset loaded"
    );

    Ok(Dataset::new(names, words, years, numbers))
}

/// Load the dataset with bounded retry
///
/// After each failed attempt (except the last) the provider's corrective
/// `regenerate` action runs before the next try. Exhausting the budget is
/// fatal to the run.
pub async fn load_with_recovery(
    provider: &dyn DatasetProvider,
    max_attempts: u32,
) -> Result<Dataset, PipelineError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match load_dataset(provider).await {
            Ok(dataset) => return Ok(dataset),
            Err(e) if attempt >= max_attempts => {
                return Err(PipelineError::DatasetLoad {
                    attempts: attempt,
                    source: e,
                });
            }
            Err(e) => {
                warn!(attempt, error = %e, "Dataset load failed, running corrective regeneration");
                if let Err(re) = provider.regenerate().await {
                    warn!(error = %re, "Corrective regeneration failed");
                }
            }
        }
    }
}

/// Dataset provider backed by the lexicon tables
pub struct SqlDatasetProvider {
    pool: SqlitePool,
}

impl SqlDatasetProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatasetProvider for SqlDatasetProvider {
    async fn get_category(&self, kind: FragmentKind) -> uforge_common::Result<Vec<String>> {
        db::lexicon::load_category(&self.pool, kind).await
    }

    async fn regenerate(&self) -> uforge_common::Result<()> {
        db::lexicon::populate_numeric_tables(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Provider that fails its first `failures` loads, counting regenerations
    struct FlakyProvider {
        failures: u32,
        loads: AtomicU32,
        regenerations: AtomicU32,
    }

    impl FlakyProvider {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                loads: AtomicU32::new(0),
                regenerations: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl DatasetProvider for FlakyProvider {
        async fn get_category(&self, kind: FragmentKind) -> uforge_common::Result<Vec<String>> {
            // Count one load attempt per Name query (first category requested)
            if kind == FragmentKind::Name {
                let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
                if attempt < self.failures {
                    return Err(uforge_common::Error::NotFound(
                        "lexicon tables missing".to_string(),
                    ));
                }
            }
            Ok(vec![format!("{}-item", kind)])
        }

        async fn regenerate(&self) -> uforge_common::Result<()> {
            self.regenerations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_recovery_succeeds_after_transient_failures() {
        let provider = FlakyProvider::new(2);
        let dataset = load_with_recovery(&provider, 3)
            .await
            .expect("Should recover within 3 attempts");

        assert_eq!(dataset.category(FragmentKind::Name), ["name-item"]);
        assert_eq!(provider.regenerations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recovery_exhaustion_is_fatal() {
        let provider = FlakyProvider::new(10);
        let err = load_with_recovery(&provider, 3)
            .await
            .expect_err("Should exhaust retries");

        match err {
            PipelineError::DatasetLoad { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("Unexpected error: {:?}", other),
        }
        // Regeneration runs between attempts, not after the last failure
        assert_eq!(provider.regenerations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_attempt_success_skips_regeneration() {
        let provider = FlakyProvider::new(0);
        load_with_recovery(&provider, 3).await.expect("Should load");
        assert_eq!(provider.regenerations.load(Ordering::SeqCst), 0);
    }
}
