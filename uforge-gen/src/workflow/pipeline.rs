//! Pipeline orchestrator
//!
//! Sequences one generation cycle end to end. Collaborators (dataset
//! provider, scoring oracles, search oracle, database pool) are injected so
//! the orchestrator owns sequencing and degradation policy, nothing else.
//!
//! # Error handling
//! - Per-candidate composition failures degrade the batch
//! - Per-oracle failures degrade the ranking
//! - Per-query search failures degrade the validated set
//! - Only dataset-load exhaustion and total oracle failure abort the run

use crate::compose::compose_candidate;
use crate::dataset::load_with_recovery;
use crate::db;
use crate::error::PipelineError;
use crate::scoring::score_and_rank;
use crate::types::{Candidate, DatasetProvider, ScoringOracle, SearchOracle};
use crate::validate::validate;
use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Maximum dataset load attempts per cycle
const MAX_LOAD_ATTEMPTS: u32 = 3;

/// Cycle parameters
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Raw candidates generated per cycle
    pub raw_count: u32,
    /// Top-ranked candidates carried into validation
    pub top_k: u32,
    /// Require the candidate as a standalone token in the snippet
    pub strict_match: bool,
    /// Remove the fetched source records after the validation batch
    pub consume_source: bool,
    /// Fixed domain paired with each username
    pub email_domain: String,
}

/// Summary of one completed cycle
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub generated: usize,
    pub ranked: usize,
    pub validated: usize,
    pub consumed: usize,
}

/// Pipeline orchestrator
pub struct Orchestrator<'a> {
    pool: &'a SqlitePool,
    dataset_provider: &'a dyn DatasetProvider,
    oracles: &'a [Box<dyn ScoringOracle>],
    search: &'a dyn SearchOracle,
    config: CycleConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        pool: &'a SqlitePool,
        dataset_provider: &'a dyn DatasetProvider,
        oracles: &'a [Box<dyn ScoringOracle>],
        search: &'a dyn SearchOracle,
        config: CycleConfig,
    ) -> Self {
        Self {
            pool,
            dataset_provider,
            oracles,
            search,
            config,
        }
    }

    /// Run one full generation cycle
    pub async fn run_cycle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<CycleOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, raw_count = self.config.raw_count, top_k = self.config.top_k, "Starting cycle");

        // Phase 1: dataset, with bounded retry and corrective regeneration
        let dataset = load_with_recovery(self.dataset_provider, MAX_LOAD_ATTEMPTS).await?;

        // Phase 2: generation; failed candidates degrade the batch
        let mut candidates: Vec<Candidate> = Vec::with_capacity(self.config.raw_count as usize);
        for _ in 0..self.config.raw_count {
            match compose_candidate(rng, &dataset) {
                Ok(candidate) => {
                    debug!(
                        username = %candidate.username,
                        address = %candidate.address(&self.config.email_domain),
                        "Composed candidate"
                    );
                    candidates.push(candidate);
                }
                Err(e) => warn!(error = %e, "Candidate composition failed; skipping"),
            }
        }

        if candidates.is_empty() {
            warn!(%run_id, "No candidates could be composed; cycle ends empty");
            return Ok(CycleOutcome {
                run_id,
                started_at,
                generated: 0,
                ranked: 0,
                validated: 0,
                consumed: 0,
            });
        }
        info!(%run_id, generated = candidates.len(), "Candidate batch generated");

        // Phase 3: scoring and ranking
        let usernames: Vec<String> = candidates.iter().map(|c| c.username.clone()).collect();
        let ranked =
            score_and_rank(&usernames, self.oracles, self.config.top_k as usize).await?;
        info!(%run_id, ranked = ranked.len(), "Candidates ranked");

        // Phase 4: persist the ranked batch and archive it
        db::scores::upsert_scores(self.pool, &ranked).await?;
        db::scores::archive_scores(self.pool, &ranked).await?;

        // Phase 5: validation batch comes from the store so earlier cycles'
        // unconsumed records compete on score
        let records = db::scores::top_scores(self.pool, self.config.top_k).await?;

        // Phase 6: search validation
        let results = validate(self.search, &records, self.config.strict_match).await;
        info!(%run_id, validated = results.len(), "Validation pass complete");

        // Phase 7: persist accepted results
        db::validated::upsert_validated(self.pool, &results).await?;

        // Phase 8: consume the fetched source records, validated or not
        let consumed = if self.config.consume_source {
            let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
            db::scores::remove_scores(self.pool, &ids).await?;
            ids.len()
        } else {
            0
        };

        let outcome = CycleOutcome {
            run_id,
            started_at,
            generated: candidates.len(),
            ranked: ranked.len(),
            validated: results.len(),
            consumed,
        };
        info!(
            %run_id,
            generated = outcome.generated,
            ranked = outcome.ranked,
            validated = outcome.validated,
            consumed = outcome.consumed,
            "Cycle complete"
        );

        Ok(outcome)
    }
}
