//! Score aggregation and ranking
//!
//! Invokes each oracle on the full batch, averages per-candidate scores over
//! the oracles that produced one, and returns the top-K in stable descending
//! order. Per-oracle failures degrade the result; only a transport failure
//! of every oracle is fatal.

use crate::error::PipelineError;
use crate::scoring::parser::parse_oracle_response;
use crate::types::{AggregatedScore, ScoreEntry, ScoringOracle};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Score a candidate batch with the oracle panel and rank the results
///
/// Returns at most `top_k` entries sorted by average score descending;
/// equal averages keep the original candidate order. Candidates no oracle
/// scored are excluded. Scores reported for usernames outside the batch are
/// ignored.
pub async fn score_and_rank(
    candidates: &[String],
    oracles: &[Box<dyn ScoringOracle>],
    top_k: usize,
) -> Result<Vec<AggregatedScore>, PipelineError> {
    let known: HashSet<&str> = candidates.iter().map(|c| c.as_str()).collect();

    let mut entries: Vec<ScoreEntry> = Vec::new();
    let mut transport_failures = 0usize;

    for oracle in oracles {
        let agent_id = oracle.agent_id();
        match oracle.score(candidates).await {
            Err(e) => {
                warn!(agent_id, error = %e, "Scoring oracle failed; aggregating without it");
                transport_failures += 1;
            }
            Ok(raw) => match parse_oracle_response(&raw) {
                Err(e) => {
                    warn!(agent_id, error = %e, "Oracle response unparsable; contributes no scores");
                }
                Ok(scores) => {
                    debug!(agent_id, scored = scores.len(), "Oracle scored batch");
                    for raw_score in scores {
                        if known.contains(raw_score.username.as_str()) {
                            entries.push(ScoreEntry {
                                candidate: raw_score.username,
                                agent_id,
                                score: raw_score.score,
                            });
                        } else {
                            debug!(
                                agent_id,
                                username = %raw_score.username,
                                "Ignoring score for username outside the batch"
                            );
                        }
                    }
                }
            },
        }
    }

    if !oracles.is_empty() && transport_failures == oracles.len() {
        return Err(PipelineError::NoScoresAvailable {
            oracles: oracles.len(),
        });
    }

    // Mean over exactly the oracles that scored this candidate
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for entry in &entries {
        let slot = sums.entry(entry.candidate.as_str()).or_insert((0.0, 0));
        slot.0 += entry.score;
        slot.1 += 1;
    }

    // Walk the batch in original order so the stable sort keeps that order
    // as the tie-break; duplicates in the batch aggregate once.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranked: Vec<AggregatedScore> = Vec::new();
    for candidate in candidates {
        if !seen.insert(candidate.as_str()) {
            continue;
        }
        if let Some((sum, count)) = sums.get(candidate.as_str()) {
            ranked.push(AggregatedScore {
                candidate: candidate.clone(),
                average: sum / *count as f64,
            });
        }
    }

    ranked.sort_by(|a, b| b.average.partial_cmp(&a.average).unwrap_or(Ordering::Equal));
    ranked.truncate(top_k);

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use async_trait::async_trait;

    /// Stub oracle returning a fixed response (or a transport error)
    struct StubOracle {
        agent_id: u32,
        response: Result<String, ()>,
    }

    impl StubOracle {
        fn ok(agent_id: u32, response: &str) -> Box<dyn ScoringOracle> {
            Box::new(Self {
                agent_id,
                response: Ok(response.to_string()),
            })
        }

        fn failing(agent_id: u32) -> Box<dyn ScoringOracle> {
            Box::new(Self {
                agent_id,
                response: Err(()),
            })
        }
    }

    #[async_trait]
    impl ScoringOracle for StubOracle {
        fn agent_id(&self) -> u32 {
            self.agent_id
        }

        async fn score(&self, _candidates: &[String]) -> Result<String, OracleError> {
            self.response
                .clone()
                .map_err(|_| OracleError::Transport("connection refused".to_string()))
        }
    }

    fn batch(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_average_over_contributing_oracles_only() {
        let candidates = batch(&["x", "y"]);
        let oracles = vec![
            StubOracle::ok(0, r#"[{"x": 0.8}]"#),
            StubOracle::ok(1, r#"[{"x": 0.6}]"#),
            StubOracle::ok(2, "no scores today"),
        ];

        let ranked = score_and_rank(&candidates, &oracles, 10).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate, "x");
        // Mean over the 2 oracles that scored it, not all 3
        assert!((ranked[0].average - 0.70).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ranking_descends_and_truncates() {
        let candidates = batch(&["low", "high", "mid"]);
        let oracles = vec![StubOracle::ok(
            0,
            r#"[{"low": 0.2}, {"high": 0.9}, {"mid": 0.5}]"#,
        )];

        let ranked = score_and_rank(&candidates, &oracles, 2).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate, "high");
        assert_eq!(ranked[1].candidate, "mid");
    }

    #[tokio::test]
    async fn test_ties_keep_original_candidate_order() {
        let candidates = batch(&["b", "a", "c"]);
        let oracles = vec![StubOracle::ok(0, r#"[{"a": 0.5}, {"b": 0.5}, {"c": 0.5}]"#)];

        let ranked = score_and_rank(&candidates, &oracles, 10).await.unwrap();
        let order: Vec<&str> = ranked.iter().map(|s| s.candidate.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_unknown_usernames_ignored() {
        let candidates = batch(&["x"]);
        let oracles = vec![StubOracle::ok(0, r#"[{"x": 0.4}, {"hallucinated": 0.99}]"#)];

        let ranked = score_and_rank(&candidates, &oracles, 10).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate, "x");
    }

    #[tokio::test]
    async fn test_partial_transport_failure_degrades() {
        let candidates = batch(&["x"]);
        let oracles = vec![StubOracle::failing(0), StubOracle::ok(1, r#"[{"x": 0.3}]"#)];

        let ranked = score_and_rank(&candidates, &oracles, 10).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].average - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_total_transport_failure_is_fatal() {
        let candidates = batch(&["x"]);
        let oracles = vec![StubOracle::failing(0), StubOracle::failing(1)];

        let err = score_and_rank(&candidates, &oracles, 10).await.unwrap_err();
        match err {
            PipelineError::NoScoresAvailable { oracles } => assert_eq!(oracles, 2),
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_unparsable_yields_empty_ranking() {
        let candidates = batch(&["x"]);
        let oracles = vec![StubOracle::ok(0, "nope"), StubOracle::ok(1, "still nope")];

        // Oracles responded, so this is degradation rather than failure
        let ranked = score_and_rank(&candidates, &oracles, 10).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_candidates_aggregate_once() {
        let candidates = batch(&["x", "x"]);
        let oracles = vec![StubOracle::ok(0, r#"[{"x": 0.5}]"#)];

        let ranked = score_and_rank(&candidates, &oracles, 10).await.unwrap();
        assert_eq!(ranked.len(), 1);
    }
}
