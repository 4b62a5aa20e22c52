//! Validation pipeline
//!
//! Confirms top-ranked candidates against search evidence. Each candidate is
//! queried once per pass; the first hit that satisfies the match policy is
//! recorded and later hits are ignored. Search transport failures are
//! absorbed as zero results so one bad query never aborts the batch.

use crate::types::{ScoreRecord, SearchOracle, ValidationResult};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Validate score records against the search oracle
///
/// In strict mode a hit is accepted only when the candidate appears as a
/// standalone whitespace-delimited token in the snippet; otherwise the first
/// hit is accepted unconditionally. Candidates with no results and, in
/// strict mode, no token match are discarded without a result. Duplicate
/// usernames within one pass are validated at most once.
pub async fn validate(
    search: &dyn SearchOracle,
    records: &[ScoreRecord],
    strict_match: bool,
) -> Vec<ValidationResult> {
    let mut accepted = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        let username = record.username.as_str();
        if !seen.insert(username) {
            debug!(username, "Already processed this pass; skipping");
            continue;
        }

        let hits = match search.search(username).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(username, error = %e, "Search failed; treating as zero results");
                Vec::new()
            }
        };

        if hits.is_empty() {
            debug!(username, "No search results; disregarding candidate");
            continue;
        }

        for hit in hits {
            if strict_match && !is_standalone_token(&hit.snippet, username) {
                continue;
            }

            info!(username, title = %hit.title, "Search evidence accepted");
            accepted.push(ValidationResult {
                candidate: record.username.clone(),
                title: hit.title,
                url: hit.url,
                matched: true,
            });
            // First accepted hit wins
            break;
        }
    }

    accepted
}

/// True when the candidate appears as a standalone whitespace-delimited
/// token of the snippet
pub fn is_standalone_token(snippet: &str, candidate: &str) -> bool {
    snippet.split_whitespace().any(|token| token == candidate)
}
