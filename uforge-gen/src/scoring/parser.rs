//! Oracle response parsing
//!
//! Oracles answer in free-form text that loosely encodes a bracket-delimited
//! list of single-key numeric mappings, typically with prose around it.
//! Parsing is a pure function so it can be unit-tested without any network.

use crate::error::OracleParseError;
use std::collections::HashMap;
use tracing::debug;

/// One parsed (username, score) pair from one oracle response
#[derive(Debug, Clone, PartialEq)]
pub struct RawScore {
    pub username: String,
    pub score: f64,
}

/// Extract the score list from a raw oracle response
///
/// Locates the outermost bracket-delimited span and parses it as a JSON list
/// of `{username: score}` entries. Scores outside (0, 1] are dropped
/// entry-wise. Any shape mismatch is an `OracleParseError`; the caller
/// treats that as an empty contribution from this oracle.
pub fn parse_oracle_response(text: &str) -> Result<Vec<RawScore>, OracleParseError> {
    let start = text
        .find('[')
        .ok_or_else(|| OracleParseError("no bracket-delimited list found".to_string()))?;
    let end = text
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or_else(|| OracleParseError("unterminated bracket-delimited list".to_string()))?;

    let entries: Vec<HashMap<String, f64>> = serde_json::from_str(&text[start..=end])
        .map_err(|e| OracleParseError(format!("invalid score list: {}", e)))?;

    let mut scores = Vec::new();
    for entry in entries {
        for (username, score) in entry {
            if score > 0.0 && score <= 1.0 {
                scores.push(RawScore { username, score });
            } else {
                debug!(username = %username, score, "Dropping out-of-range score");
            }
        }
    }

    Ok(scores)
}
