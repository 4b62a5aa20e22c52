//! Error taxonomy for the generation pipeline
//!
//! Component-local failures (one oracle down, one unparsable response, one
//! search miss) are absorbed where they occur and degrade the batch. Only
//! dataset-load exhaustion and total oracle failure abort a run.

use crate::types::FragmentKind;
use thiserror::Error;

/// Scoring oracle call errors, recovered at the per-oracle level
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),
}

/// Oracle response parse error
///
/// Recovered locally: the oracle contributes no scores, aggregation
/// proceeds with the rest.
#[derive(Debug, Error)]
#[error("Unparsable oracle response: {0}")]
pub struct OracleParseError(pub String);

/// Search oracle errors, recovered by treating the candidate as having
/// zero results
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Pipeline-level errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fatal to the in-progress candidate only; the batch degrades
    #[error("Lexicon category `{0}` is empty")]
    EmptyCategory(FragmentKind),

    /// Run-fatal: dataset loading exhausted its retry budget
    #[error("Dataset load failed after {attempts} attempts: {source}")]
    DatasetLoad {
        attempts: u32,
        #[source]
        source: uforge_common::Error,
    },

    /// Run-fatal: every scoring oracle failed at the transport level
    #[error("No scores available: all {oracles} scoring oracles failed")]
    NoScoresAvailable { oracles: usize },

    #[error(transparent)]
    Common(#[from] uforge_common::Error),
}
