//! uforge-gen library interface
//!
//! Username synthesis, ranking and validation pipeline:
//! weighted-random composition from categorized lexical fragments, score
//! aggregation over a panel of independent oracles, and confirmation of the
//! top candidates against web-search evidence.

pub mod compose;
pub mod dataset;
pub mod db;
pub mod error;
pub mod rate_limit;
pub mod scoring;
pub mod types;
pub mod validate;
pub mod workflow;

pub use crate::error::{OracleError, OracleParseError, PipelineError, SearchError};
pub use crate::types::{
    AggregatedScore, Candidate, DatasetProvider, Fragment, FragmentKind, ScoreEntry, ScoreRecord,
    ScoringOracle, SearchHit, SearchOracle, ValidationResult,
};
