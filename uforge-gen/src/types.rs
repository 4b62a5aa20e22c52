//! Base types and trait seams for the generation pipeline
//!
//! The traits are the interface boundary toward external collaborators:
//! the lexical dataset provider, the scoring oracles, and the search oracle.
//! Concrete implementations live in `dataset`, `scoring::oracle_client` and
//! `validate::search_client`; tests substitute stubs.

use crate::error::{OracleError, SearchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Lexical fragment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragmentKind {
    Name,
    Word,
    Year,
    Number,
}

impl FragmentKind {
    /// All categories, in canonical order
    pub const ALL: [FragmentKind; 4] = [
        FragmentKind::Name,
        FragmentKind::Word,
        FragmentKind::Year,
        FragmentKind::Number,
    ];

    /// Year and Number fragments share a one-per-candidate budget
    pub fn is_numeric(self) -> bool {
        matches!(self, FragmentKind::Year | FragmentKind::Number)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FragmentKind::Name => "name",
            FragmentKind::Word => "word",
            FragmentKind::Year => "year",
            FragmentKind::Number => "number",
        }
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed lexical unit drawn from the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub text: String,
}

/// A composed username prior to scoring
///
/// Produced fresh per generation call and never mutated afterwards, only
/// consumed by the scoring and validation stages.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Ordered fragments the username was composed from
    pub fragments: Vec<Fragment>,
    /// Separator-joined username string
    pub username: String,
}

impl Candidate {
    /// Pair the username with its fixed-suffix address
    ///
    /// Only the username participates in scoring and validation; the address
    /// exists for downstream interfaces.
    pub fn address(&self, domain: &str) -> String {
        format!("{}@{}", self.username, domain)
    }
}

/// One score produced by one oracle for one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub candidate: String,
    pub agent_id: u32,
    /// Score in (0, 1]
    pub score: f64,
}

/// Per-candidate arithmetic mean over the oracles that scored it
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedScore {
    pub candidate: String,
    pub average: f64,
}

/// A persisted score row surfaced by the store's top-K query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: i64,
    pub username: String,
    pub score: f64,
}

/// One search result from the search oracle
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Accepted search evidence for a candidate
///
/// Created at most once per candidate per validation pass; the first
/// accepted hit wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub candidate: String,
    pub title: String,
    pub url: String,
    pub matched: bool,
}

/// Scoring oracle interface
///
/// Each oracle returns best-effort free-form text loosely encoding a list of
/// `{username: score}` entries. No schema guarantee; responses are
/// defensively parsed by the aggregator.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// Stable identifier for logging and score provenance
    fn agent_id(&self) -> u32;

    /// Score the full candidate batch, returning the raw response text
    async fn score(&self, candidates: &[String]) -> Result<String, OracleError>;
}

/// Web-search oracle interface
#[async_trait]
pub trait SearchOracle: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// Lexical dataset provider interface
///
/// Categories must be disjoint and duplicate-free. `regenerate` is the
/// corrective action the orchestrator invokes between failed load attempts.
#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn get_category(&self, kind: FragmentKind) -> uforge_common::Result<Vec<String>>;

    async fn regenerate(&self) -> uforge_common::Result<()>;
}
