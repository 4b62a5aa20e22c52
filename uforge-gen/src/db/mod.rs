//! Database operations for the generation pipeline
//!
//! All writes follow the idempotent-upsert discipline: duplicate insert
//! attempts are no-ops (or updates) keyed by the unique username column, so
//! retries and re-runs are safe.

pub mod lexicon;
pub mod scores;
pub mod validated;
