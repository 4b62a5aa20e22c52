//! Cycle orchestration
//!
//! One cycle runs the full pipeline: dataset load (with bounded retry and
//! corrective regeneration), candidate generation, oracle scoring and
//! ranking, search validation, and persistence of the accepted set.

pub mod pipeline;

pub use pipeline::{CycleConfig, CycleOutcome, Orchestrator};
