//! Candidate validation against web-search evidence
//!
//! `search_client` queries a custom-search endpoint; `pipeline` applies the
//! match policy and accumulates accepted candidates.

pub mod pipeline;
pub mod search_client;

pub use pipeline::{is_standalone_token, validate};
pub use search_client::CseSearchClient;
