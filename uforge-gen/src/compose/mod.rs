//! Candidate composition
//!
//! `engine` draws a typed fragment sequence under balance and adjacency
//! rules; `separator` joins the fragments into the final username with
//! position-dependent separator probabilities.

pub mod engine;
pub mod separator;

pub use engine::compose;
pub use separator::{assemble, compose_candidate, draw_separators};
