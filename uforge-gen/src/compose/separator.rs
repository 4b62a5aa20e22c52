//! Separator injection
//!
//! Decides independently for each gap between adjacent fragments whether to
//! place a separator: 0.65 for the first separator of a candidate, 0.11 for
//! every later gap. Separators never lead, trail, or double up because they
//! exist only at interior gaps.

use crate::compose::engine;
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::types::{Candidate, Fragment};
use rand::Rng;

pub const SEPARATOR: char = '_';

const FIRST_SEPARATOR_PROBABILITY: f64 = 0.65;
const NEXT_SEPARATOR_PROBABILITY: f64 = 0.11;

/// Draw the per-gap separator decisions for a candidate
///
/// Returns one decision per interior gap (`fragment_count - 1` entries).
pub fn draw_separators<R: Rng + ?Sized>(rng: &mut R, fragment_count: usize) -> Vec<bool> {
    let gaps = fragment_count.saturating_sub(1);
    let mut separators = Vec::with_capacity(gaps);
    let mut placed = false;

    for _ in 0..gaps {
        let probability = if placed {
            NEXT_SEPARATOR_PROBABILITY
        } else {
            FIRST_SEPARATOR_PROBABILITY
        };
        let place = rng.gen_bool(probability);
        placed = placed || place;
        separators.push(place);
    }

    separators
}

/// Join fragments into the final username, interleaving separators at the
/// gaps where the decision was true
pub fn assemble(fragments: &[Fragment], separators: &[bool]) -> String {
    let mut username = String::new();

    for (i, fragment) in fragments.iter().enumerate() {
        username.push_str(&fragment.text);
        if i + 1 < fragments.len() && separators.get(i).copied().unwrap_or(false) {
            username.push(SEPARATOR);
        }
    }

    username
}

/// Compose one complete candidate: fragment sequence plus joined username
pub fn compose_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    dataset: &Dataset,
) -> Result<Candidate, PipelineError> {
    let fragments = engine::compose(rng, dataset)?;
    let separators = draw_separators(rng, fragments.len());
    let username = assemble(&fragments, &separators);

    Ok(Candidate {
        fragments,
        username,
    })
}
