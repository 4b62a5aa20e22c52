//! Composition engine
//!
//! Builds one candidate's fragment sequence per call from the read-only
//! dataset. All randomness flows through the caller-supplied generator so
//! runs are reproducible under a seeded generator.
//!
//! Selection rules:
//! - element count from {2,3,4} weighted {0.40, 0.35, 0.25}
//! - position 0 draws from {Name, Word} only
//! - at most one Year/Number fragment per candidate (redraw on violation)
//! - for candidates of length >= 3 no kind may take a third position
//!   (uniform replacement among kinds still below two uses; the original
//!   draw stands when nothing is below the cap)

use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::types::{Fragment, FragmentKind};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

const LENGTH_CHOICES: [usize; 3] = [2, 3, 4];
const LENGTH_WEIGHTS: [f64; 3] = [0.40, 0.35, 0.25];

/// First position excludes numeric kinds; weights are normalized by the
/// sampler before use
const FIRST_KINDS: [FragmentKind; 2] = [FragmentKind::Name, FragmentKind::Word];
const FIRST_WEIGHTS: [f64; 2] = [0.63, 0.47];

const REST_KINDS: [FragmentKind; 4] = [
    FragmentKind::Name,
    FragmentKind::Word,
    FragmentKind::Year,
    FragmentKind::Number,
];
const REST_WEIGHTS: [f64; 4] = [0.33, 0.29, 0.16, 0.22];

/// Weights for the redraw when a second numeric kind comes up
const NUMERIC_REDRAW_WEIGHTS: [f64; 2] = [0.57, 0.43];

/// Per-candidate cap on uses of a single kind (lengths >= 3)
const KIND_CAP: usize = 2;

/// Draw the element count for one candidate
pub fn select_length<R: Rng + ?Sized>(rng: &mut R) -> usize {
    let dist = WeightedIndex::new(LENGTH_WEIGHTS).expect("static weights are valid");
    LENGTH_CHOICES[dist.sample(rng)]
}

/// Draw the kind sequence for one candidate of the given length
pub fn select_kinds<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<FragmentKind> {
    let first_dist = WeightedIndex::new(FIRST_WEIGHTS).expect("static weights are valid");
    let rest_dist = WeightedIndex::new(REST_WEIGHTS).expect("static weights are valid");
    let redraw_dist = WeightedIndex::new(NUMERIC_REDRAW_WEIGHTS).expect("static weights are valid");

    let mut kinds: Vec<FragmentKind> = Vec::with_capacity(length);
    let mut counts = [0usize; 4];

    for position in 0..length {
        let mut kind = if position == 0 {
            FIRST_KINDS[first_dist.sample(rng)]
        } else {
            REST_KINDS[rest_dist.sample(rng)]
        };

        if position > 0 {
            let has_numeric = kinds.iter().any(|k| k.is_numeric());

            // Only one year or number per candidate
            if kind.is_numeric() && has_numeric {
                kind = FIRST_KINDS[redraw_dist.sample(rng)];
            }

            // Balance cap: a third use of the same kind is replaced by a
            // uniform draw among kinds still below the cap. Kinds that would
            // break the one-numeric budget are not eligible replacements.
            // When nothing is below the cap the original draw stands.
            if length >= 3 && counts[kind_index(kind)] >= KIND_CAP {
                let below_cap: Vec<FragmentKind> = REST_KINDS
                    .iter()
                    .copied()
                    .filter(|k| counts[kind_index(*k)] < KIND_CAP)
                    .filter(|k| !(k.is_numeric() && has_numeric))
                    .collect();
                if !below_cap.is_empty() {
                    kind = below_cap[rng.gen_range(0..below_cap.len())];
                }
            }
        }

        counts[kind_index(kind)] += 1;
        kinds.push(kind);
    }

    kinds
}

/// Compose one candidate's fragment sequence from the dataset
pub fn compose<R: Rng + ?Sized>(
    rng: &mut R,
    dataset: &Dataset,
) -> Result<Vec<Fragment>, PipelineError> {
    let length = select_length(rng);
    let kinds = select_kinds(rng, length);

    let mut fragments = Vec::with_capacity(kinds.len());
    for kind in kinds {
        fragments.push(Fragment {
            kind,
            text: sample_text(rng, dataset, kind)?,
        });
    }

    Ok(fragments)
}

/// Uniformly sample one value from the dataset category of the given kind
fn sample_text<R: Rng + ?Sized>(
    rng: &mut R,
    dataset: &Dataset,
    kind: FragmentKind,
) -> Result<String, PipelineError> {
    let items = dataset.category(kind);
    if items.is_empty() {
        return Err(PipelineError::EmptyCategory(kind));
    }
    Ok(items[rng.gen_range(0..items.len())].clone())
}

fn kind_index(kind: FragmentKind) -> usize {
    match kind {
        FragmentKind::Name => 0,
        FragmentKind::Word => 1,
        FragmentKind::Year => 2,
        FragmentKind::Number => 3,
    }
}
