// Common-tone analysis between sibling sets.
//
// Two sets share a tone when the same current product (the transposed,
// not-yet-octave-reduced value) appears in both. Products are only
// comparable between sets transposed to the same 1/1, so the shared
// reference tone is an explicit argument and every set is checked against
// it before anything is compared.
//
// The result buckets every non-reference set by how many tones it shares
// with the reference set. Buckets run from 0 to the reference set's size,
// all present even when empty. A shared count can never exceed the
// reference's size, so no count is clamped; for equally sized siblings
// (hexanies of an eikosany) this is the same min(set sizes) + 1 buckets.

use crate::cps::CombinationProductSet;
use crate::error::CpsError;
use crate::ratio::ExactRatio;
use crate::transposition::Transposition;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Shared-tone count -> sets with that many tones in common with the
/// reference set, in input order.
pub type CommonToneBuckets<'a> = BTreeMap<usize, Vec<&'a CombinationProductSet>>;

/// Products present in both sets.
pub fn shared_products(a: &CombinationProductSet, b: &CombinationProductSet) -> BTreeSet<ExactRatio> {
    a.products().intersection(&b.products()).copied().collect()
}

/// Compare `sets[reference_index]` against every other set in `sets`. All
/// sets must currently be transposed to `tone`.
pub fn find_common_tones<'a>(
    sets: &'a [CombinationProductSet],
    reference_index: usize,
    tone: &Transposition,
) -> Result<CommonToneBuckets<'a>, CpsError> {
    let reference = sets.get(reference_index).ok_or_else(|| {
        CpsError::invalid(format!(
            "reference index {reference_index} is out of range for {} sets",
            sets.len()
        ))
    })?;

    for set in sets {
        if !set.transposition().same_tone(tone) {
            return Err(CpsError::ReferenceMismatch {
                set: set.name().to_string(),
                expected: tone.label().to_string(),
                found: set.transposition().label().to_string(),
            });
        }
    }

    let reference_products = reference.products();
    let mut buckets: CommonToneBuckets<'a> =
        (0..=reference.len()).map(|k| (k, Vec::new())).collect();

    for (i, other) in sets.iter().enumerate() {
        if i == reference_index {
            continue;
        }
        let shared = reference_products.intersection(&other.products()).count();
        buckets.entry(shared).or_default().push(other);
    }

    debug!(
        reference = %reference.name(),
        tone = %tone,
        compared = sets.len() - 1,
        "bucketed common tones"
    );
    Ok(buckets)
}
