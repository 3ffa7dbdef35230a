// One pitch of a combination product set.
//
// A `ScaleElement` is a fixed factor tuple (its identity, see factors.rs),
// the integer product of that tuple, and the element's live value under the
// current reference divisor. Transposition only ever rewrites the live value,
// and always recomputes it from the original product, so repeated
// transpositions cannot drift.
//
// Elements order by their octave-reduced ratio alone. Comparing against a
// value of some other type at runtime is a type-mismatch error (`try_cmp`).

use crate::error::CpsError;
use crate::factors::FactorKey;
use crate::ratio::ExactRatio;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ScaleElement {
    key: FactorKey,
    original_product: u64,
    /// `original_product` (octave-raised past the divisor) over the divisor.
    current_product: ExactRatio,
    /// `current_product`, octave-reduced.
    ratio: ExactRatio,
}

impl ScaleElement {
    /// Build an element from its factors plus an optional embedding
    /// multiplier. Factors must be non-empty and positive, and their product
    /// must fit in a `u64`.
    pub fn new(factors: &[u64], multiplier: Option<u64>) -> Result<Self, CpsError> {
        if factors.is_empty() {
            return Err(CpsError::invalid("no factors specified"));
        }
        if factors.contains(&0) {
            return Err(CpsError::invalid(format!("factors must be positive: {factors:?}")));
        }

        let key = FactorKey::with_multiplier(factors, multiplier);
        let original_product = key.product()?;
        let current_product = ExactRatio::from_integer(original_product);
        Ok(ScaleElement {
            key,
            original_product,
            current_product,
            ratio: current_product.octave_reduce(),
        })
    }

    pub fn key(&self) -> &FactorKey {
        &self.key
    }

    pub fn factors(&self) -> &[u64] {
        self.key.factors()
    }

    pub fn original_product(&self) -> u64 {
        self.original_product
    }

    pub fn current_product(&self) -> ExactRatio {
        self.current_product
    }

    pub fn ratio(&self) -> ExactRatio {
        self.ratio
    }

    /// Re-express this element relative to `divisor` as the new 1/1.
    ///
    /// The product is doubled until it is at least the divisor, divided by
    /// it, then octave-reduced. The result depends only on the original
    /// product and `divisor`. Fails, leaving the element untouched, if the
    /// raised product would overflow a `u64`.
    pub fn transpose_to(&mut self, divisor: u64) -> Result<(), CpsError> {
        if divisor == 0 {
            return Err(CpsError::invalid("cannot transpose to a zero divisor"));
        }
        let mut product = self.original_product;
        while divisor > product {
            product = product.checked_mul(2).ok_or_else(|| {
                CpsError::invalid(format!(
                    "divisor {divisor} is too large to transpose {} against",
                    self.key
                ))
            })?;
        }
        self.current_product = ExactRatio::from_integer(product) / divisor;
        self.ratio = self.current_product.octave_reduce();
        Ok(())
    }

    /// The ratio as displayed in scale listings: `1/1` at or below unison.
    pub fn ratio_label(&self) -> String {
        if self.ratio > 1u64 {
            self.ratio.to_string()
        } else {
            "1/1".to_string()
        }
    }

    /// Compare against an arbitrary value. Only another `ScaleElement` is
    /// comparable; anything else is a type mismatch.
    pub fn try_cmp(&self, other: &dyn Any) -> Result<Ordering, CpsError> {
        other
            .downcast_ref::<ScaleElement>()
            .map(|other| self.cmp(other))
            .ok_or_else(|| {
                CpsError::TypeMismatch(
                    "a scale element can only be compared with another scale element".into(),
                )
            })
    }
}

impl PartialEq for ScaleElement {
    fn eq(&self, other: &Self) -> bool {
        self.ratio == other.ratio
    }
}

impl Eq for ScaleElement {}

impl PartialOrd for ScaleElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScaleElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ratio.cmp(&other.ratio)
    }
}

/// `(1, 3, 5)\t=>\t15/8`
impl fmt::Display for ScaleElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t=>\t{}", self.key, self.ratio_label())
    }
}
