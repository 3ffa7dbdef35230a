// Exact rational pitch values.
//
// Every ratio in the engine is an `ExactRatio`: a reduced numerator/
// denominator pair over `u64`, backed by `num_rational::Ratio`. No floating
// point ever enters a stored value; `to_f64`/`log2` exist only for display
// mappings such as note indices (see notes.rs).
//
// The one domain operation is octave reduction: halve while the value is
// above 2. Values at or below 2 are returned untouched, which makes the
// reduction idempotent. Values below 1 are *not* raised; callers that need
// a value in [1, 2] (scale elements after transposition) guarantee the input
// is at least 1 before reducing.

use crate::error::CpsError;
use num_rational::Ratio;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul};

/// An exact, always-normalized rational number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExactRatio(Ratio<u64>);

impl ExactRatio {
    /// Build `numer/denom`. Both parts must be positive.
    pub fn new(numer: u64, denom: u64) -> Result<Self, CpsError> {
        if denom == 0 {
            return Err(CpsError::invalid(format!("ratio {numer}/0 has a zero denominator")));
        }
        if numer == 0 {
            return Err(CpsError::invalid("ratio must be positive, got 0"));
        }
        Ok(ExactRatio(Ratio::new(numer, denom)))
    }

    pub fn from_integer(n: u64) -> Self {
        ExactRatio(Ratio::from_integer(n))
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    pub fn numer(&self) -> u64 {
        *self.0.numer()
    }

    pub fn denom(&self) -> u64 {
        *self.0.denom()
    }

    pub fn is_integer(&self) -> bool {
        self.denom() == 1
    }

    /// Multiply by 1/2.
    pub fn halve(self) -> Self {
        ExactRatio(self.0 / 2u64)
    }

    /// Halve repeatedly while the value exceeds 2.
    pub fn octave_reduce(self) -> Self {
        let mut value = self;
        while value > 2u64 {
            value = value.halve();
        }
        value
    }

    pub fn to_f64(&self) -> f64 {
        self.numer() as f64 / self.denom() as f64
    }

    pub fn log2(&self) -> f64 {
        self.to_f64().log2()
    }
}

impl Mul for ExactRatio {
    type Output = ExactRatio;

    fn mul(self, rhs: ExactRatio) -> ExactRatio {
        ExactRatio(self.0 * rhs.0)
    }
}

impl Mul<u64> for ExactRatio {
    type Output = ExactRatio;

    fn mul(self, rhs: u64) -> ExactRatio {
        ExactRatio(self.0 * rhs)
    }
}

/// Panics on a zero divisor, like integer division.
impl Div for ExactRatio {
    type Output = ExactRatio;

    fn div(self, rhs: ExactRatio) -> ExactRatio {
        ExactRatio(self.0 / rhs.0)
    }
}

/// Panics on a zero divisor, like integer division.
impl Div<u64> for ExactRatio {
    type Output = ExactRatio;

    fn div(self, rhs: u64) -> ExactRatio {
        ExactRatio(self.0 / rhs)
    }
}

impl PartialEq<u64> for ExactRatio {
    fn eq(&self, other: &u64) -> bool {
        self.0 == Ratio::from_integer(*other)
    }
}

impl PartialOrd<u64> for ExactRatio {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        Some(self.0.cmp(&Ratio::from_integer(*other)))
    }
}

impl From<u64> for ExactRatio {
    fn from(n: u64) -> Self {
        ExactRatio::from_integer(n)
    }
}

/// Integers render bare (`2`), everything else as `numer/denom`.
impl fmt::Display for ExactRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_integer() {
            self.numer().to_string()
        } else {
            format!("{}/{}", self.numer(), self.denom())
        };
        // `pad` so width/alignment flags work in column layouts.
        f.pad(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u64, d: u64) -> ExactRatio {
        ExactRatio::new(n, d).unwrap()
    }

    #[test]
    fn octave_reduce_lands_in_octave() {
        assert_eq!(ExactRatio::from_integer(15).octave_reduce(), r(15, 8));
        assert_eq!(ExactRatio::from_integer(1001).octave_reduce(), r(1001, 512));
        assert_eq!(r(11, 5).octave_reduce(), r(11, 10));
        assert_eq!(ExactRatio::from_integer(4).octave_reduce(), ExactRatio::from_integer(2));
    }

    #[test]
    fn octave_reduce_leaves_two_and_below_alone() {
        assert_eq!(ExactRatio::from_integer(2).octave_reduce(), ExactRatio::from_integer(2));
        assert_eq!(ExactRatio::one().octave_reduce(), ExactRatio::one());
        assert_eq!(r(3, 4).octave_reduce(), r(3, 4));
    }

    #[test]
    fn octave_reduce_is_idempotent() {
        for numer in 1..=200u64 {
            for denom in [1u64, 2, 3, 7, 15, 64, 105] {
                let once = r(numer, denom).octave_reduce();
                assert_eq!(once.octave_reduce(), once, "{numer}/{denom}");
            }
        }
    }

    #[test]
    fn compares_with_integers() {
        let x = r(15, 8);
        assert!(x > 1u64);
        assert!(x < 2u64);
        assert!(ExactRatio::from_integer(2) == 2u64);
        assert!(r(3, 4) < 1u64);
    }

    #[test]
    fn arithmetic_stays_exact() {
        assert_eq!(r(33, 1) / 15u64, r(11, 5));
        assert_eq!(r(11, 5) * r(5, 11), ExactRatio::one());
        assert_eq!(r(7, 6) * 6u64, ExactRatio::from_integer(7));
        assert_eq!(r(3, 2) / r(3, 4), ExactRatio::from_integer(2));
    }

    #[test]
    fn display() {
        assert_eq!(r(1001, 960).to_string(), "1001/960");
        assert_eq!(ExactRatio::from_integer(2).to_string(), "2");
        assert_eq!(format!("{:<9}|", r(7, 6)), "7/6      |");
        assert_eq!(r(14, 4).to_string(), "7/2");
    }

    #[test]
    fn rejects_non_positive() {
        assert!(ExactRatio::new(0, 3).is_err());
        assert!(ExactRatio::new(3, 0).is_err());
    }
}
